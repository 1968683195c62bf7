/// Server-sent event framing
use futures::Stream;
use serde::Serialize;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

use crate::errors::QueueResult;

/// Encode one value as a single unnamed event: `data: <compact json>\n\n`
pub fn encode_frame<T: Serialize + ?Sized>(value: &T) -> QueueResult<String> {
    let json = serde_json::to_string(value)?;
    Ok(format!("data: {}\n\n", json))
}

/// Receiving half of one stream; dropping it disconnects the publisher
#[derive(Debug)]
pub struct FrameStream {
    rx: mpsc::Receiver<String>,
}

impl FrameStream {
    pub(crate) fn new(rx: mpsc::Receiver<String>) -> Self {
        Self { rx }
    }

    pub async fn next_frame(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl Stream for FrameStream {
    type Item = String;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
