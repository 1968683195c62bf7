/// Per-connection snapshot publisher
///
/// Every open stream owns one spawned task and one timer. The task calls its
/// producer immediately, then once per interval, and pushes each encoded frame
/// into a bounded channel read by the HTTP response body. Dropping the body
/// closes the channel, which the task observes before starting the next
/// producer call.
///
/// Producer failures never surface as protocol errors. Depending on
/// `terminate_on_error` the configured error payload is either the final frame
/// or a fallback frame after which ticking continues.
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::frame::{encode_frame, FrameStream};
use super::jitter::apply_stats_jitter;
use super::producers::SnapshotProducer;
use crate::config::StreamsConfig;
use crate::errors::QueueResult;
use crate::logger::{self, LogTag};
use crate::models::{Patient, PatientStatus, SystemStats};

pub const DEFAULT_FRAME_BUFFER: usize = 16;

pub type TickTransform<T> = Box<dyn FnMut(&mut T) + Send>;

pub struct StreamConfig<T> {
    pub interval: Duration,
    pub terminate_on_error: bool,
    /// Emitted in place of a snapshot whenever the producer fails
    pub error_payload: Value,
    /// Applied to tick snapshots only, never to the first one
    pub tick_transform: Option<TickTransform<T>>,
    pub buffer: usize,
}

impl<T> StreamConfig<T> {
    pub fn new(interval: Duration, error_payload: Value) -> Self {
        Self {
            interval,
            terminate_on_error: false,
            error_payload,
            tick_transform: None,
            buffer: DEFAULT_FRAME_BUFFER,
        }
    }

    pub fn terminate_on_error(mut self) -> Self {
        self.terminate_on_error = true;
        self
    }

    pub fn with_tick_transform<F>(mut self, transform: F) -> Self
    where
        F: FnMut(&mut T) + Send + 'static,
    {
        self.tick_transform = Some(Box::new(transform));
        self
    }

    pub fn with_buffer(mut self, buffer: usize) -> Self {
        self.buffer = buffer.max(1);
        self
    }
}

impl StreamConfig<PatientStatus> {
    /// Ends with `{"error":"Patient not found"}` on the first failure
    pub fn patient(settings: &StreamsConfig) -> Self {
        Self::new(settings.patient_interval(), json!({ "error": "Patient not found" }))
            .terminate_on_error()
            .with_buffer(settings.frame_buffer)
    }
}

impl StreamConfig<Vec<Patient>> {
    /// Any patient list stream: pharmacy, doctor and front-desk queues
    pub fn patient_list(interval: Duration, settings: &StreamsConfig) -> Self {
        Self::new(interval, json!([])).with_buffer(settings.frame_buffer)
    }

    pub fn pharmacy_queue(settings: &StreamsConfig) -> Self {
        Self::patient_list(settings.pharmacy_interval(), settings)
    }

    pub fn queue_view(settings: &StreamsConfig) -> Self {
        Self::patient_list(settings.queue_interval(), settings)
    }
}

impl StreamConfig<SystemStats> {
    pub fn system_stats(settings: &StreamsConfig) -> Self {
        let config =
            Self::new(settings.stats_interval(), json!({})).with_buffer(settings.frame_buffer);
        if !settings.stats_jitter_enabled {
            return config;
        }

        let mut rng = StdRng::from_entropy();
        config.with_tick_transform(move |stats| apply_stats_jitter(stats, &mut rng))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamEnd {
    Disconnected,
    ProducerFailed,
}

/// Start publishing snapshots of `subject` and return the frame stream
///
/// Must be called inside a Tokio runtime.
pub fn open_stream<P: SnapshotProducer>(
    producer: Arc<P>,
    subject: P::Subject,
    config: StreamConfig<P::Snapshot>,
) -> FrameStream {
    let (tx, rx) = mpsc::channel(config.buffer.max(1));
    tokio::spawn(run_stream(producer, subject, config, tx));
    FrameStream::new(rx)
}

async fn run_stream<P: SnapshotProducer>(
    producer: Arc<P>,
    subject: P::Subject,
    mut config: StreamConfig<P::Snapshot>,
    tx: mpsc::Sender<String>,
) {
    let name = producer.name();
    if logger::is_debug_enabled(LogTag::Streams) {
        logger::debug(
            LogTag::Streams,
            &format!("{} stream opened (interval {:?})", name, config.interval),
        );
    }

    let end = publish(producer.as_ref(), &subject, &mut config, &tx).await;

    if logger::is_debug_enabled(LogTag::Streams) {
        let reason = match end {
            StreamEnd::Disconnected => "client disconnected",
            StreamEnd::ProducerFailed => "producer failed",
        };
        logger::debug(LogTag::Streams, &format!("{} stream closed: {}", name, reason));
    }
}

async fn publish<P: SnapshotProducer>(
    producer: &P,
    subject: &P::Subject,
    config: &mut StreamConfig<P::Snapshot>,
    tx: &mpsc::Sender<String>,
) -> StreamEnd {
    let error_frame = encode_frame(&config.error_payload)
        .unwrap_or_else(|_| format!("data: {}\n\n", config.error_payload));

    let first = producer.produce(subject).await.and_then(|snapshot| encode_frame(&snapshot));
    if let Some(end) = emit(tx, first, &error_frame, config.terminate_on_error).await {
        return end;
    }

    let mut ticker = interval_at(Instant::now() + config.interval, config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = tx.closed() => return StreamEnd::Disconnected,
            _ = ticker.tick() => {}
        }

        let frame = producer.produce(subject).await.and_then(|mut snapshot| {
            if let Some(transform) = config.tick_transform.as_mut() {
                transform(&mut snapshot);
            }
            encode_frame(&snapshot)
        });
        if let Some(end) = emit(tx, frame, &error_frame, config.terminate_on_error).await {
            return end;
        }
    }
}

/// Push one frame; `Some` means the stream is over
async fn emit(
    tx: &mpsc::Sender<String>,
    frame: QueueResult<String>,
    error_frame: &str,
    terminate_on_error: bool,
) -> Option<StreamEnd> {
    let (frame, failed) = match frame {
        Ok(frame) => (frame, false),
        Err(_) => (error_frame.to_string(), true),
    };

    if tx.send(frame).await.is_err() {
        return Some(StreamEnd::Disconnected);
    }
    if failed && terminate_on_error {
        return Some(StreamEnd::ProducerFailed);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QueueError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const PERIOD: Duration = Duration::from_secs(5);

    /// Plays back scripted results, then keeps returning 0
    struct Scripted {
        results: Mutex<VecDeque<QueueResult<u32>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(results: Vec<QueueResult<u32>>) -> Arc<Self> {
            Arc::new(Self {
                results: Mutex::new(results.into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotProducer for Scripted {
        type Subject = ();
        type Snapshot = u32;

        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn produce(&self, _: &()) -> QueueResult<u32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results.lock().unwrap().pop_front().unwrap_or(Ok(0))
        }
    }

    fn missing() -> QueueResult<u32> {
        Err(QueueError::patient_not_found())
    }

    fn patient_like() -> StreamConfig<u32> {
        StreamConfig::new(PERIOD, json!({ "error": "Patient not found" })).terminate_on_error()
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_frame_precedes_first_tick() {
        let producer = Scripted::new(vec![Ok(7), Ok(8)]);
        let started = Instant::now();
        let mut stream = open_stream(producer.clone(), (), StreamConfig::new(PERIOD, json!([])));

        assert_eq!(stream.next_frame().await.as_deref(), Some("data: 7\n\n"));
        assert!(started.elapsed() < PERIOD);

        assert_eq!(stream.next_frame().await.as_deref(), Some("data: 8\n\n"));
        assert!(started.elapsed() >= PERIOD);
        assert_eq!(producer.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_on_open_sends_one_frame() {
        let producer = Scripted::new(vec![missing()]);
        let mut stream = open_stream(producer.clone(), (), patient_like());

        assert_eq!(
            stream.next_frame().await.as_deref(),
            Some("data: {\"error\":\"Patient not found\"}\n\n")
        );
        assert_eq!(stream.next_frame().await, None);

        tokio::time::sleep(PERIOD * 3).await;
        assert_eq!(producer.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_error_on_tick_ends_stream() {
        let producer = Scripted::new(vec![Ok(1), Ok(2), missing(), Ok(4)]);
        let mut stream = open_stream(producer.clone(), (), patient_like());

        assert_eq!(stream.next_frame().await.as_deref(), Some("data: 1\n\n"));
        assert_eq!(stream.next_frame().await.as_deref(), Some("data: 2\n\n"));
        assert_eq!(
            stream.next_frame().await.as_deref(),
            Some("data: {\"error\":\"Patient not found\"}\n\n")
        );
        assert_eq!(stream.next_frame().await, None);
        assert_eq!(producer.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_frames_keep_stream_alive() {
        let producer = Scripted::new(vec![missing(), Ok(2), missing(), Ok(3)]);
        let mut stream = open_stream(producer, (), StreamConfig::new(PERIOD, json!([])));

        let mut frames = Vec::new();
        for _ in 0..4 {
            frames.push(stream.next_frame().await.unwrap());
        }
        assert_eq!(frames, vec!["data: []\n\n", "data: 2\n\n", "data: []\n\n", "data: 3\n\n"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_transform_skips_first_snapshot() {
        let producer = Scripted::new(vec![Ok(1), Ok(2), Ok(3)]);
        let config = StreamConfig::new(PERIOD, json!({})).with_tick_transform(|n: &mut u32| *n += 100);
        let mut stream = open_stream(producer, (), config);

        assert_eq!(stream.next_frame().await.as_deref(), Some("data: 1\n\n"));
        assert_eq!(stream.next_frame().await.as_deref(), Some("data: 102\n\n"));
        assert_eq!(stream.next_frame().await.as_deref(), Some("data: 103\n\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_stops_producer_calls() {
        let producer = Scripted::new(vec![Ok(1), Ok(2)]);
        let mut stream = open_stream(producer.clone(), (), StreamConfig::new(PERIOD, json!({})));

        assert!(stream.next_frame().await.is_some());
        assert!(stream.next_frame().await.is_some());
        drop(stream);

        tokio::time::sleep(PERIOD * 4).await;
        assert_eq!(producer.calls(), 2);
    }

    /// One known patient, waiting third of ten for Dr. Smith
    struct Ward;

    #[async_trait]
    impl SnapshotProducer for Ward {
        type Subject = String;
        type Snapshot = PatientStatus;

        fn name(&self) -> &'static str {
            "ward"
        }

        async fn produce(&self, patient_id: &String) -> QueueResult<PatientStatus> {
            if patient_id != "3892" {
                return Err(QueueError::patient_not_found());
            }
            Ok(PatientStatus {
                patient_name: "Asha Rao".to_string(),
                stage: crate::models::Stage::WaitingForDoctor,
                queue_position: 3,
                total_in_queue: 10,
                estimated_wait_time: 15,
                assigned_doctor: Some("Dr. Smith".to_string()),
                assigned_counter: None,
                prescriptions: Some(vec![]),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_patient_stream_frames() {
        let settings = StreamsConfig::default();

        let mut known = open_stream(Arc::new(Ward), "3892".to_string(), StreamConfig::patient(&settings));
        let expected = "data: {\"patientName\":\"Asha Rao\",\"stage\":\"Waiting for Doctor\",\"queuePosition\":3,\"totalInQueue\":10,\"estimatedWaitTime\":15,\"assignedDoctor\":\"Dr. Smith\",\"prescriptions\":[]}\n\n";
        assert_eq!(known.next_frame().await.as_deref(), Some(expected));
        assert_eq!(known.next_frame().await.as_deref(), Some(expected));

        let mut unknown = open_stream(Arc::new(Ward), "0000".to_string(), StreamConfig::patient(&settings));
        assert_eq!(
            unknown.next_frame().await.as_deref(),
            Some("data: {\"error\":\"Patient not found\"}\n\n")
        );
        assert_eq!(unknown.next_frame().await, None);
    }

    #[tokio::test]
    async fn test_presets_follow_settings() {
        let settings = StreamsConfig::default();

        let patient = StreamConfig::patient(&settings);
        assert!(patient.terminate_on_error);
        assert_eq!(patient.interval, Duration::from_millis(5000));

        let pharmacy = StreamConfig::pharmacy_queue(&settings);
        assert!(!pharmacy.terminate_on_error);
        assert_eq!(pharmacy.error_payload, json!([]));

        let stats = StreamConfig::system_stats(&settings);
        assert_eq!(stats.interval, Duration::from_millis(10000));
        assert!(stats.tick_transform.is_some());

        let plain = StreamsConfig {
            stats_jitter_enabled: false,
            ..StreamsConfig::default()
        };
        assert!(StreamConfig::system_stats(&plain).tick_transform.is_none());
    }
}
