/// Axum webserver implementation
///
/// Server lifecycle: bind, serve until the shutdown future resolves, then drain.
use axum::Router;
use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::{
    errors::{QueueError, QueueResult},
    logger::{self, LogTag},
    webserver::{routes, state::AppState},
};

/// How long open connections may keep the process alive after shutdown starts
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Start the webserver
///
/// Blocks until `shutdown` resolves and in-flight requests have finished.
/// Event streams never finish on their own, so after `DRAIN_TIMEOUT` the
/// server stops waiting and their bodies are dropped with it.
pub async fn start_server<F>(state: Arc<AppState>, shutdown: F) -> QueueResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_address = state.config.webserver.bind_address();
    logger::debug(LogTag::Webserver, &format!("Starting webserver on {}", bind_address));

    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|e| QueueError::Config(format!("Invalid bind address {}: {}", bind_address, e)))?;

    let app = build_app(state);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        QueueError::Server(match e.kind() {
            std::io::ErrorKind::AddrInUse => {
                format!(
                    "Failed to bind to {}: Address already in use\n\
                     \n\
                     Another carequeue instance is probably running.\n\
                     Stop it or start this one with --port <n>.",
                    addr
                )
            }
            std::io::ErrorKind::PermissionDenied => {
                format!(
                    "Failed to bind to {}: Permission denied\n\
                     \n\
                     Port {} requires elevated privileges on this system.\n\
                     Consider using a port above 1024.",
                    addr,
                    addr.port()
                )
            }
            _ => format!("Failed to bind to {}: {}", addr, e),
        })
    })?;

    logger::info(LogTag::Webserver, &format!("Listening on http://{}", addr));
    logger::debug(
        LogTag::Webserver,
        &format!("API endpoints available at http://{}/api", addr),
    );

    let (stopping_tx, mut stopping_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown.await;
        logger::debug(LogTag::Webserver, "Received shutdown signal, stopping webserver...");
        let _ = stopping_tx.send(true);
    });

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| QueueError::Server(e.to_string()))?;
        }
        _ = async {
            if stopping_rx.wait_for(|stopping| *stopping).await.is_ok() {
                tokio::time::sleep(DRAIN_TIMEOUT).await;
            } else {
                std::future::pending::<()>().await;
            }
        } => {
            logger::warning(
                LogTag::Webserver,
                &format!("Connections still open after {:?}, closing them", DRAIN_TIMEOUT),
            );
        }
    }

    logger::debug(LogTag::Webserver, "Webserver stopped gracefully");

    Ok(())
}

/// Build the Axum application with all routes and middleware
fn build_app(state: Arc<AppState>) -> Router {
    routes::create_router(state)
}
