use std::path::PathBuf;
use std::sync::Arc;

use carequeue::{
    arguments::{
        config_path_override, get_enabled_debug_modes, host_override, is_help_requested,
        is_no_seed_enabled, port_override, print_help,
    },
    config::{self, Config},
    errors::QueueResult,
    logger::{self, LogTag},
    paths,
    store::HospitalStore,
    webserver::{self, AppState},
};

/// Main entry point for carequeue
///
/// Loads configuration, bootstraps the in-memory store and serves the API
/// until Ctrl-C.
#[tokio::main]
async fn main() {
    // Logger needs the logs directory to create its file
    if let Err(e) = paths::ensure_all_directories() {
        eprintln!("Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    if is_help_requested() {
        print_help();
        std::process::exit(0);
    }

    logger::info(LogTag::System, "carequeue starting up...");

    let debug_modes = get_enabled_debug_modes();
    if !debug_modes.is_empty() {
        logger::info(
            LogTag::System,
            &format!("Debug modes enabled: {}", debug_modes.join(", ")),
        );
    }

    let exit_code = match run().await {
        Ok(()) => {
            logger::info(LogTag::System, "carequeue stopped");
            0
        }
        Err(e) => {
            logger::error(LogTag::System, &format!("Fatal error: {}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(exit_code);
}

async fn run() -> QueueResult<()> {
    let config = load_config()?;

    let mut queue_settings = config.queue.clone();
    if is_no_seed_enabled() {
        queue_settings.seed_default_staff = false;
    }
    let store = Arc::new(HospitalStore::bootstrap(queue_settings));
    let state = Arc::new(AppState::new(config, store));

    webserver::start_server(state, shutdown_signal()).await
}

/// Config file (or defaults) with command-line overrides applied
fn load_config() -> QueueResult<Config> {
    let mut config = match config_path_override() {
        Some(path) => config::load_config_from_path(&PathBuf::from(path))?,
        None => config::load_config()?,
    };

    if let Some(host) = host_override() {
        config.webserver.host = host;
    }
    if let Some(port) = port_override() {
        config.webserver.port = port;
    }

    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::error(
            LogTag::System,
            &format!("Failed to listen for Ctrl-C: {}", e),
        );
        std::future::pending::<()>().await;
    }
    logger::info(LogTag::System, "Shutdown requested");
}
