/// Centralized command-line argument handling
///
/// Arguments are captured once into a process-wide list so any module can check
/// flags without threading them through call sites. Tests override the list via
/// `set_cmd_args`.
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;

/// Global command-line arguments storage
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Override the captured arguments (used by tests)
pub fn set_cmd_args(args: Vec<String>) {
    if let Ok(mut cmd_args) = CMD_ARGS.lock() {
        *cmd_args = args;
    }
}

/// Copy of the current arguments
pub fn get_cmd_args() -> Vec<String> {
    match CMD_ARGS.lock() {
        Ok(args) => args.clone(),
        Err(_) => env::args().collect(),
    }
}

pub fn has_arg(arg: &str) -> bool {
    get_cmd_args().iter().any(|a| a == arg)
}

/// Value following a flag, e.g. `--port 9000`
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = get_cmd_args();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .filter(|value| !value.starts_with("--"))
        .cloned()
}

// =============================================================================
// FLAG CHECKS
// =============================================================================

pub fn is_help_requested() -> bool {
    has_arg("--help") || has_arg("-h")
}

/// Skip seeding the default staff accounts
pub fn is_no_seed_enabled() -> bool {
    has_arg("--no-seed")
}

pub fn is_debug_webserver_enabled() -> bool {
    has_arg("--debug-webserver")
}

pub fn is_debug_streams_enabled() -> bool {
    has_arg("--debug-streams")
}

pub fn is_debug_store_enabled() -> bool {
    has_arg("--debug-store")
}

pub fn config_path_override() -> Option<String> {
    get_arg_value("--config")
}

pub fn host_override() -> Option<String> {
    get_arg_value("--host")
}

/// `--port <n>`; an unparsable value is ignored
pub fn port_override() -> Option<u16> {
    get_arg_value("--port").and_then(|p| p.parse().ok())
}

/// Debug modes that are currently enabled, for the startup banner
pub fn get_enabled_debug_modes() -> Vec<&'static str> {
    let mut modes = Vec::new();
    if is_debug_webserver_enabled() {
        modes.push("webserver");
    }
    if is_debug_streams_enabled() {
        modes.push("streams");
    }
    if is_debug_store_enabled() {
        modes.push("store");
    }
    if has_arg("--debug-config") {
        modes.push("config");
    }
    if has_arg("--debug-api") {
        modes.push("api");
    }
    modes
}

pub fn print_help() {
    println!("carequeue - hospital patient queue tracker");
    println!();
    println!("USAGE:");
    println!("    carequeue [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help              Print this help");
    println!("    --config <path>         Config file (default: $CAREQUEUE_HOME/data/config.toml)");
    println!("    --host <ip>             Override webserver host");
    println!("    --port <n>              Override webserver port");
    println!("    --no-seed               Start without the default staff accounts");
    println!("    --no-log-file           Console logging only");
    println!("    --quiet                 Only warnings and errors");
    println!("    --verbose               Everything, including verbose traces");
    println!();
    println!("DEBUG:");
    println!("    --debug-webserver       Request and server lifecycle details");
    println!("    --debug-streams         Event stream open/close");
    println!("    --debug-store           Queue mutations");
    println!("    --debug-config          Config loading");
    println!("    --debug-api             Route handler details");
}
