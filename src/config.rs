//! Configuration system
//!
//! Structures are declared once with `config_struct!` (field, type and default
//! together) and loaded from TOML. Every field has a default, so the service
//! runs without a config file.

#[macro_use]
mod macros;
mod schemas;
mod utils;

pub use schemas::{Config, QueueConfig, StreamsConfig, WebserverConfig};
pub use utils::load_config_from_path;

/// Load the configuration from the default path
pub fn load_config() -> crate::errors::QueueResult<Config> {
    load_config_from_path(&crate::paths::get_config_path())
}
