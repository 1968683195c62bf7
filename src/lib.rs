pub mod arguments;
pub mod config;
pub mod errors;
pub mod logger;
pub mod models;
pub mod paths;
pub mod store;
pub mod streams;
pub mod webserver;
