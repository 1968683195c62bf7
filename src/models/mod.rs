/// Domain value records shared by the store, producers and webserver
pub mod patient;
pub mod queue;
pub mod staff;

pub use patient::*;
pub use queue::*;
pub use staff::*;
