//! Live status streams
//!
//! Each stream pairs a [`SnapshotProducer`] with a [`StreamConfig`] and is
//! served to exactly one client as server-sent events.

mod frame;
mod jitter;
mod producers;
mod publisher;

pub use frame::{encode_frame, FrameStream};
pub use jitter::apply_stats_jitter;
pub use producers::{
    DoctorQueueProducer, PatientStatusProducer, PharmacyQueueProducer, SnapshotProducer,
    SystemStatsProducer, WaitingPatientsProducer,
};
pub use publisher::{open_stream, StreamConfig, TickTransform};
