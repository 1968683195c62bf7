/// Configuration schemas - every config structure defined once with defaults
use std::time::Duration;

use crate::errors::{QueueError, QueueResult};

// ============================================================================
// WEBSERVER CONFIGURATION
// ============================================================================

config_struct! {
    /// HTTP listener configuration
    pub struct WebserverConfig {
        /// IP to bind: 127.0.0.1 = localhost only, 0.0.0.0 = all interfaces
        host: String = "127.0.0.1".to_string(),

        port: u16 = 8080,

        /// Allow cross-origin requests from the staff and patient front-ends
        cors_enabled: bool = true,
    }
}

// ============================================================================
// STREAMS CONFIGURATION
// ============================================================================

config_struct! {
    /// Status stream cadence
    pub struct StreamsConfig {
        patient_interval_ms: u64 = 5_000,
        pharmacy_interval_ms: u64 = 5_000,
        stats_interval_ms: u64 = 10_000,

        /// Front-desk and per-doctor queue views
        queue_interval_ms: u64 = 5_000,

        /// Simulated jitter on the stats stream; switch off once a live producer
        /// is wired in
        stats_jitter_enabled: bool = true,

        /// Frames buffered per connection before the publisher waits on the client
        frame_buffer: usize = 16,
    }
}

// ============================================================================
// QUEUE CONFIGURATION
// ============================================================================

config_struct! {
    /// Queue arithmetic and store bootstrap
    pub struct QueueConfig {
        /// Estimated consultation time per patient ahead in the queue
        minutes_per_patient: u32 = 5,

        /// Reported average wait for the pharmacy queue
        pharmacy_average_wait_minutes: u32 = 10,

        default_specialty: String = "General Medicine".to_string(),

        /// Create the admin/receptionist/doctor/pharmacist accounts at startup
        seed_default_staff: bool = true,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Root configuration structure containing all sub-configurations
    pub struct Config {
        webserver: WebserverConfig = WebserverConfig::default(),
        streams: StreamsConfig = StreamsConfig::default(),
        queue: QueueConfig = QueueConfig::default(),
    }
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl WebserverConfig {
    pub fn validate(&self) -> QueueResult<()> {
        if self.host.trim().is_empty() {
            return Err(QueueError::Config("Host cannot be empty".to_string()));
        }
        if self.port == 0 {
            return Err(QueueError::Config("Port cannot be 0".to_string()));
        }
        Ok(())
    }

    /// Get the full bind address (host:port)
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl StreamsConfig {
    pub fn validate(&self) -> QueueResult<()> {
        let intervals = [
            ("patient_interval_ms", self.patient_interval_ms),
            ("pharmacy_interval_ms", self.pharmacy_interval_ms),
            ("stats_interval_ms", self.stats_interval_ms),
            ("queue_interval_ms", self.queue_interval_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(QueueError::Config(format!("streams.{} must be > 0", field)));
            }
        }
        if self.frame_buffer == 0 {
            return Err(QueueError::Config("streams.frame_buffer must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn patient_interval(&self) -> Duration {
        Duration::from_millis(self.patient_interval_ms)
    }

    pub fn pharmacy_interval(&self) -> Duration {
        Duration::from_millis(self.pharmacy_interval_ms)
    }

    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval_ms)
    }

    pub fn queue_interval(&self) -> Duration {
        Duration::from_millis(self.queue_interval_ms)
    }
}

impl Config {
    pub fn validate(&self) -> QueueResult<()> {
        self.webserver.validate()?;
        self.streams.validate()?;
        Ok(())
    }
}
