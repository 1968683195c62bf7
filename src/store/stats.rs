/// Hospital-wide statistics
use chrono::{DateTime, Utc};

use super::{minutes_between, HospitalStore};
use crate::models::{QueueStatus, Stage, SystemStats};

pub const DOCTOR_QUEUE: &str = "Doctor Queue";
pub const PHARMACY_QUEUE: &str = "Pharmacy Queue";

impl HospitalStore {
    pub async fn system_stats(&self) -> SystemStats {
        self.system_stats_at(Utc::now()).await
    }

    pub async fn system_stats_at(&self, now: DateTime<Utc>) -> SystemStats {
        let inner = self.inner.read().await;
        let today = now.date_naive();

        let total_patients_today = inner
            .patients
            .iter()
            .filter(|p| p.registered_at.date_naive() == today)
            .count() as u32;
        let active_patients = inner.patients.iter().filter(|p| p.stage.is_active()).count() as u32;

        let waits: Vec<u32> = inner
            .patients
            .iter()
            .filter(|p| p.stage == Stage::WaitingForDoctor)
            .map(|p| minutes_between(p.registered_at, now))
            .collect();
        let average_wait_time = if waits.is_empty() {
            0
        } else {
            waits.iter().sum::<u32>() / waits.len() as u32
        };

        SystemStats {
            total_patients_today,
            active_patients,
            average_wait_time,
            system_status: "Operational".to_string(),
            queues: vec![
                QueueStatus::new(DOCTOR_QUEUE, waits.len() as u32, average_wait_time),
                QueueStatus::new(
                    PHARMACY_QUEUE,
                    inner.in_stage(Stage::ReadyForPharmacy),
                    self.settings.pharmacy_average_wait_minutes,
                ),
            ],
        }
    }
}
