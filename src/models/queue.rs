/// Queue load and system-wide statistics
use serde::{Deserialize, Serialize};

/// Load label of a queue, derived only from how many patients are waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueLoad {
    Normal,
    Busy,
    Overloaded,
}

impl QueueLoad {
    /// 0-5 Normal, 6-10 Busy, 11+ Overloaded
    pub fn from_waiting(patients_waiting: u32) -> Self {
        if patients_waiting > 10 {
            QueueLoad::Overloaded
        } else if patients_waiting > 5 {
            QueueLoad::Busy
        } else {
            QueueLoad::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub name: String,
    pub patients_waiting: u32,
    pub average_wait_time: u32,
    pub status: QueueLoad,
}

impl QueueStatus {
    pub fn new(name: impl Into<String>, patients_waiting: u32, average_wait_time: u32) -> Self {
        Self {
            name: name.into(),
            patients_waiting,
            average_wait_time,
            status: QueueLoad::from_waiting(patients_waiting),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub total_patients_today: u32,
    pub active_patients: u32,
    pub average_wait_time: u32,
    pub system_status: String,
    pub queues: Vec<QueueStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_load_thresholds() {
        for waiting in 0..=5 {
            assert_eq!(QueueLoad::from_waiting(waiting), QueueLoad::Normal);
        }
        for waiting in 6..=10 {
            assert_eq!(QueueLoad::from_waiting(waiting), QueueLoad::Busy);
        }
        assert_eq!(QueueLoad::from_waiting(11), QueueLoad::Overloaded);
        assert_eq!(QueueLoad::from_waiting(400), QueueLoad::Overloaded);
    }

    #[test]
    fn test_system_stats_wire_shape() {
        let stats = SystemStats {
            total_patients_today: 4,
            active_patients: 3,
            average_wait_time: 7,
            system_status: "Operational".to_string(),
            queues: vec![QueueStatus::new("Doctor Queue", 6, 7)],
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["activePatients"], 3);
        assert_eq!(json["queues"][0]["patientsWaiting"], 6);
        assert_eq!(json["queues"][0]["status"], "Busy");
    }
}
