/// Patient records and the treatment pipeline
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::QueueError;

/// Position in the treatment pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Waiting for Doctor")]
    WaitingForDoctor,
    #[serde(rename = "In Consultation")]
    InConsultation,
    #[serde(rename = "Ready for Pharmacy")]
    ReadyForPharmacy,
    #[serde(rename = "Checked Out")]
    CheckedOut,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::WaitingForDoctor => "Waiting for Doctor",
            Stage::InConsultation => "In Consultation",
            Stage::ReadyForPharmacy => "Ready for Pharmacy",
            Stage::CheckedOut => "Checked Out",
        }
    }

    /// Still inside the building
    pub fn is_active(&self) -> bool {
        !matches!(self, Stage::CheckedOut)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Public 4-digit patient identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatientId(String);

impl PatientId {
    pub const MIN: u16 = 1000;
    pub const MAX: u16 = 9999;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_number(n: u16) -> Self {
        PatientId(format!("{:04}", n))
    }
}

impl FromStr for PatientId {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(PatientId(s.to_string()))
        } else {
            Err(QueueError::Validation("Patient ID must be exactly 4 digits".to_string()))
        }
    }
}

impl TryFrom<String> for PatientId {
    type Error = QueueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PatientId> for String {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot pushed on the patient stream and returned by the status endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientStatus {
    pub patient_name: String,
    pub stage: Stage,
    pub queue_position: u32,
    pub total_in_queue: u32,
    pub estimated_wait_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_doctor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_counter: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescriptions: Option<Vec<String>>,
}

/// Flat list row used by the receptionist, doctor and pharmacy views
///
/// Each view fills the subset of optional fields it displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: PatientId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_doctor: Option<String>,
    pub queue_position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_wait_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Stage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_serializes_as_display_label() {
        assert_eq!(
            serde_json::to_string(&Stage::ReadyForPharmacy).unwrap(),
            "\"Ready for Pharmacy\""
        );
        let stage: Stage = serde_json::from_str("\"Checked Out\"").unwrap();
        assert_eq!(stage, Stage::CheckedOut);
        assert!(!stage.is_active());
    }

    #[test]
    fn test_patient_id_requires_four_digits() {
        assert!("3892".parse::<PatientId>().is_ok());
        assert!("0000".parse::<PatientId>().is_ok());
        assert!("389".parse::<PatientId>().is_err());
        assert!("38921".parse::<PatientId>().is_err());
        assert!("38a2".parse::<PatientId>().is_err());
        assert!("３８９２".parse::<PatientId>().is_err());
    }

    #[test]
    fn test_patient_status_wire_shape() {
        let status = PatientStatus {
            patient_name: "Asha Rao".to_string(),
            stage: Stage::WaitingForDoctor,
            queue_position: 3,
            total_in_queue: 10,
            estimated_wait_time: 15,
            assigned_doctor: Some("Dr. Smith".to_string()),
            assigned_counter: None,
            prescriptions: None,
        };

        assert_eq!(
            serde_json::to_string(&status).unwrap(),
            r#"{"patientName":"Asha Rao","stage":"Waiting for Doctor","queuePosition":3,"totalInQueue":10,"estimatedWaitTime":15,"assignedDoctor":"Dr. Smith"}"#
        );
    }
}
