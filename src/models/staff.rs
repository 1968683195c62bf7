/// Staff accounts and doctors
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::QueueError;

pub type StaffId = u32;

/// Optional staff id sent either as a JSON number or as a numeric string
///
/// Form selects post ids as strings; an empty string counts as absent.
pub fn deserialize_optional_staff_id<'de, D>(deserializer: D) -> Result<Option<StaffId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(StaffId),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid staff id: {}", text)))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Receptionist,
    Doctor,
    Pharmacist,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Receptionist => "receptionist",
            Role::Doctor => "doctor",
            Role::Pharmacist => "pharmacist",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "receptionist" => Ok(Role::Receptionist),
            "doctor" => Ok(Role::Doctor),
            "pharmacist" => Ok(Role::Pharmacist),
            "admin" => Ok(Role::Admin),
            other => Err(QueueError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    pub username: String,
    pub role: Role,
    pub active: bool,
    /// Front-desk node, receptionists only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: StaffId,
    pub name: String,
    pub specialty: String,
    pub queue_length: u32,
}
