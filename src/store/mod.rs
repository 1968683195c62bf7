//! In-memory hospital store
//!
//! Holds patients and staff for one process lifetime. The store is created at
//! startup, shared through the webserver state as an `Arc`, and dropped at
//! shutdown; nothing is persisted. Every operation takes the lock for exactly
//! one read or one mutation.

mod patients;
mod staff;
mod stats;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::config::QueueConfig;
use crate::logger::{self, LogTag};
use crate::models::{PatientId, Role, Stage, StaffId, StaffMember};

pub use patients::{NewPatient, RegisteredPatient};
pub use staff::{NewStaff, StaffUpdate};

/// Stored patient; list rows and status snapshots are projections of this
#[derive(Debug, Clone)]
pub(crate) struct PatientRecord {
    pub id: PatientId,
    pub name: String,
    pub contact: Option<String>,
    pub stage: Stage,
    pub doctor_id: Option<StaffId>,
    pub registered_at: DateTime<Utc>,
    /// Position in whichever queue the stage implies; 0 once checked out
    pub queue_position: u32,
    pub prescriptions: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    /// Registration order
    pub patients: Vec<PatientRecord>,
    pub staff: Vec<StaffMember>,
    pub next_staff_id: StaffId,
}

impl StoreInner {
    fn patient(&self, id: &PatientId) -> Option<&PatientRecord> {
        self.patients.iter().find(|p| &p.id == id)
    }

    fn patient_mut(&mut self, id: &PatientId) -> Option<&mut PatientRecord> {
        self.patients.iter_mut().find(|p| &p.id == id)
    }

    fn staff_member(&self, id: StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }

    fn doctor_name(&self, id: Option<StaffId>) -> Option<String> {
        id.and_then(|id| self.staff_member(id)).map(|s| s.name.clone())
    }

    fn waiting_for_doctor(&self, doctor_id: Option<StaffId>) -> u32 {
        self.patients
            .iter()
            .filter(|p| p.stage == Stage::WaitingForDoctor && p.doctor_id == doctor_id)
            .count() as u32
    }

    fn in_stage(&self, stage: Stage) -> u32 {
        self.patients.iter().filter(|p| p.stage == stage).count() as u32
    }

    fn push_staff(
        &mut self,
        username: &str,
        name: &str,
        role: Role,
        node_id: Option<String>,
    ) -> StaffMember {
        self.next_staff_id += 1;
        let member = StaffMember {
            id: self.next_staff_id,
            name: name.to_string(),
            username: username.to_string(),
            role,
            active: true,
            node_id: if role == Role::Receptionist { node_id } else { None },
        };
        self.staff.push(member.clone());
        member
    }
}

pub struct HospitalStore {
    inner: RwLock<StoreInner>,
    settings: QueueConfig,
}

impl HospitalStore {
    /// Empty store
    pub fn new(settings: QueueConfig) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            settings,
        }
    }

    /// Store bootstrapped per `settings.seed_default_staff`
    pub fn bootstrap(settings: QueueConfig) -> Self {
        let seed = settings.seed_default_staff;
        let store = Self::new(settings);
        if seed {
            store.seed_default_staff();
        }
        store
    }

    /// Default accounts: one admin, receptionist, doctor and pharmacist
    pub fn seed_default_staff(&self) {
        // Only reachable before the store is shared, so the lock is free
        let Ok(mut inner) = self.inner.try_write() else {
            logger::warning(LogTag::Store, "Store busy, skipping default staff seeding");
            return;
        };

        let defaults = [
            ("admin", "Administrator", Role::Admin, None),
            ("reception", "Receptionist", Role::Receptionist, Some("node_1".to_string())),
            ("doctor", "Dr. Smith", Role::Doctor, None),
            ("pharmacy", "Pharmacist", Role::Pharmacist, None),
        ];
        for (username, name, role, node_id) in defaults {
            if inner.staff.iter().any(|s| s.username == username) {
                continue;
            }
            inner.push_staff(username, name, role, node_id);
        }

        logger::info(LogTag::Store, &format!("Seeded {} staff accounts", inner.staff.len()));
    }

    pub fn settings(&self) -> &QueueConfig {
        &self.settings
    }

    fn estimated_wait(&self, queue_position: u32) -> u32 {
        queue_position.saturating_mul(self.settings.minutes_per_patient)
    }
}

/// Whole minutes between two instants, never negative
fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    (to - from).num_minutes().max(0) as u32
}
