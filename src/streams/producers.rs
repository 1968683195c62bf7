/// Snapshot producers backing the live streams
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::QueueResult;
use crate::models::{Patient, PatientStatus, StaffId, SystemStats};
use crate::store::HospitalStore;

/// Supplies the current state of one subject on demand
///
/// Called once when a stream opens and again on every tick. Failures are
/// expected and handled by the publisher according to its configuration.
#[async_trait]
pub trait SnapshotProducer: Send + Sync + 'static {
    type Subject: Send + Sync + 'static;
    type Snapshot: Serialize + Send + 'static;

    /// Short label used in stream logs
    fn name(&self) -> &'static str;

    async fn produce(&self, subject: &Self::Subject) -> QueueResult<Self::Snapshot>;
}

/// Status of one patient, keyed by the raw id from the request path
pub struct PatientStatusProducer {
    store: Arc<HospitalStore>,
}

impl PatientStatusProducer {
    pub fn new(store: Arc<HospitalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SnapshotProducer for PatientStatusProducer {
    type Subject = String;
    type Snapshot = PatientStatus;

    fn name(&self) -> &'static str {
        "patient"
    }

    async fn produce(&self, patient_id: &String) -> QueueResult<PatientStatus> {
        self.store.patient_status(patient_id).await
    }
}

pub struct PharmacyQueueProducer {
    store: Arc<HospitalStore>,
}

impl PharmacyQueueProducer {
    pub fn new(store: Arc<HospitalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SnapshotProducer for PharmacyQueueProducer {
    type Subject = ();
    type Snapshot = Vec<Patient>;

    fn name(&self) -> &'static str {
        "pharmacy-queue"
    }

    async fn produce(&self, _: &()) -> QueueResult<Vec<Patient>> {
        Ok(self.store.pharmacy_queue().await)
    }
}

pub struct SystemStatsProducer {
    store: Arc<HospitalStore>,
}

impl SystemStatsProducer {
    pub fn new(store: Arc<HospitalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SnapshotProducer for SystemStatsProducer {
    type Subject = ();
    type Snapshot = SystemStats;

    fn name(&self) -> &'static str {
        "system-stats"
    }

    async fn produce(&self, _: &()) -> QueueResult<SystemStats> {
        Ok(self.store.system_stats().await)
    }
}

/// Front-desk list of patients waiting for or with a doctor
pub struct WaitingPatientsProducer {
    store: Arc<HospitalStore>,
}

impl WaitingPatientsProducer {
    pub fn new(store: Arc<HospitalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SnapshotProducer for WaitingPatientsProducer {
    type Subject = ();
    type Snapshot = Vec<Patient>;

    fn name(&self) -> &'static str {
        "waiting-patients"
    }

    async fn produce(&self, _: &()) -> QueueResult<Vec<Patient>> {
        Ok(self.store.waiting_patients().await)
    }
}

pub struct DoctorQueueProducer {
    store: Arc<HospitalStore>,
}

impl DoctorQueueProducer {
    pub fn new(store: Arc<HospitalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SnapshotProducer for DoctorQueueProducer {
    type Subject = StaffId;
    type Snapshot = Vec<Patient>;

    fn name(&self) -> &'static str {
        "doctor-queue"
    }

    async fn produce(&self, doctor_id: &StaffId) -> QueueResult<Vec<Patient>> {
        self.store.doctor_queue(*doctor_id).await
    }
}
