/// Patient registration, consultation and pharmacy checkout
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{minutes_between, HospitalStore, PatientRecord, StoreInner};
use crate::errors::{QueueError, QueueResult};
use crate::logger::{self, LogTag};
use crate::models::{
    deserialize_optional_staff_id, Patient, PatientId, PatientStatus, Role, Stage, StaffId,
};

/// Registration form submitted by the front desk
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: Option<String>,
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_staff_id")]
    pub doctor_id: Option<StaffId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredPatient {
    pub patient_id: PatientId,
    pub doctor_name: String,
}

const ID_SPACE: usize = (PatientId::MAX - PatientId::MIN) as usize + 1;

fn generate_patient_id(inner: &StoreInner) -> QueueResult<PatientId> {
    if inner.patients.len() >= ID_SPACE {
        return Err(QueueError::Conflict("No patient IDs left to assign".to_string()));
    }
    let mut rng = rand::thread_rng();
    loop {
        let candidate = PatientId::from_number(rng.gen_range(PatientId::MIN..=PatientId::MAX));
        if inner.patient(&candidate).is_none() {
            return Ok(candidate);
        }
    }
}

/// Split a free-text prescription on commas, dropping blanks
fn parse_prescription(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renumber patients matching `filter` to 1..n, keeping their relative order
fn renumber<F>(inner: &mut StoreInner, filter: F)
where
    F: Fn(&PatientRecord) -> bool,
{
    let mut indices: Vec<usize> = inner
        .patients
        .iter()
        .enumerate()
        .filter(|(_, p)| filter(p))
        .map(|(i, _)| i)
        .collect();
    indices.sort_by_key(|&i| inner.patients[i].queue_position);

    for (position, index) in indices.into_iter().enumerate() {
        inner.patients[index].queue_position = position as u32 + 1;
    }
}

fn owned_patient<'a>(
    inner: &'a mut StoreInner,
    doctor_id: StaffId,
    patient_id: &PatientId,
) -> QueueResult<&'a mut PatientRecord> {
    let patient = inner.patient_mut(patient_id).ok_or_else(QueueError::patient_not_found)?;
    if patient.doctor_id != Some(doctor_id) {
        return Err(QueueError::Forbidden("Patient not assigned to you".to_string()));
    }
    Ok(patient)
}

impl HospitalStore {
    pub async fn register_patient(&self, form: NewPatient) -> QueueResult<RegisteredPatient> {
        self.register_patient_at(form, Utc::now()).await
    }

    pub async fn register_patient_at(
        &self,
        form: NewPatient,
        now: DateTime<Utc>,
    ) -> QueueResult<RegisteredPatient> {
        let name = form.name.as_deref().map(str::trim).unwrap_or_default();
        let doctor_id = match form.doctor_id {
            Some(id) if !name.is_empty() => id,
            _ => return Err(QueueError::missing_fields()),
        };

        let mut inner = self.inner.write().await;

        let doctor_name = inner
            .staff_member(doctor_id)
            .filter(|s| s.role == Role::Doctor && s.active)
            .map(|s| s.name.clone())
            .ok_or_else(|| QueueError::NotFound("Doctor not found".to_string()))?;

        let patient_id = generate_patient_id(&inner)?;
        let queue_position = inner.waiting_for_doctor(Some(doctor_id)) + 1;
        let contact = form.contact.map(|c| c.trim().to_string()).filter(|c| !c.is_empty());

        inner.patients.push(PatientRecord {
            id: patient_id.clone(),
            name: name.to_string(),
            contact,
            stage: Stage::WaitingForDoctor,
            doctor_id: Some(doctor_id),
            registered_at: now,
            queue_position,
            prescriptions: Vec::new(),
        });

        logger::info(
            LogTag::Store,
            &format!(
                "Registered patient {} with {} at position {}",
                patient_id, doctor_name, queue_position
            ),
        );

        Ok(RegisteredPatient {
            patient_id,
            doctor_name,
        })
    }

    pub async fn start_consultation(
        &self,
        doctor_id: StaffId,
        patient_id: &PatientId,
    ) -> QueueResult<()> {
        let mut inner = self.inner.write().await;
        let patient = owned_patient(&mut inner, doctor_id, patient_id)?;

        if patient.stage != Stage::WaitingForDoctor {
            return Err(QueueError::Conflict(format!("Patient is {}", patient.stage)));
        }
        patient.stage = Stage::InConsultation;

        logger::debug(LogTag::Store, &format!("Consultation started for {}", patient_id));
        Ok(())
    }

    /// Hand the patient over to the pharmacy
    ///
    /// The doctor's remaining waiting patients move up and the patient joins the
    /// end of the pharmacy queue.
    pub async fn complete_consultation(
        &self,
        doctor_id: StaffId,
        patient_id: &PatientId,
        prescription: Option<&str>,
    ) -> QueueResult<()> {
        let mut inner = self.inner.write().await;
        let pharmacy_position = inner.in_stage(Stage::ReadyForPharmacy) + 1;

        let patient = owned_patient(&mut inner, doctor_id, patient_id)?;
        if !matches!(patient.stage, Stage::WaitingForDoctor | Stage::InConsultation) {
            return Err(QueueError::Conflict(format!("Patient is {}", patient.stage)));
        }

        patient.stage = Stage::ReadyForPharmacy;
        patient.queue_position = pharmacy_position;
        if let Some(text) = prescription {
            patient.prescriptions.extend(parse_prescription(text));
        }

        renumber(&mut inner, |p| {
            p.stage == Stage::WaitingForDoctor && p.doctor_id == Some(doctor_id)
        });

        logger::info(
            LogTag::Store,
            &format!("Patient {} ready for pharmacy at position {}", patient_id, pharmacy_position),
        );
        Ok(())
    }

    pub async fn complete_pharmacy(&self, patient_id: &PatientId) -> QueueResult<()> {
        let mut inner = self.inner.write().await;
        let patient = inner.patient_mut(patient_id).ok_or_else(QueueError::patient_not_found)?;

        if patient.stage != Stage::ReadyForPharmacy {
            return Err(QueueError::Conflict(format!("Patient is {}", patient.stage)));
        }
        patient.stage = Stage::CheckedOut;
        patient.queue_position = 0;

        renumber(&mut inner, |p| p.stage == Stage::ReadyForPharmacy);

        logger::info(LogTag::Store, &format!("Patient {} checked out", patient_id));
        Ok(())
    }

    /// Status snapshot for the patient-facing view
    ///
    /// `total_in_queue` is the assigned doctor's waiting list whatever the
    /// patient's own stage. Unknown and malformed ids both resolve to
    /// "Patient not found".
    pub async fn patient_status(&self, patient_id: &str) -> QueueResult<PatientStatus> {
        let id: PatientId = patient_id.parse().map_err(|_| QueueError::patient_not_found())?;
        let inner = self.inner.read().await;
        let patient = inner.patient(&id).ok_or_else(QueueError::patient_not_found)?;

        Ok(PatientStatus {
            patient_name: patient.name.clone(),
            stage: patient.stage,
            queue_position: patient.queue_position,
            total_in_queue: inner.waiting_for_doctor(patient.doctor_id),
            estimated_wait_time: self.estimated_wait(patient.queue_position),
            assigned_doctor: inner.doctor_name(patient.doctor_id),
            assigned_counter: None,
            prescriptions: Some(patient.prescriptions.clone()),
        })
    }

    /// Patients waiting for or currently with a doctor, in arrival order
    pub async fn waiting_patients(&self) -> Vec<Patient> {
        let inner = self.inner.read().await;
        inner
            .patients
            .iter()
            .filter(|p| matches!(p.stage, Stage::WaitingForDoctor | Stage::InConsultation))
            .map(|p| Patient {
                id: p.id.clone(),
                name: p.name.clone(),
                contact: None,
                assigned_doctor: Some(
                    inner.doctor_name(p.doctor_id).unwrap_or_else(|| "Unassigned".to_string()),
                ),
                queue_position: p.queue_position,
                estimated_wait_time: Some(self.estimated_wait(p.queue_position)),
                wait_time: None,
                prescription: None,
                status: Some(p.stage),
            })
            .collect()
    }

    pub async fn doctor_queue(&self, doctor_id: StaffId) -> QueueResult<Vec<Patient>> {
        self.doctor_queue_at(doctor_id, Utc::now()).await
    }

    pub async fn doctor_queue_at(
        &self,
        doctor_id: StaffId,
        now: DateTime<Utc>,
    ) -> QueueResult<Vec<Patient>> {
        let inner = self.inner.read().await;
        if !inner.staff_member(doctor_id).is_some_and(|s| s.role == Role::Doctor) {
            return Err(QueueError::NotFound("Doctor not found".to_string()));
        }

        let mut queue: Vec<&PatientRecord> = inner
            .patients
            .iter()
            .filter(|p| p.stage == Stage::WaitingForDoctor && p.doctor_id == Some(doctor_id))
            .collect();
        queue.sort_by_key(|p| p.queue_position);

        Ok(queue
            .into_iter()
            .map(|p| Patient {
                id: p.id.clone(),
                name: p.name.clone(),
                contact: p.contact.clone(),
                assigned_doctor: None,
                queue_position: p.queue_position,
                estimated_wait_time: None,
                wait_time: Some(minutes_between(p.registered_at, now)),
                prescription: None,
                status: None,
            })
            .collect())
    }

    pub async fn pharmacy_queue(&self) -> Vec<Patient> {
        let inner = self.inner.read().await;
        let mut queue: Vec<&PatientRecord> = inner
            .patients
            .iter()
            .filter(|p| p.stage == Stage::ReadyForPharmacy)
            .collect();
        queue.sort_by_key(|p| p.queue_position);

        queue
            .into_iter()
            .map(|p| Patient {
                id: p.id.clone(),
                name: p.name.clone(),
                contact: p.contact.clone(),
                assigned_doctor: None,
                queue_position: p.queue_position,
                estimated_wait_time: None,
                wait_time: None,
                prescription: Some(p.prescriptions.join(", ")),
                status: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_parse_prescription_trims_and_drops_blanks() {
        assert_eq!(
            parse_prescription(" Paracetamol 500mg, ,Amoxicillin ,"),
            vec!["Paracetamol 500mg", "Amoxicillin"]
        );
        assert!(parse_prescription("").is_empty());
    }

    #[tokio::test]
    async fn test_registration_positions_are_sequential_per_doctor() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;

        let first = store.register_patient(new_patient("Asha", doctor)).await.unwrap();
        let second = store.register_patient(new_patient("Ben", doctor)).await.unwrap();

        assert_ne!(first.patient_id, second.patient_id);
        assert_eq!(first.doctor_name, "Dr. Smith");

        let status = store.patient_status(second.patient_id.as_str()).await.unwrap();
        assert_eq!(status.queue_position, 2);
        assert_eq!(status.total_in_queue, 2);
        assert_eq!(status.estimated_wait_time, 10);
        assert_eq!(status.stage, Stage::WaitingForDoctor);
        assert_eq!(status.prescriptions, Some(vec![]));
    }

    #[tokio::test]
    async fn test_registration_rejects_missing_fields_and_unknown_doctor() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;

        let blank = NewPatient {
            name: Some("   ".to_string()),
            contact: None,
            doctor_id: Some(doctor),
        };
        assert_eq!(store.register_patient(blank).await, Err(QueueError::missing_fields()));

        let no_doctor = NewPatient {
            name: Some("Asha".to_string()),
            ..NewPatient::default()
        };
        assert_eq!(store.register_patient(no_doctor).await, Err(QueueError::missing_fields()));

        let err = store.register_patient(new_patient("Asha", 999)).await.unwrap_err();
        assert!(matches!(err, QueueError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_complete_consultation_moves_patient_to_pharmacy() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;
        let a = store.register_patient(new_patient("Asha", doctor)).await.unwrap().patient_id;
        let b = store.register_patient(new_patient("Ben", doctor)).await.unwrap().patient_id;
        let c = store.register_patient(new_patient("Chen", doctor)).await.unwrap().patient_id;

        store.start_consultation(doctor, &a).await.unwrap();
        store
            .complete_consultation(doctor, &a, Some("Ibuprofen, Vitamin D"))
            .await
            .unwrap();

        let moved = store.patient_status(a.as_str()).await.unwrap();
        assert_eq!(moved.stage, Stage::ReadyForPharmacy);
        assert_eq!(moved.queue_position, 1);
        // Still the doctor's waiting list, not the pharmacy queue
        assert_eq!(moved.total_in_queue, 2);
        assert_eq!(
            moved.prescriptions,
            Some(vec!["Ibuprofen".to_string(), "Vitamin D".to_string()])
        );

        // Remaining doctor queue moved up
        let queue = store.doctor_queue(doctor).await.unwrap();
        let positions: Vec<(PatientId, u32)> =
            queue.iter().map(|p| (p.id.clone(), p.queue_position)).collect();
        assert_eq!(positions, vec![(b.clone(), 1), (c.clone(), 2)]);

        let pharmacy = store.pharmacy_queue().await;
        assert_eq!(pharmacy.len(), 1);
        assert_eq!(pharmacy[0].prescription.as_deref(), Some("Ibuprofen, Vitamin D"));
    }

    #[tokio::test]
    async fn test_consultation_requires_assigned_doctor() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;
        let id = store.register_patient(new_patient("Asha", doctor)).await.unwrap().patient_id;

        let err = store.start_consultation(doctor + 100, &id).await.unwrap_err();
        assert!(matches!(err, QueueError::Forbidden(_)));

        let unknown: PatientId = "0000".parse().unwrap();
        let err = store.complete_consultation(doctor, &unknown, None).await.unwrap_err();
        assert_eq!(err, QueueError::patient_not_found());
    }

    #[tokio::test]
    async fn test_pharmacy_checkout_renumbers_remaining() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;
        let mut ids = Vec::new();
        for name in ["Asha", "Ben", "Chen"] {
            let id = store.register_patient(new_patient(name, doctor)).await.unwrap().patient_id;
            store.complete_consultation(doctor, &id, None).await.unwrap();
            ids.push(id);
        }

        store.complete_pharmacy(&ids[0]).await.unwrap();

        let done = store.patient_status(ids[0].as_str()).await.unwrap();
        assert_eq!(done.stage, Stage::CheckedOut);
        assert_eq!(done.queue_position, 0);
        assert_eq!(done.total_in_queue, 0);

        let late = store.register_patient(new_patient("Dev", doctor)).await.unwrap().patient_id;
        let ready = store.patient_status(ids[1].as_str()).await.unwrap();
        assert_eq!(ready.stage, Stage::ReadyForPharmacy);
        assert_eq!(ready.total_in_queue, 1);
        let done = store.patient_status(ids[0].as_str()).await.unwrap();
        assert_eq!(done.total_in_queue, 1);
        assert_eq!(store.patient_status(late.as_str()).await.unwrap().queue_position, 1);

        let pharmacy = store.pharmacy_queue().await;
        let positions: Vec<u32> = pharmacy.iter().map(|p| p.queue_position).collect();
        assert_eq!(positions, vec![1, 2]);
        assert_eq!(pharmacy[0].id, ids[1]);

        // A second checkout of the same patient is refused
        let err = store.complete_pharmacy(&ids[0]).await.unwrap_err();
        assert!(matches!(err, QueueError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_patient_status_for_unknown_or_malformed_id() {
        let store = seeded_store();
        assert_eq!(store.patient_status("0000").await, Err(QueueError::patient_not_found()));
        assert_eq!(store.patient_status("abc").await, Err(QueueError::patient_not_found()));
    }

    #[tokio::test]
    async fn test_doctor_queue_reports_minutes_waited() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;
        let registered = Utc::now();
        store
            .register_patient_at(new_patient("Asha", doctor), registered)
            .await
            .unwrap();

        let queue = store
            .doctor_queue_at(doctor, registered + Duration::seconds(17 * 60 + 59))
            .await
            .unwrap();
        assert_eq!(queue[0].wait_time, Some(17));

        assert!(store.doctor_queue(doctor + 100).await.is_err());
    }

    #[tokio::test]
    async fn test_waiting_patients_include_consultations_in_arrival_order() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;
        let a = store.register_patient(new_patient("Asha", doctor)).await.unwrap().patient_id;
        let b = store.register_patient(new_patient("Ben", doctor)).await.unwrap().patient_id;
        store.start_consultation(doctor, &a).await.unwrap();

        let waiting = store.waiting_patients().await;
        assert_eq!(waiting.len(), 2);
        assert_eq!(waiting[0].id, a);
        assert_eq!(waiting[0].status, Some(Stage::InConsultation));
        assert_eq!(waiting[1].id, b);
        assert_eq!(waiting[1].assigned_doctor.as_deref(), Some("Dr. Smith"));
        assert_eq!(waiting[1].estimated_wait_time, Some(10));
    }
}
