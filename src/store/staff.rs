/// Staff account administration
use serde::Deserialize;

use super::{HospitalStore, StoreInner};
use crate::errors::{QueueError, QueueResult};
use crate::logger::{self, LogTag};
use crate::models::{Doctor, Role, StaffId, StaffMember};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub username: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "node_id")]
    pub node_id: Option<String>,
}

/// Partial update; absent fields keep their current value except `node_id`,
/// which is replaced on every update of a receptionist
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUpdate {
    pub username: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "node_id")]
    pub node_id: Option<String>,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn username_taken(inner: &StoreInner, username: &str, except: Option<StaffId>) -> bool {
    inner
        .staff
        .iter()
        .any(|s| s.username == username && Some(s.id) != except)
}

impl HospitalStore {
    pub async fn list_staff(&self) -> Vec<StaffMember> {
        self.inner.read().await.staff.clone()
    }

    /// Active doctors with the number of patients waiting for each
    pub async fn list_doctors(&self) -> Vec<Doctor> {
        let inner = self.inner.read().await;
        inner
            .staff
            .iter()
            .filter(|s| s.role == Role::Doctor && s.active)
            .map(|s| Doctor {
                id: s.id,
                name: s.name.clone(),
                specialty: self.settings.default_specialty.clone(),
                queue_length: inner.waiting_for_doctor(Some(s.id)),
            })
            .collect()
    }

    pub async fn create_staff(&self, form: NewStaff) -> QueueResult<StaffMember> {
        let (Some(username), Some(name), Some(role)) =
            (required(&form.username), required(&form.name), required(&form.role))
        else {
            return Err(QueueError::missing_fields());
        };
        let role: Role = role.parse()?;

        let mut inner = self.inner.write().await;
        if username_taken(&inner, username, None) {
            return Err(QueueError::Conflict("Username already exists".to_string()));
        }

        let member = inner.push_staff(username, name, role, form.node_id.clone());
        logger::info(
            LogTag::Store,
            &format!("Created staff account {} with role {}", member.username, member.role),
        );
        Ok(member)
    }

    pub async fn update_staff(&self, id: StaffId, update: StaffUpdate) -> QueueResult<StaffMember> {
        let role = match required(&update.role) {
            Some(role) => Some(role.parse::<Role>()?),
            None => None,
        };

        let mut inner = self.inner.write().await;
        if inner.staff_member(id).is_none() {
            return Err(QueueError::staff_not_found());
        }
        if let Some(username) = required(&update.username) {
            if username_taken(&inner, username, Some(id)) {
                return Err(QueueError::Conflict("Username already exists".to_string()));
            }
        }

        let member = inner
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(QueueError::staff_not_found)?;

        if let Some(name) = required(&update.name) {
            member.name = name.to_string();
        }
        if let Some(username) = required(&update.username) {
            member.username = username.to_string();
        }
        if let Some(role) = role {
            member.role = role;
        }
        member.node_id = match member.role {
            Role::Receptionist => update.node_id.clone(),
            _ => None,
        };

        logger::info(LogTag::Store, &format!("Updated staff account {}", member.username));
        Ok(member.clone())
    }

    /// Flip the active flag; the last active admin cannot be deactivated
    pub async fn toggle_staff(&self, id: StaffId) -> QueueResult<StaffMember> {
        let mut inner = self.inner.write().await;
        let active_admins = inner
            .staff
            .iter()
            .filter(|s| s.role == Role::Admin && s.active)
            .count();

        let member = inner
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(QueueError::staff_not_found)?;

        if member.role == Role::Admin && member.active && active_admins <= 1 {
            return Err(QueueError::Validation(
                "Cannot deactivate the last active admin account".to_string(),
            ));
        }
        member.active = !member.active;

        let state = if member.active { "active" } else { "inactive" };
        logger::info(LogTag::Store, &format!("Staff {} is now {}", member.username, state));
        Ok(member.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    fn new_staff(username: &str, role: &str) -> NewStaff {
        NewStaff {
            username: Some(username.to_string()),
            name: Some(format!("{} account", username)),
            role: Some(role.to_string()),
            node_id: Some("node_2".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_staff_keeps_node_only_for_receptionists() {
        let store = seeded_store();

        let desk = store.create_staff(new_staff("desk2", "receptionist")).await.unwrap();
        assert_eq!(desk.node_id.as_deref(), Some("node_2"));
        assert!(desk.active);

        let doc = store.create_staff(new_staff("jones", "doctor")).await.unwrap();
        assert_eq!(doc.node_id, None);
        assert_eq!(store.list_doctors().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_staff_validation() {
        let store = seeded_store();

        let err = store.create_staff(new_staff("admin", "admin")).await.unwrap_err();
        assert_eq!(err, QueueError::Conflict("Username already exists".to_string()));

        let missing = NewStaff {
            role: None,
            ..new_staff("someone", "doctor")
        };
        assert_eq!(store.create_staff(missing).await, Err(QueueError::missing_fields()));

        let err = store.create_staff(new_staff("someone", "janitor")).await.unwrap_err();
        assert!(matches!(err, QueueError::Validation(_)));
    }

    #[test]
    fn test_new_staff_accepts_both_node_id_spellings() {
        let camel: NewStaff = serde_json::from_str(r#"{"nodeId":"node_3"}"#).unwrap();
        let snake: NewStaff = serde_json::from_str(r#"{"node_id":"node_3"}"#).unwrap();
        assert_eq!(camel.node_id.as_deref(), Some("node_3"));
        assert_eq!(snake.node_id.as_deref(), Some("node_3"));
    }

    #[tokio::test]
    async fn test_update_staff_changes_role_and_clears_node() {
        let store = seeded_store();
        let reception = store
            .list_staff()
            .await
            .into_iter()
            .find(|s| s.role == Role::Receptionist)
            .unwrap();

        let update = StaffUpdate {
            role: Some("pharmacist".to_string()),
            ..StaffUpdate::default()
        };
        let updated = store.update_staff(reception.id, update).await.unwrap();
        assert_eq!(updated.role, Role::Pharmacist);
        assert_eq!(updated.node_id, None);
        assert_eq!(updated.username, reception.username);

        let err = store.update_staff(999, StaffUpdate::default()).await.unwrap_err();
        assert_eq!(err, QueueError::staff_not_found());

        let clash = StaffUpdate {
            username: Some("admin".to_string()),
            ..StaffUpdate::default()
        };
        assert!(matches!(
            store.update_staff(reception.id, clash).await,
            Err(QueueError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_last_active_admin_cannot_be_deactivated() {
        let store = seeded_store();
        let admin = store
            .list_staff()
            .await
            .into_iter()
            .find(|s| s.role == Role::Admin)
            .unwrap();

        let err = store.toggle_staff(admin.id).await.unwrap_err();
        assert!(matches!(err, QueueError::Validation(_)));

        let second = store.create_staff(new_staff("root", "admin")).await.unwrap();
        let toggled = store.toggle_staff(admin.id).await.unwrap();
        assert!(!toggled.active);

        // Now `second` is the only active admin
        assert!(store.toggle_staff(second.id).await.is_err());
        assert!(store.toggle_staff(admin.id).await.unwrap().active);
    }

    #[tokio::test]
    async fn test_inactive_doctor_leaves_doctor_list() {
        let store = seeded_store();
        let doctor = default_doctor(&store).await;
        store.toggle_staff(doctor).await.unwrap();

        assert!(store.list_doctors().await.is_empty());
        let err = store.register_patient(new_patient("Asha", doctor)).await.unwrap_err();
        assert!(matches!(err, QueueError::NotFound(_)));
    }
}
