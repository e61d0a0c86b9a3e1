//! Project entity and its audit descriptor

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::audit::{Auditable, EntityDescriptor, FieldDescriptor, TenantRef};

/// A project within an organization
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: Option<Uuid>,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complete persisted schema of a project, in column order
static PROJECT_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_type: "project",
    fields: &[
        FieldDescriptor::scalar("id"),
        FieldDescriptor::relation("organization_id"),
        FieldDescriptor::scalar("name"),
        FieldDescriptor::scalar("description"),
        FieldDescriptor::relation("owner_id"),
        FieldDescriptor::scalar("status"),
        FieldDescriptor::scalar("start_date"),
        FieldDescriptor::scalar("end_date"),
        FieldDescriptor::scalar("created_at"),
        FieldDescriptor::scalar("updated_at"),
    ],
};

impl Auditable for Project {
    fn descriptor() -> &'static EntityDescriptor {
        &PROJECT_DESCRIPTOR
    }

    fn entity_id(&self) -> String {
        self.id.to_string()
    }

    fn tenant_refs(&self) -> Vec<TenantRef> {
        vec![TenantRef::direct(Some(self.organization_id))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::snapshot;

    #[test]
    fn test_snapshot_covers_full_schema() {
        let project = Project {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Website relaunch".to_string(),
            description: String::new(),
            owner_id: None,
            status: "planned".to_string(),
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = snapshot(&project).unwrap();
        let object = snapshot.as_object().unwrap();
        assert_eq!(object.len(), 10);
        assert!(object["owner_id"].is_null());
        assert_eq!(object["status"], serde_json::json!("planned"));
    }
}
