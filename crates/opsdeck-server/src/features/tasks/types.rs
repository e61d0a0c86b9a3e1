//! Task and task comment entities and their audit descriptors

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::audit::{Auditable, EntityDescriptor, FieldDescriptor, TenantRef};

/// A task within an organization, attached to a project
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub assignee_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
    pub priority: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Complete persisted schema of a task, in column order
static TASK_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_type: "task",
    fields: &[
        FieldDescriptor::scalar("id"),
        FieldDescriptor::relation("organization_id"),
        FieldDescriptor::relation("project_id"),
        FieldDescriptor::scalar("title"),
        FieldDescriptor::scalar("description"),
        FieldDescriptor::scalar("status"),
        FieldDescriptor::relation("assignee_id"),
        FieldDescriptor::scalar("due_date"),
        FieldDescriptor::scalar("priority"),
        FieldDescriptor::scalar("sort_order"),
        FieldDescriptor::scalar("created_at"),
        FieldDescriptor::scalar("updated_at"),
    ],
};

impl Auditable for Task {
    fn descriptor() -> &'static EntityDescriptor {
        &TASK_DESCRIPTOR
    }

    fn entity_id(&self) -> String {
        self.id.to_string()
    }

    fn tenant_refs(&self) -> Vec<TenantRef> {
        vec![TenantRef::direct(Some(self.organization_id))]
    }
}

/// A comment on a task
///
/// Comments carry no tenant field of their own; ownership is resolved one
/// hop away through the task. Queries materialize that hop as
/// `task_organization_id`, which is a join artifact, not part of the
/// comment's persisted schema.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskComment {
    pub id: Uuid,
    pub task_id: Uuid,
    pub author_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub task_organization_id: Option<Uuid>,
}

/// Complete persisted schema of a task comment, in column order
static TASK_COMMENT_DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity_type: "task_comment",
    fields: &[
        FieldDescriptor::scalar("id"),
        FieldDescriptor::relation("task_id"),
        FieldDescriptor::relation("author_id"),
        FieldDescriptor::scalar("body"),
        FieldDescriptor::scalar("created_at"),
        FieldDescriptor::scalar("updated_at"),
    ],
};

impl Auditable for TaskComment {
    fn descriptor() -> &'static EntityDescriptor {
        &TASK_COMMENT_DESCRIPTOR
    }

    fn entity_id(&self) -> String {
        self.id.to_string()
    }

    fn tenant_refs(&self) -> Vec<TenantRef> {
        vec![TenantRef::through("task", self.task_organization_id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{resolve_tenant, snapshot};
    use crate::tenancy::RequestContext;

    fn comment(task_organization_id: Option<Uuid>) -> TaskComment {
        TaskComment {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            body: "Looks good".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            task_organization_id,
        }
    }

    #[test]
    fn test_comment_snapshot_excludes_join_artifact() {
        let snapshot = snapshot(&comment(Some(Uuid::new_v4()))).unwrap();
        let object = snapshot.as_object().unwrap();
        assert_eq!(object.len(), 6);
        assert!(!object.contains_key("task_organization_id"));
    }

    #[test]
    fn test_comment_tenant_resolves_through_task() {
        let org_id = Uuid::new_v4();
        let comment = comment(Some(org_id));
        assert_eq!(
            resolve_tenant(&comment, &RequestContext::default()),
            Some(org_id)
        );
    }
}
