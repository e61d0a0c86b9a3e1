//! Audit data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

// ============================================================================
// Audit Query Constants
// ============================================================================

/// Default number of audit entries returned per query
pub const DEFAULT_AUDIT_QUERY_LIMIT: i64 = 100;

/// Maximum number of audit entries that can be returned in a single query.
/// This prevents excessive memory usage and query timeouts.
pub const MAX_AUDIT_QUERY_LIMIT: i64 = 1000;

/// Audit log entry from the database
///
/// Immutable once written. The nullability of `before`/`after` encodes the
/// action: create has no `before`, delete has no `after`, update has both.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: Uuid,
    /// User who performed the action; survives deletion of that user
    pub user_id: Option<Uuid>,
    /// Owning tenant; null when resolution found no organization
    pub organization_id: Option<Uuid>,
    /// Action performed (create, update, delete)
    pub action: String,
    /// Type name of the mutated entity
    pub entity_type: String,
    /// Identifier of the mutated entity, in string form
    pub entity_id: String,
    /// Field snapshot taken strictly before the mutation
    pub before: Option<JsonValue>,
    /// Field snapshot of the resulting row
    pub after: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

/// Audit action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input for appending an audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditEntry {
    pub user_id: Option<Uuid>,
    pub organization_id: Option<Uuid>,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub before: Option<JsonValue>,
    pub after: Option<JsonValue>,
}

/// Query parameters for the tenant-scoped audit listing
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    /// Filter by action
    pub action: Option<AuditAction>,
    /// Filter by entity type name
    pub entity_type: Option<String>,
    /// Maximum number of results to return
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Offset for pagination
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    DEFAULT_AUDIT_QUERY_LIMIT
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            action: None,
            entity_type: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_action_as_str() {
        assert_eq!(AuditAction::Create.as_str(), "create");
        assert_eq!(AuditAction::Update.as_str(), "update");
        assert_eq!(AuditAction::Delete.as_str(), "delete");
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&AuditAction::Create).unwrap();
        assert_eq!(json, r#""create""#);

        let action: AuditAction = serde_json::from_str(r#""update""#).unwrap();
        assert_eq!(action, AuditAction::Update);
    }

    #[test]
    fn test_query_defaults() {
        let query = AuditQuery::default();
        assert_eq!(query.limit, DEFAULT_AUDIT_QUERY_LIMIT);
        assert_eq!(query.offset, 0);
        assert!(query.action.is_none());
    }
}
