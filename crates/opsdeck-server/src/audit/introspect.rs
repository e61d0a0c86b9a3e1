//! Entity introspection for audit snapshots and tenant resolution
//!
//! Every audited entity registers a static [`EntityDescriptor`]: the ordered
//! list of its persisted fields with relation markers. [`snapshot`] projects
//! the entity's serde representation through that descriptor, so a field
//! missing from the serialization - a drifted descriptor - is caught as a
//! [`SnapshotError`] instead of silently producing an incomplete audit
//! record.
//!
//! Tenant ownership is resolved from an explicit, ordered list of references
//! returned by [`Auditable::tenant_refs`]: the entity's own organization
//! field first, then any one-hop parent references, with the ambient request
//! organization as the final fallback. The first present reference wins;
//! both functions are pure and deterministic over their inputs.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use uuid::Uuid;

use crate::tenancy::RequestContext;

/// Kind of a persisted field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain column value
    Scalar,
    /// Reference to another entity; snapshots carry the identifier only
    Relation,
}

/// One persisted field of an entity's declared schema
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Scalar,
        }
    }

    pub const fn relation(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Relation,
        }
    }
}

/// Static description of an audited entity type
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Stable type name stored in audit entries
    pub entity_type: &'static str,
    /// All persisted fields, in schema order
    pub fields: &'static [FieldDescriptor],
}

/// One candidate tenant reference, in resolution order
#[derive(Debug, Clone, Copy)]
pub struct TenantRef {
    /// Field the reference was derived from, for diagnostics
    pub via: &'static str,
    pub organization_id: Option<Uuid>,
}

impl TenantRef {
    /// Reference through the entity's own organization field
    pub fn direct(organization_id: Option<Uuid>) -> Self {
        Self {
            via: "organization_id",
            organization_id,
        }
    }

    /// Reference one hop away through a parent entity
    pub fn through(via: &'static str, organization_id: Option<Uuid>) -> Self {
        Self {
            via,
            organization_id,
        }
    }
}

/// Errors produced while capturing a snapshot
///
/// These are fatal to the audit step only; the business mutation they were
/// attached to is unaffected.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to serialize {entity_type} for snapshot: {source}")]
    Serialize {
        entity_type: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{entity_type} did not serialize to an object")]
    NotAnObject { entity_type: &'static str },

    #[error("{entity_type} snapshot is missing declared field '{field}'")]
    MissingField {
        entity_type: &'static str,
        field: &'static str,
    },

    #[error("{entity_type} relation field '{field}' did not serialize to an identifier")]
    NotAnIdentifier {
        entity_type: &'static str,
        field: &'static str,
    },
}

/// An entity whose mutations are audited
///
/// Implementations enumerate the complete persisted schema in their
/// descriptor - omitting a field is a defect, since audit fidelity depends
/// on completeness - and list their tenant references explicitly, in
/// resolution order.
pub trait Auditable: Serialize {
    /// The registered descriptor for this entity type
    fn descriptor() -> &'static EntityDescriptor;

    /// Identifier of this entity in string form
    fn entity_id(&self) -> String;

    /// Ordered tenant references; the first present one wins
    fn tenant_refs(&self) -> Vec<TenantRef>;
}

/// Capture the flat field snapshot of an entity
///
/// Relation-valued fields are represented by the related entity's identifier
/// only. Every field in the descriptor must be present in the entity's
/// serialization; relation fields must be null or an identifier string.
pub fn snapshot<E: Auditable>(entity: &E) -> Result<JsonValue, SnapshotError> {
    let entity_type = E::descriptor().entity_type;

    let value = serde_json::to_value(entity).map_err(|source| SnapshotError::Serialize {
        entity_type,
        source,
    })?;
    let object = match value {
        JsonValue::Object(object) => object,
        _ => return Err(SnapshotError::NotAnObject { entity_type }),
    };

    let mut fields = Map::with_capacity(E::descriptor().fields.len());
    for field in E::descriptor().fields {
        let value = object
            .get(field.name)
            .ok_or(SnapshotError::MissingField {
                entity_type,
                field: field.name,
            })?
            .clone();

        if field.kind == FieldKind::Relation && !matches!(value, JsonValue::Null | JsonValue::String(_))
        {
            return Err(SnapshotError::NotAnIdentifier {
                entity_type,
                field: field.name,
            });
        }

        fields.insert(field.name.to_string(), value);
    }

    Ok(JsonValue::Object(fields))
}

/// Resolve the owning tenant of an entity
///
/// Walks the entity's ordered tenant references and falls back to the
/// ambient request organization. Pure with respect to its inputs.
pub fn resolve_tenant<E: Auditable>(entity: &E, ctx: &RequestContext) -> Option<Uuid> {
    entity
        .tenant_refs()
        .into_iter()
        .find_map(|tenant_ref| tenant_ref.organization_id)
        .or_else(|| ctx.organization_id())
}
