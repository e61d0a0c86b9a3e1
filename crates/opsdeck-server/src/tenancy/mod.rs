//! Tenant resolution and membership authorization
//!
//! Every inbound request is pinned to at most one organization before any
//! feature code runs:
//!
//! 1. [`middleware::TenantContextLayer`] reads the `X-Organization-Slug`
//!    header (and the `X-User-Id` claim supplied by the authenticating
//!    proxy) and attaches a [`RequestContext`] extension.
//! 2. [`resolver`] performs the single slug lookup. An absent or unknown
//!    slug is a valid `None`, never an error.
//! 3. [`authorizer`] exposes the `is_member` / `is_owner_or_admin`
//!    predicates that feature routes combine by conjunction. An unresolved
//!    tenant or anonymous user always evaluates to `false`, which routes
//!    surface as access denied - distinct from not found, so non-members
//!    learn nothing about what exists inside a tenant.

pub mod authorizer;
pub mod middleware;
pub mod models;
pub mod resolver;

pub use middleware::TenantContextLayer;
pub use models::{Membership, Organization};

use uuid::Uuid;

/// Per-request tenant and actor context
///
/// Built once by the tenant middleware and carried as an axum extension.
/// Both fields are optional: anonymous requests and requests without a
/// (valid) tenant hint are representable states that downstream
/// authorization converts into denials.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub user_id: Option<Uuid>,
    pub organization: Option<Organization>,
}

impl RequestContext {
    pub fn new(user_id: Option<Uuid>, organization: Option<Organization>) -> Self {
        Self {
            user_id,
            organization,
        }
    }

    /// Id of the resolved tenant, if any
    pub fn organization_id(&self) -> Option<Uuid> {
        self.organization.as_ref().map(|org| org.id)
    }

    pub fn organization_ref(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }
}
