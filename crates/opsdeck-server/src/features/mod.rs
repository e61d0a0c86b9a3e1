//! Feature modules implementing the Opsdeck API
//!
//! Each feature is a vertical slice with its own commands (write
//! operations), queries (read operations), and routes. Commands are audited
//! through the interceptor wrappers in [`crate::audit`]; queries are not.
//!
//! # Features
//!
//! - **organizations**: Tenant lifecycle and membership administration
//! - **projects**: Project CRUD within the current organization
//! - **tasks**: Task and task comment CRUD
//! - **billing**: Invoices and line items with derived total maintenance

pub mod billing;
pub mod organizations;
pub mod projects;
pub mod shared;
pub mod tasks;

use axum::Router;
use sqlx::PgPool;

use crate::audit;

/// Creates the main API router with all feature routes mounted
///
/// Each feature is mounted under its own path prefix:
/// - `/organizations` - Tenant and membership management
/// - `/projects` - Project management
/// - `/tasks` - Task and comment management
/// - `/invoices` - Billing
/// - `/audit` - Audit trail retrieval (owners/admins)
pub fn router(pool: PgPool) -> Router<()> {
    Router::new()
        .nest(
            "/organizations",
            organizations::organizations_routes().with_state(pool.clone()),
        )
        .nest("/projects", projects::projects_routes().with_state(pool.clone()))
        .nest("/tasks", tasks::tasks_routes().with_state(pool.clone()))
        .nest("/invoices", billing::billing_routes().with_state(pool.clone()))
        .nest("/audit", audit::audit_routes().with_state(pool))
}
