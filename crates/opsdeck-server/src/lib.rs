//! Opsdeck Server Library
//!
//! Multi-tenant business-management backend: projects, tasks, and billing
//! scoped to organizations, with a cross-cutting audit trail.
//!
//! # Architecture
//!
//! Requests flow through a fixed pipeline:
//!
//! 1. **Tenant resolution** - [`tenancy`] middleware maps the request's
//!    tenant hint to an organization and attaches a `RequestContext`.
//! 2. **Authorization** - membership predicates gate every tenant-scoped
//!    route; denial is access-denied, never not-found.
//! 3. **Interception** - write operations run through the [`audit`]
//!    wrappers, which capture before/after field snapshots around the
//!    persistence call and append one immutable audit entry per mutation.
//! 4. **Aggregate maintenance** - line-item writes recompute the owning
//!    invoice's total inside the same locked transaction
//!    ([`features::billing::totals`]).
//!
//! Commands (POST, PUT, DELETE) are audited; queries (GET) are not.
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extraction
//! - **SQLx**: PostgreSQL queries and migrations
//! - **Tower**: Middleware composition
//! - **Tracing**: Structured logging
//!
//! # Example
//!
//! ```no_run
//! use opsdeck_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod middleware;
pub mod tenancy;

// Re-export commonly used types
pub use error::{AppError, AppResult};
