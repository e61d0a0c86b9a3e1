//! Audit retrieval API
//!
//! Read-only listing of the current organization's audit trail, newest
//! first. Restricted to owners and admins of the resolved tenant.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use sqlx::PgPool;

use super::models::AuditQuery;
use super::queries::list_organization_entries;
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::tenancy::{authorizer, RequestContext};

/// Creates the audit router
pub fn audit_routes() -> Router<PgPool> {
    Router::new().route("/", get(list_audit_entries))
}

/// List audit entries for the current organization
///
/// # Endpoint
///
/// `GET /api/v1/audit?action=update&entity_type=invoice&limit=50&offset=0`
#[tracing::instrument(skip(pool, ctx, query))]
async fn list_audit_entries(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<AuditQuery>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_owner_or_admin(&pool, &ctx).await?;

    let entries = list_organization_entries(&pool, organization.id, &query).await?;

    tracing::debug!(
        org_id = %organization.id,
        count = entries.len(),
        "Audit entries listed via API"
    );

    Ok((StatusCode::OK, Json(ApiResponse::success(entries))).into_response())
}
