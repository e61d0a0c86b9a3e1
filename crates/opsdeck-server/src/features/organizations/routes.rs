//! Organization API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/organizations` - Create an organization (authenticated)
//! - `GET /api/v1/organizations` - List the acting user's organizations
//! - `GET /api/v1/organizations/current` - The resolved tenant (members)
//! - `GET /api/v1/organizations/members` - Member roster (owners/admins)
//! - `POST /api/v1/organizations/members` - Add a member (owners/admins)
//! - `DELETE /api/v1/organizations/members/:user_id` - Remove a member
//!   (owners/admins)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{AddMemberCommand, CreateOrganizationCommand, RemoveMemberCommand};
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::tenancy::{authorizer, RequestContext};

/// Creates the organizations router with all routes configured
pub fn organizations_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_organization).get(list_organizations))
        .route("/current", get(current_organization))
        .route("/members", get(list_members).post(add_member))
        .route("/members/:user_id", delete(remove_member))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

#[tracing::instrument(skip(pool, ctx, command), fields(slug = %command.slug))]
async fn create_organization(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Json(command): Json<CreateOrganizationCommand>,
) -> Result<Response, AppError> {
    let response = super::commands::create::handle(pool, ctx.user_id, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, ctx, command))]
async fn add_member(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Json(command): Json<AddMemberCommand>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_owner_or_admin(&pool, &ctx).await?;

    let membership = super::commands::add_member::handle(pool, organization.id, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(membership))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn remove_member(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(user_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_owner_or_admin(&pool, &ctx).await?;

    let response = super::commands::remove_member::handle(
        pool,
        organization.id,
        RemoveMemberCommand { user_id },
    )
    .await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(pool, ctx))]
async fn list_organizations(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, AppError> {
    let organizations = super::queries::list::handle(pool, ctx.user_id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(organizations))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn current_organization(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(organization.clone()))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn list_members(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_owner_or_admin(&pool, &ctx).await?;

    let members = super::queries::members::handle(pool, organization.id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(members))).into_response())
}
