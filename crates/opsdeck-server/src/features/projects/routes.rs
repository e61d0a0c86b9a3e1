//! Project API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/projects` - Create a project
//! - `GET /api/v1/projects` - List the current organization's projects
//! - `GET /api/v1/projects/:id` - Get a single project
//! - `PUT /api/v1/projects/:id` - Update a project
//! - `DELETE /api/v1/projects/:id` - Delete a project
//!
//! All routes require membership in the resolved organization.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    routing::post,
    Extension, Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{CreateProjectCommand, UpdateProjectCommand};
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::tenancy::{authorizer, RequestContext};

/// Creates the projects router with all routes configured
pub fn projects_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
}

#[tracing::instrument(skip(pool, ctx, command), fields(name = %command.name))]
async fn create_project(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Json(command): Json<CreateProjectCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let project = super::commands::create::handle(pool, ctx, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(project))).into_response())
}

#[tracing::instrument(skip(pool, ctx, command))]
async fn update_project(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(command): Json<UpdateProjectCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let project = super::commands::update::handle(pool, ctx, id, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(project))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn delete_project(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let response = super::commands::delete::handle(pool, ctx, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn get_project(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    let project = super::queries::get::handle(pool, organization.id, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(project))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn list_projects(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    let projects = super::queries::list::handle(pool, organization.id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(projects))).into_response())
}
