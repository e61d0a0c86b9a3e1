//! Task API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/tasks` - Create a task
//! - `GET /api/v1/tasks` - List tasks (filterable by project and status)
//! - `GET /api/v1/tasks/:id` - Get a single task
//! - `PUT /api/v1/tasks/:id` - Update a task
//! - `DELETE /api/v1/tasks/:id` - Delete a task
//! - `GET /api/v1/tasks/:id/comments` - List a task's comments
//! - `POST /api/v1/tasks/:id/comments` - Comment on a task
//! - `DELETE /api/v1/tasks/comments/:comment_id` - Delete a comment
//!
//! All routes require membership in the resolved organization.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{AddCommentCommand, CreateTaskCommand, UpdateTaskCommand};
use super::queries::list::ListTasksQuery;
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::tenancy::{authorizer, RequestContext};

/// Creates the tasks router with all routes configured
pub fn tasks_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_task).get(list_tasks))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/:id/comments", get(list_comments).post(add_comment))
        .route("/comments/:comment_id", delete(delete_comment))
}

#[tracing::instrument(skip(pool, ctx, command), fields(title = %command.title))]
async fn create_task(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Json(command): Json<CreateTaskCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let task = super::commands::create::handle(pool, ctx, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(task))).into_response())
}

#[tracing::instrument(skip(pool, ctx, command))]
async fn update_task(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(command): Json<UpdateTaskCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let task = super::commands::update::handle(pool, ctx, id, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(task))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn delete_task(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let response = super::commands::delete::handle(pool, ctx, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn get_task(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    let task = super::queries::get::handle(pool, organization.id, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(task))).into_response())
}

#[tracing::instrument(skip(pool, ctx, query))]
async fn list_tasks(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListTasksQuery>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    let tasks = super::queries::list::handle(pool, organization.id, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(tasks))).into_response())
}

#[tracing::instrument(skip(pool, ctx, command))]
async fn add_comment(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(command): Json<AddCommentCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let comment = super::commands::add_comment::handle(pool, ctx, id, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(comment))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn delete_comment(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(comment_id): Path<Uuid>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let response = super::commands::delete_comment::handle(pool, ctx, comment_id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn list_comments(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    let comments = super::queries::comments::handle(pool, organization.id, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(comments))).into_response())
}
