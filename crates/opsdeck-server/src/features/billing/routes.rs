//! Billing API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/invoices` - Create an invoice (number auto-assigned)
//! - `GET /api/v1/invoices` - List invoices (filterable by status)
//! - `GET /api/v1/invoices/:id` - Get an invoice with its line items
//! - `PUT /api/v1/invoices/:id` - Update an invoice header
//! - `DELETE /api/v1/invoices/:id` - Delete an invoice
//! - `POST /api/v1/invoices/:id/items` - Add a line item
//! - `PUT /api/v1/invoices/items/:item_id` - Update a line item
//! - `DELETE /api/v1/invoices/items/:item_id` - Delete a line item
//!
//! All routes require membership in the resolved organization. Every
//! line-item write recomputes the invoice total inside its own transaction.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Extension, Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{
    CreateInvoiceCommand, CreateItemCommand, UpdateInvoiceCommand, UpdateItemCommand,
};
use super::queries::list_invoices::ListInvoicesQuery;
use crate::api::response::ApiResponse;
use crate::error::AppError;
use crate::tenancy::{authorizer, RequestContext};

/// Creates the billing router with all routes configured
pub fn billing_routes() -> Router<PgPool> {
    Router::new()
        .route("/", post(create_invoice).get(list_invoices))
        .route(
            "/:id",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .route("/:id/items", post(create_item))
        .route("/items/:item_id", put(update_item).delete(delete_item))
}

// ============================================================================
// Invoice Handlers
// ============================================================================

#[tracing::instrument(skip(pool, ctx, command))]
async fn create_invoice(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Json(command): Json<CreateInvoiceCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let invoice = super::commands::create_invoice::handle(pool, ctx, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(invoice))).into_response())
}

#[tracing::instrument(skip(pool, ctx, command))]
async fn update_invoice(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(command): Json<UpdateInvoiceCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let invoice = super::commands::update_invoice::handle(pool, ctx, id, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoice))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn delete_invoice(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let response = super::commands::delete_invoice::handle(pool, ctx, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn get_invoice(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    let detail = super::queries::get_invoice::handle(pool, organization.id, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(detail))).into_response())
}

#[tracing::instrument(skip(pool, ctx, query))]
async fn list_invoices(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<Response, AppError> {
    let (_, organization) = authorizer::require_member(&pool, &ctx).await?;

    let invoices = super::queries::list_invoices::handle(pool, organization.id, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(invoices))).into_response())
}

// ============================================================================
// Line Item Handlers
// ============================================================================

#[tracing::instrument(skip(pool, ctx, command))]
async fn create_item(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<Uuid>,
    Json(command): Json<CreateItemCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let item = super::commands::create_item::handle(pool, ctx, id, command).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(item))).into_response())
}

#[tracing::instrument(skip(pool, ctx, command))]
async fn update_item(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(item_id): Path<Uuid>,
    Json(command): Json<UpdateItemCommand>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let item = super::commands::update_item::handle(pool, ctx, item_id, command).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(item))).into_response())
}

#[tracing::instrument(skip(pool, ctx))]
async fn delete_item(
    State(pool): State<PgPool>,
    Extension(ctx): Extension<RequestContext>,
    Path(item_id): Path<Uuid>,
) -> Result<Response, AppError> {
    authorizer::require_member(&pool, &ctx).await?;

    let response = super::commands::delete_item::handle(pool, ctx, item_id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}
