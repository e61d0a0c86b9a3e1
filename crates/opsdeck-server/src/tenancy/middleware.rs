//! Tenant context middleware
//!
//! Attaches a [`RequestContext`] extension to every request before feature
//! routes run:
//!
//! - The tenant hint is the `X-Organization-Slug` header; its transport is
//!   an external contract, only the slug lookup itself lives here.
//! - The acting user arrives as an `X-User-Id` claim set by the
//!   authenticating proxy (authentication mechanics are out of scope).
//!
//! Resolution never fails a request: an unknown slug, a malformed user id,
//! or even a database outage all degrade to an empty context, which the
//! authorization predicates downstream turn into an access denial.

use axum::{extract::Request, response::Response};
use sqlx::PgPool;
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tracing::{debug, warn};
use uuid::Uuid;

use super::resolver::resolve_organization;
use super::RequestContext;

/// Header carrying the tenant hint.
pub const ORGANIZATION_SLUG_HEADER: &str = "x-organization-slug";

/// Header carrying the authenticated user id claim.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Layer that installs [`TenantContextMiddleware`]
#[derive(Clone)]
pub struct TenantContextLayer {
    pool: PgPool,
}

impl TenantContextLayer {
    /// Create a new tenant context layer with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl<S> Layer<S> for TenantContextLayer {
    type Service = TenantContextMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TenantContextMiddleware {
            inner,
            pool: self.pool.clone(),
        }
    }
}

/// Middleware service resolving the per-request tenant context
#[derive(Clone)]
pub struct TenantContextMiddleware<S> {
    inner: S,
    pool: PgPool,
}

impl<S> Service<Request> for TenantContextMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let mut inner = self.inner.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            let headers = request.headers();

            let user_id = headers
                .get(USER_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| Uuid::parse_str(s).ok());

            let slug = headers
                .get(ORGANIZATION_SLUG_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            let organization = match resolve_organization(&pool, slug.as_deref()).await {
                Ok(org) => org,
                Err(error) => {
                    // Infrastructure failure during resolution degrades to
                    // "no tenant"; the request is then denied downstream
                    // instead of crashing here.
                    warn!(%error, slug = ?slug, "Tenant resolution failed");
                    None
                },
            };

            debug!(
                user_id = ?user_id,
                org = ?organization.as_ref().map(|o| o.slug.clone()),
                "Request context resolved"
            );

            request
                .extensions_mut()
                .insert(RequestContext::new(user_id, organization));

            inner.call(request).await
        })
    }
}
