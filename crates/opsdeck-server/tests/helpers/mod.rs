//! Common fixtures for integration tests
//!
//! Small seeding helpers that build the tenancy graph (user, organization,
//! membership) and a request context the way the middleware would.

#![allow(dead_code)]

use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_server::tenancy::{Organization, RequestContext};

pub async fn create_user(pool: &PgPool, username: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id")
        .bind(username)
        .bind(format!("{username}@example.com"))
        .fetch_one(pool)
        .await
        .expect("failed to seed user")
}

pub async fn create_organization(pool: &PgPool, slug: &str, name: &str) -> Organization {
    sqlx::query_as::<_, Organization>(
        "INSERT INTO organizations (slug, name) VALUES ($1, $2) RETURNING id, slug, name, created_at, updated_at",
    )
    .bind(slug)
    .bind(name)
    .fetch_one(pool)
    .await
    .expect("failed to seed organization")
}

pub async fn create_membership(pool: &PgPool, user_id: Uuid, organization_id: Uuid, role: &str) {
    sqlx::query("INSERT INTO memberships (user_id, organization_id, role) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(organization_id)
        .bind(role)
        .execute(pool)
        .await
        .expect("failed to seed membership");
}

/// A member user with a resolved tenant, as the middleware would build it
pub async fn member_context(pool: &PgPool, slug: &str) -> RequestContext {
    let user_id = create_user(pool, &format!("user-{slug}")).await;
    let organization = create_organization(pool, slug, "Test Org").await;
    create_membership(pool, user_id, organization.id, "employee").await;
    RequestContext::new(Some(user_id), Some(organization))
}

pub async fn create_project(pool: &PgPool, ctx: &RequestContext, name: &str) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO projects (organization_id, name, owner_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(ctx.organization_id().expect("context has no organization"))
    .bind(name)
    .bind(ctx.user_id)
    .fetch_one(pool)
    .await
    .expect("failed to seed project")
}
