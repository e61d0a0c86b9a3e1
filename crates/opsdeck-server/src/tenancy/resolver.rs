//! Tenant hint resolution
//!
//! Maps an opaque slug-like hint from the request transport to a concrete
//! organization row. Exactly one lookup per call; a missing or unknown hint
//! resolves to `None` rather than an error, so that the absence of a tenant
//! stays a representable state for the authorizer to reject.

use sqlx::PgPool;
use tracing::debug;

use super::models::Organization;
use crate::error::AppResult;

/// Resolve a tenant hint to its organization
///
/// Returns `Ok(None)` for an absent, empty, or unknown slug. Only
/// infrastructure failures (the database being unreachable) surface as
/// errors.
pub async fn resolve_organization(
    pool: &PgPool,
    hint: Option<&str>,
) -> AppResult<Option<Organization>> {
    let slug = match hint {
        Some(slug) if !slug.is_empty() => slug,
        _ => return Ok(None),
    };

    let organization = sqlx::query_as::<_, Organization>(
        r#"
        SELECT id, slug, name, created_at, updated_at
        FROM organizations
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    match &organization {
        Some(org) => debug!(org_id = %org.id, slug = %org.slug, "Resolved tenant"),
        None => debug!(slug = %slug, "Tenant hint did not match any organization"),
    }

    Ok(organization)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_resolves_existing_slug(pool: PgPool) -> AppResult<()> {
        sqlx::query("INSERT INTO organizations (slug, name) VALUES ($1, $2)")
            .bind("acme")
            .bind("Acme Inc")
            .execute(&pool)
            .await?;

        let org = resolve_organization(&pool, Some("acme")).await?;
        assert_eq!(org.map(|o| o.name), Some("Acme Inc".to_string()));
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_unknown_slug_is_none_not_error(pool: PgPool) -> AppResult<()> {
        let org = resolve_organization(&pool, Some("nonexistent")).await?;
        assert!(org.is_none());
        Ok(())
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_absent_hint_is_none(pool: PgPool) -> AppResult<()> {
        assert!(resolve_organization(&pool, None).await?.is_none());
        assert!(resolve_organization(&pool, Some("")).await?.is_none());
        Ok(())
    }
}
