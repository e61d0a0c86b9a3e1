//! Tests for the mutation interception contract
//!
//! These verify the properties the audit layer guarantees:
//! - exactly one entry per mutation, with the before/after nullability
//!   matching the action kind
//! - the recorded `before` snapshot holds the values strictly prior to the
//!   mutating write
//! - a failed business mutation produces no entry
//! - a failed audit write (or snapshot) never disturbs the business
//!   mutation

use sqlx::PgPool;
use uuid::Uuid;

use opsdeck_server::audit::{self, entity_trail, AuditQuery};
use opsdeck_server::features::projects::commands::{
    create::CreateProjectCommand, update::UpdateProjectCommand,
};
use opsdeck_server::features::tasks::commands::create::CreateTaskCommand;

mod helpers;

fn create_command(name: &str) -> CreateProjectCommand {
    CreateProjectCommand {
        name: name.to_string(),
        description: String::new(),
        owner_id: None,
        status: None,
        start_date: None,
        end_date: None,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_records_one_entry_with_null_before(pool: PgPool) {
    let ctx = helpers::member_context(&pool, "acme").await;

    let project = opsdeck_server::features::projects::commands::create::handle(
        pool.clone(),
        ctx.clone(),
        create_command("Relaunch"),
    )
    .await
    .unwrap();

    let trail = entity_trail(&pool, "project", &project.id.to_string(), None)
        .await
        .unwrap();
    assert_eq!(trail.len(), 1);

    let entry = &trail[0];
    assert_eq!(entry.action, "create");
    assert_eq!(entry.user_id, ctx.user_id);
    assert_eq!(entry.organization_id, ctx.organization_id());
    assert!(entry.before.is_none());

    let after = entry.after.as_ref().expect("create entry must carry after");
    assert_eq!(after["name"], serde_json::json!("Relaunch"));
    // no explicit owner in the command: the acting user was assigned
    assert_eq!(
        after["owner_id"],
        serde_json::json!(ctx.user_id.unwrap().to_string())
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_update_records_pre_mutation_before(pool: PgPool) {
    let ctx = helpers::member_context(&pool, "acme").await;
    let project = opsdeck_server::features::projects::commands::create::handle(
        pool.clone(),
        ctx.clone(),
        create_command("Old name"),
    )
    .await
    .unwrap();

    opsdeck_server::features::projects::commands::update::handle(
        pool.clone(),
        ctx.clone(),
        project.id,
        UpdateProjectCommand {
            name: Some("New name".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let trail = entity_trail(&pool, "project", &project.id.to_string(), None)
        .await
        .unwrap();
    // newest first: update then create
    assert_eq!(trail.len(), 2);
    let update = &trail[0];
    assert_eq!(update.action, "update");

    let before = update.before.as_ref().expect("update entry must carry before");
    let after = update.after.as_ref().expect("update entry must carry after");
    assert_eq!(before["name"], serde_json::json!("Old name"));
    assert_eq!(after["name"], serde_json::json!("New name"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_deleted_task_leaves_full_snapshot_and_is_gone(pool: PgPool) {
    let ctx = helpers::member_context(&pool, "acme").await;
    let project_id = helpers::create_project(&pool, &ctx, "Board").await;

    let task = opsdeck_server::features::tasks::commands::create::handle(
        pool.clone(),
        ctx.clone(),
        CreateTaskCommand {
            project_id,
            title: "Ship it".to_string(),
            description: String::new(),
            status: None,
            assignee_id: None,
            due_date: None,
            priority: Some("high".to_string()),
            sort_order: 0,
        },
    )
    .await
    .unwrap();

    opsdeck_server::features::tasks::commands::delete::handle(pool.clone(), ctx.clone(), task.id)
        .await
        .unwrap();

    // the task is no longer retrievable
    let gone =
        opsdeck_server::features::tasks::queries::get::fetch_scoped(&pool, ctx.organization_id().unwrap(), task.id)
            .await
            .unwrap();
    assert!(gone.is_none());

    let trail = entity_trail(&pool, "task", &task.id.to_string(), None)
        .await
        .unwrap();
    assert_eq!(trail.len(), 2);
    let delete = &trail[0];
    assert_eq!(delete.action, "delete");
    assert!(delete.after.is_none());

    let before = delete.before.as_ref().expect("delete entry must carry before");
    assert_eq!(before["title"], serde_json::json!("Ship it"));
    assert_eq!(before["priority"], serde_json::json!("high"));
    assert_eq!(
        before["project_id"],
        serde_json::json!(project_id.to_string())
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_failed_mutation_writes_no_entry(pool: PgPool) {
    let ctx = helpers::member_context(&pool, "acme").await;

    // violates the tasks.project_id foreign key inside the persistence call
    let bogus_project = Uuid::new_v4();
    let result = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM projects WHERE id = $1",
    )
    .bind(bogus_project)
    .fetch_optional(&pool)
    .await
    .unwrap();
    assert!(result.is_none());

    let outcome = opsdeck_server::features::tasks::commands::create::handle(
        pool.clone(),
        ctx.clone(),
        CreateTaskCommand {
            project_id: bogus_project,
            title: "Orphan".to_string(),
            description: String::new(),
            status: None,
            assignee_id: None,
            due_date: None,
            priority: None,
            sort_order: 0,
        },
    )
    .await;
    assert!(outcome.is_err());

    let entries = audit::list_organization_entries(
        &pool,
        ctx.organization_id().unwrap(),
        &AuditQuery::default(),
    )
    .await
    .unwrap();
    assert!(entries.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_audit_write_failure_preserves_mutation(pool: PgPool) {
    let ctx = helpers::member_context(&pool, "acme").await;

    // Sabotage the audit sink; the recorder's insert will now fail while
    // the business write path stays intact.
    sqlx::query("ALTER TABLE audit_log RENAME TO audit_log_misplaced")
        .execute(&pool)
        .await
        .unwrap();

    let project = opsdeck_server::features::projects::commands::create::handle(
        pool.clone(),
        ctx.clone(),
        create_command("Survives"),
    )
    .await
    .expect("business mutation must not be rolled back by an audit failure");

    let stored: Option<Uuid> = sqlx::query_scalar("SELECT id FROM projects WHERE id = $1")
        .bind(project.id)
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert_eq!(stored, Some(project.id));
}
