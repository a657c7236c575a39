//! Integration tests for the draft batch lifecycle against a real database:
//! atomic batch creation, item replacement, acceptance, cancellation, and
//! soft delete.

use sqlx::PgPool;
use taskly_core::types::DbId;
use taskly_db::models::draft_batch::{CreateDraftBatch, DraftBatchStatus};
use taskly_db::models::draft_item::{NewDraftItem, UpdateDraftItem};
use taskly_db::models::project::CreateProject;
use taskly_db::models::task::{TaskPriority, TaskStatus};
use taskly_db::models::user::CreateUser;
use taskly_db::models::workspace::CreateWorkspace;
use taskly_db::repositories::{
    DraftBatchRepo, DraftItemRepo, ProjectRepo, TaskRepo, UserRepo, WorkspaceRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    user_id: DbId,
    workspace_id: DbId,
    project_id: DbId,
}

async fn seed(pool: &PgPool) -> Fixture {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: "drafts@example.com".to_string(),
            display_name: "Draft Tester".to_string(),
        },
    )
    .await
    .unwrap();
    let workspace = WorkspaceRepo::create(
        pool,
        user.id,
        &CreateWorkspace {
            name: "Acme".to_string(),
            context: None,
        },
    )
    .await
    .unwrap();
    let project = ProjectRepo::create(
        pool,
        workspace.id,
        &CreateProject {
            name: "Website".to_string(),
            description: None,
            context: None,
        },
    )
    .await
    .unwrap();
    Fixture {
        user_id: user.id,
        workspace_id: workspace.id,
        project_id: project.id,
    }
}

fn item(title: &str) -> NewDraftItem {
    NewDraftItem {
        title: title.to_string(),
        description: Some(format!("{title} description")),
        status: TaskStatus::Todo,
        priority: TaskPriority::Medium,
    }
}

fn batch_input(f: &Fixture, title: &str) -> CreateDraftBatch {
    CreateDraftBatch {
        project_id: f.project_id,
        creator_id: f.user_id,
        title: title.to_string(),
        prompt: "add login flow".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn create_persists_batch_and_ordered_items(pool: PgPool) {
    let f = seed(&pool).await;
    let items = [item("First"), item("Second"), item("Third")];
    let (batch, created) = DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Login"), &items)
        .await
        .unwrap();

    assert_eq!(batch.status, DraftBatchStatus::Pending);
    assert_eq!(batch.title, "Login");
    assert_eq!(created.len(), 3);
    assert!(created.iter().all(|i| i.enabled));

    let listed = DraftItemRepo::list_by_batch(&pool, batch.id).await.unwrap();
    let titles: Vec<&str> = listed.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, ["First", "Second", "Third"]);
    assert_eq!(listed[0].position, 0);
    assert_eq!(listed[2].position, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_accepts_empty_item_set(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, created) = DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Empty"), &[])
        .await
        .unwrap();

    assert_eq!(batch.status, DraftBatchStatus::Pending);
    assert!(created.is_empty());

    let summaries = DraftBatchRepo::list_by_project(&pool, f.project_id)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].item_count, 0);
}

// ---------------------------------------------------------------------------
// Regeneration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn replace_items_swaps_item_set_and_updates_prompt(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, _) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Old"), &[item("Old item")])
            .await
            .unwrap();

    let (updated, items) = DraftBatchRepo::replace_items(
        &pool,
        batch.id,
        "New",
        "different prompt",
        &[item("New one"), item("New two")],
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.title, "New");
    assert_eq!(updated.prompt, "different prompt");
    assert_eq!(items.len(), 2);

    let listed = DraftItemRepo::list_by_batch(&pool, batch.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|i| i.title.starts_with("New")));
}

#[sqlx::test(migrations = "../../migrations")]
async fn replace_items_leaves_status_untouched(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, _) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Batch"), &[item("A")])
            .await
            .unwrap();
    assert!(DraftBatchRepo::cancel(&pool, batch.id).await.unwrap());

    // Regenerating a cancelled batch replaces its items without reopening it.
    let (updated, _) = DraftBatchRepo::replace_items(&pool, batch.id, "B", "p", &[item("B")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, DraftBatchStatus::Cancelled);
}

#[sqlx::test(migrations = "../../migrations")]
async fn replace_items_on_missing_batch_writes_nothing(pool: PgPool) {
    seed(&pool).await;
    let result = DraftBatchRepo::replace_items(&pool, DbId::new_v4(), "T", "p", &[item("X")])
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Acceptance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn accept_creates_tasks_and_flips_status(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, items) = DraftBatchRepo::create_with_items(
        &pool,
        &batch_input(&f, "Login"),
        &[item("Build form"), item("Add backend")],
    )
    .await
    .unwrap();

    let accepted = DraftBatchRepo::accept(&pool, batch.id, f.project_id, f.user_id, &items)
        .await
        .unwrap();
    assert!(accepted);

    let reloaded = DraftBatchRepo::find_in_workspace(&pool, batch.id, f.workspace_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, DraftBatchStatus::Accepted);

    let tasks = TaskRepo::list_by_project(&pool, f.project_id).await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.created_by_id == f.user_id));
    assert!(tasks.iter().all(|t| t.status == TaskStatus::Todo));
}

#[sqlx::test(migrations = "../../migrations")]
async fn accept_is_rejected_once_out_of_pending(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, items) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Batch"), &[item("A")])
            .await
            .unwrap();
    assert!(DraftBatchRepo::cancel(&pool, batch.id).await.unwrap());

    let accepted = DraftBatchRepo::accept(&pool, batch.id, f.project_id, f.user_id, &items)
        .await
        .unwrap();
    assert!(!accepted);

    // No tasks materialized by the rejected accept.
    let tasks = TaskRepo::list_by_project(&pool, f.project_id).await.unwrap();
    assert!(tasks.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_accept_rolls_back_status_and_tasks(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, items) = DraftBatchRepo::create_with_items(
        &pool,
        &batch_input(&f, "Batch"),
        &[item("A"), item("B")],
    )
    .await
    .unwrap();

    // A creator id with no user row violates the tasks FK partway through
    // the bulk insert, after the status flip already ran in the same
    // transaction.
    let result =
        DraftBatchRepo::accept(&pool, batch.id, f.project_id, DbId::new_v4(), &items).await;
    assert!(result.is_err());

    // The whole transaction rolled back: still PENDING, zero tasks.
    let reloaded = DraftBatchRepo::find_in_workspace(&pool, batch.id, f.workspace_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.status, DraftBatchStatus::Pending);
    let tasks = TaskRepo::list_by_project(&pool, f.project_id).await.unwrap();
    assert!(tasks.is_empty());

    // And a retry with valid inputs still succeeds.
    let accepted = DraftBatchRepo::accept(&pool, batch.id, f.project_id, f.user_id, &items)
        .await
        .unwrap();
    assert!(accepted);
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn cancel_is_terminal(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, _) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Batch"), &[item("A")])
            .await
            .unwrap();

    assert!(DraftBatchRepo::cancel(&pool, batch.id).await.unwrap());
    // Second cancel finds no PENDING row.
    assert!(!DraftBatchRepo::cancel(&pool, batch.id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Soft delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn soft_delete_hides_batch_from_reads(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, items) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Batch"), &[item("A")])
            .await
            .unwrap();

    let deleted = DraftBatchRepo::soft_delete(&pool, batch.id, f.workspace_id)
        .await
        .unwrap()
        .unwrap();
    assert!(deleted.deleted_at.is_some());

    assert!(DraftBatchRepo::find_in_workspace(&pool, batch.id, f.workspace_id)
        .await
        .unwrap()
        .is_none());
    assert!(DraftBatchRepo::list_by_project(&pool, f.project_id)
        .await
        .unwrap()
        .is_empty());
    // Items under a soft-deleted batch are unreachable too.
    assert!(DraftItemRepo::find_in_workspace(&pool, items[0].id, f.workspace_id)
        .await
        .unwrap()
        .is_none());

    // Second delete reports not-found.
    assert!(DraftBatchRepo::soft_delete(&pool, batch.id, f.workspace_id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn soft_delete_allowed_in_terminal_status(pool: PgPool) {
    let f = seed(&pool).await;
    let (batch, _) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Batch"), &[item("A")])
            .await
            .unwrap();
    assert!(DraftBatchRepo::cancel(&pool, batch.id).await.unwrap());

    let deleted = DraftBatchRepo::soft_delete(&pool, batch.id, f.workspace_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(deleted.status, DraftBatchStatus::Cancelled);
}

// ---------------------------------------------------------------------------
// Item patching
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn item_patch_applies_only_provided_fields(pool: PgPool) {
    let f = seed(&pool).await;
    let (_, items) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Batch"), &[item("Original")])
            .await
            .unwrap();

    let patched = DraftItemRepo::update(
        &pool,
        items[0].id,
        f.workspace_id,
        &UpdateDraftItem {
            priority: Some(TaskPriority::High),
            enabled: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(patched.title, "Original");
    assert_eq!(patched.description, items[0].description);
    assert_eq!(patched.priority, TaskPriority::High);
    assert!(!patched.enabled);
}

#[sqlx::test(migrations = "../../migrations")]
async fn item_patch_outside_workspace_finds_nothing(pool: PgPool) {
    let f = seed(&pool).await;
    let (_, items) =
        DraftBatchRepo::create_with_items(&pool, &batch_input(&f, "Batch"), &[item("A")])
            .await
            .unwrap();

    let other_owner = UserRepo::create(
        &pool,
        &CreateUser {
            email: "other@example.com".to_string(),
            display_name: "Other".to_string(),
        },
    )
    .await
    .unwrap();
    let other_workspace = WorkspaceRepo::create(
        &pool,
        other_owner.id,
        &CreateWorkspace {
            name: "Other".to_string(),
            context: None,
        },
    )
    .await
    .unwrap();

    let patched = DraftItemRepo::update(
        &pool,
        items[0].id,
        other_workspace.id,
        &UpdateDraftItem {
            title: Some("Hijacked".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(patched.is_none());
}
