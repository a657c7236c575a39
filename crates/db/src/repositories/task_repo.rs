//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskly_core::types::DbId;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, title, description, status, priority, created_by_id, created_at, updated_at";

/// Qualified column list for queries that join `projects`.
const T_COLUMNS: &str = "t.id, t.project_id, t.title, t.description, t.status, t.priority, \
                         t.created_by_id, t.created_at, t.updated_at";

/// Outcome of a guarded task update.
#[derive(Debug)]
pub enum TaskUpdateOutcome {
    Updated(Task),
    /// The row exists but `expected_updated_at` no longer matches it.
    Conflict,
    NotFound,
}

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(
        pool: &PgPool,
        created_by_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, title, description, status, priority, created_by_id)
             VALUES ($1, $2, $3, COALESCE($4, 'TODO'), COALESCE($5, 'MEDIUM'), $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(created_by_id)
            .fetch_one(pool)
            .await
    }

    /// Find a task by ID, scoped to a workspace via its project.
    pub async fn find_in_workspace(
        pool: &PgPool,
        id: DbId,
        workspace_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {T_COLUMNS} FROM tasks t
             JOIN projects p ON p.id = t.project_id AND p.deleted_at IS NULL
             WHERE t.id = $1 AND p.workspace_id = $2"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks in a project, newest first.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// When `expected_updated_at` is present, the update only applies if the
    /// row's `updated_at` still matches, detecting concurrent edits.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        workspace_id: DbId,
        input: &UpdateTask,
    ) -> Result<TaskUpdateOutcome, sqlx::Error> {
        let query = format!(
            "UPDATE tasks t SET
                title = COALESCE($3, t.title),
                description = COALESCE($4, t.description),
                status = COALESCE($5, t.status),
                priority = COALESCE($6, t.priority),
                updated_at = NOW()
             FROM projects p
             WHERE t.id = $1 AND p.id = t.project_id
               AND p.workspace_id = $2 AND p.deleted_at IS NULL
               AND ($7::timestamptz IS NULL OR t.updated_at = $7)
             RETURNING {T_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.expected_updated_at)
            .fetch_optional(pool)
            .await?;

        if let Some(task) = updated {
            return Ok(TaskUpdateOutcome::Updated(task));
        }
        // Zero rows: either the task is out of scope or the timestamp guard
        // failed. Re-check to report the right outcome.
        match Self::find_in_workspace(pool, id, workspace_id).await? {
            Some(_) => Ok(TaskUpdateOutcome::Conflict),
            None => Ok(TaskUpdateOutcome::NotFound),
        }
    }

    /// Permanently delete a task by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, workspace_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM tasks t
             USING projects p
             WHERE t.id = $1 AND p.id = t.project_id AND p.workspace_id = $2",
        )
        .bind(id)
        .bind(workspace_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
