//! Repository for the `draft_batches` table and its batch-scoped bulk
//! operations over `draft_items` and `tasks`.
//!
//! Batch creation, regeneration, and acceptance are multi-statement writes
//! and run inside a single transaction each: a failed generation must leave
//! no partial rows, a failed regeneration must never leave a batch with
//! zero items, and a failed acceptance must leave the batch PENDING with no
//! tasks created.

use sqlx::PgPool;
use taskly_core::types::DbId;

use crate::models::draft_batch::{CreateDraftBatch, DraftBatch, DraftBatchSummary};
use crate::models::draft_item::{DraftItem, NewDraftItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, creator_id, title, prompt, status, created_at, updated_at, deleted_at";

/// Qualified column list for queries that join `projects`.
const B_COLUMNS: &str = "b.id, b.project_id, b.creator_id, b.title, b.prompt, b.status, \
                         b.created_at, b.updated_at, b.deleted_at";

/// Item column list, shared with inserts performed here.
const ITEM_COLUMNS: &str = "id, batch_id, position, title, description, status, priority, \
                            enabled, created_at, updated_at";

/// Provides lifecycle operations for draft batches.
pub struct DraftBatchRepo;

impl DraftBatchRepo {
    /// Insert a new batch together with its initial items, atomically.
    ///
    /// Item order follows the input slice; each item gets its index as
    /// `position`. An empty item slice is valid and produces a batch with
    /// zero items.
    pub async fn create_with_items(
        pool: &PgPool,
        input: &CreateDraftBatch,
        items: &[NewDraftItem],
    ) -> Result<(DraftBatch, Vec<DraftItem>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO draft_batches (project_id, creator_id, title, prompt)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let batch = sqlx::query_as::<_, DraftBatch>(&query)
            .bind(input.project_id)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.prompt)
            .fetch_one(&mut *tx)
            .await?;

        let created = insert_items(&mut tx, batch.id, items).await?;

        tx.commit().await?;
        Ok((batch, created))
    }

    /// Find a non-deleted batch by ID, scoped to a workspace via its
    /// project. Soft-deleted batches behave like missing ones.
    pub async fn find_in_workspace(
        pool: &PgPool,
        id: DbId,
        workspace_id: DbId,
    ) -> Result<Option<DraftBatch>, sqlx::Error> {
        let query = format!(
            "SELECT {B_COLUMNS} FROM draft_batches b
             JOIN projects p ON p.id = b.project_id AND p.deleted_at IS NULL
             WHERE b.id = $1 AND p.workspace_id = $2 AND b.deleted_at IS NULL"
        );
        sqlx::query_as::<_, DraftBatch>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(pool)
            .await
    }

    /// List non-deleted batches for a project, newest first, each annotated
    /// with its item count.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<DraftBatchSummary>, sqlx::Error> {
        let query = "SELECT b.id, b.project_id, b.creator_id, b.title, b.prompt, b.status,
                            COUNT(i.id) AS item_count, b.created_at, b.updated_at
                     FROM draft_batches b
                     LEFT JOIN draft_items i ON i.batch_id = b.id
                     WHERE b.project_id = $1 AND b.deleted_at IS NULL
                     GROUP BY b.id
                     ORDER BY b.created_at DESC";
        sqlx::query_as::<_, DraftBatchSummary>(query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the batch's entire item set and update its title/prompt,
    /// atomically. The batch status is deliberately left untouched.
    ///
    /// Returns `None` (with nothing written) if the batch is missing or
    /// soft-deleted.
    pub async fn replace_items(
        pool: &PgPool,
        id: DbId,
        title: &str,
        prompt: &str,
        items: &[NewDraftItem],
    ) -> Result<Option<(DraftBatch, Vec<DraftItem>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE draft_batches SET title = $2, prompt = $3, updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let Some(batch) = sqlx::query_as::<_, DraftBatch>(&query)
            .bind(id)
            .bind(title)
            .bind(prompt)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM draft_items WHERE batch_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let created = insert_items(&mut tx, id, items).await?;

        tx.commit().await?;
        Ok(Some((batch, created)))
    }

    /// Accept a PENDING batch: materialize the given items into tasks and
    /// flip the status, as one unit.
    ///
    /// The status flip is a conditional update on `status = 'PENDING'`
    /// inside the transaction, so a concurrent accept/cancel makes this
    /// call return `false` with nothing written. The caller decides which
    /// items qualify (enabled only) and that the set is non-empty.
    pub async fn accept(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        created_by_id: DbId,
        items: &[DraftItem],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let flipped = sqlx::query(
            "UPDATE draft_batches SET status = 'ACCEPTED', updated_at = NOW()
             WHERE id = $1 AND status = 'PENDING' AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        if flipped.rows_affected() == 0 {
            return Ok(false);
        }

        for item in items {
            sqlx::query(
                "INSERT INTO tasks (project_id, title, description, status, priority, created_by_id)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(project_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.status)
            .bind(item.priority)
            .bind(created_by_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    /// Cancel a PENDING batch. Returns `false` (with nothing written) if
    /// the batch is not PENDING anymore, missing, or soft-deleted.
    pub async fn cancel(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE draft_batches SET status = 'CANCELLED', updated_at = NOW()
             WHERE id = $1 AND status = 'PENDING' AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a batch in any status, scoped to a workspace. Returns
    /// the updated row, or `None` if the batch is missing, out of scope,
    /// or already soft-deleted (so a second delete reports not-found).
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        workspace_id: DbId,
    ) -> Result<Option<DraftBatch>, sqlx::Error> {
        let query = format!(
            "UPDATE draft_batches b SET deleted_at = NOW()
             FROM projects p
             WHERE b.id = $1 AND p.id = b.project_id
               AND p.workspace_id = $2 AND p.deleted_at IS NULL
               AND b.deleted_at IS NULL
             RETURNING {B_COLUMNS}"
        );
        sqlx::query_as::<_, DraftBatch>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(pool)
            .await
    }
}

/// Insert draft items for a batch inside an open transaction, assigning
/// positions from the slice order.
async fn insert_items(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    batch_id: DbId,
    items: &[NewDraftItem],
) -> Result<Vec<DraftItem>, sqlx::Error> {
    let query = format!(
        "INSERT INTO draft_items (batch_id, position, title, description, status, priority)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {ITEM_COLUMNS}"
    );
    let mut created = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let row = sqlx::query_as::<_, DraftItem>(&query)
            .bind(batch_id)
            .bind(position as i32)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.status)
            .bind(item.priority)
            .fetch_one(&mut **tx)
            .await?;
        created.push(row);
    }
    Ok(created)
}
