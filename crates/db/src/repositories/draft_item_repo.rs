//! Repository for the `draft_items` table.

use sqlx::PgPool;
use taskly_core::types::DbId;

use crate::models::draft_item::{DraftItem, UpdateDraftItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, batch_id, position, title, description, status, priority, enabled, created_at, updated_at";

/// Qualified column list for queries that join `draft_batches`/`projects`.
const I_COLUMNS: &str = "i.id, i.batch_id, i.position, i.title, i.description, i.status, \
                         i.priority, i.enabled, i.created_at, i.updated_at";

/// Provides item-level operations within a draft batch.
pub struct DraftItemRepo;

impl DraftItemRepo {
    /// List a batch's items in insertion order.
    pub async fn list_by_batch(pool: &PgPool, batch_id: DbId) -> Result<Vec<DraftItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM draft_items WHERE batch_id = $1 ORDER BY position ASC"
        );
        sqlx::query_as::<_, DraftItem>(&query)
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    /// Find an item by ID, scoped to a workspace via its batch's project.
    /// Items under a soft-deleted batch behave like missing ones.
    pub async fn find_in_workspace(
        pool: &PgPool,
        id: DbId,
        workspace_id: DbId,
    ) -> Result<Option<DraftItem>, sqlx::Error> {
        let query = format!(
            "SELECT {I_COLUMNS} FROM draft_items i
             JOIN draft_batches b ON b.id = i.batch_id AND b.deleted_at IS NULL
             JOIN projects p ON p.id = b.project_id AND p.deleted_at IS NULL
             WHERE i.id = $1 AND p.workspace_id = $2"
        );
        sqlx::query_as::<_, DraftItem>(&query)
            .bind(id)
            .bind(workspace_id)
            .fetch_optional(pool)
            .await
    }

    /// Patch an item. Only non-`None` fields in `input` are applied;
    /// omitted fields keep their current value.
    ///
    /// Returns `None` if the item is missing, out of scope, or belongs to
    /// a soft-deleted batch.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        workspace_id: DbId,
        input: &UpdateDraftItem,
    ) -> Result<Option<DraftItem>, sqlx::Error> {
        let query = format!(
            "UPDATE draft_items i SET
                title = COALESCE($3, i.title),
                description = COALESCE($4, i.description),
                status = COALESCE($5, i.status),
                priority = COALESCE($6, i.priority),
                enabled = COALESCE($7, i.enabled),
                updated_at = NOW()
             FROM draft_batches b
             JOIN projects p ON p.id = b.project_id AND p.deleted_at IS NULL
             WHERE i.id = $1 AND b.id = i.batch_id AND b.deleted_at IS NULL
               AND p.workspace_id = $2
             RETURNING {I_COLUMNS}"
        );
        sqlx::query_as::<_, DraftItem>(&query)
            .bind(id)
            .bind(workspace_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.enabled)
            .fetch_optional(pool)
            .await
    }
}
