//! Repository for the `workspaces` and `workspace_members` tables.

use sqlx::PgPool;
use taskly_core::types::DbId;

use crate::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, context, owner_id, created_at, updated_at, deleted_at";

/// Qualified column list for queries that join other tables.
const W_COLUMNS: &str =
    "w.id, w.name, w.context, w.owner_id, w.created_at, w.updated_at, w.deleted_at";

/// Provides CRUD and membership operations for workspaces.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Insert a new workspace and enroll the owner as a member, atomically.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateWorkspace,
    ) -> Result<Workspace, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO workspaces (name, context, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let workspace = sqlx::query_as::<_, Workspace>(&query)
            .bind(&input.name)
            .bind(&input.context)
            .bind(owner_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO workspace_members (workspace_id, user_id, role)
             VALUES ($1, $2, 'owner')",
        )
        .bind(workspace.id)
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(workspace)
    }

    /// Find a non-deleted workspace the given user can access (owner or
    /// member). Returns `None` when the workspace is missing, soft-deleted,
    /// or the user has no membership.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!(
            "SELECT {W_COLUMNS} FROM workspaces w
             LEFT JOIN workspace_members m ON m.workspace_id = w.id AND m.user_id = $2
             WHERE w.id = $1 AND w.deleted_at IS NULL
               AND (w.owner_id = $2 OR m.user_id IS NOT NULL)"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-deleted workspace by ID regardless of caller. Used to
    /// distinguish "missing" from "no access".
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all non-deleted workspaces the user belongs to, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Workspace>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT {W_COLUMNS} FROM workspaces w
             LEFT JOIN workspace_members m ON m.workspace_id = w.id AND m.user_id = $1
             WHERE w.deleted_at IS NULL AND (w.owner_id = $1 OR m.user_id IS NOT NULL)
             ORDER BY w.created_at DESC"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a workspace. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkspace,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces SET
                name = COALESCE($2, name),
                context = COALESCE($3, context),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.context)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a workspace by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE workspaces SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a member to a workspace. Re-adding an existing member is a no-op.
    pub async fn add_member(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
        role: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO workspace_members (workspace_id, user_id, role)
             VALUES ($1, $2, $3)
             ON CONFLICT (workspace_id, user_id) DO NOTHING",
        )
        .bind(workspace_id)
        .bind(user_id)
        .bind(role)
        .execute(pool)
        .await?;
        Ok(())
    }
}
