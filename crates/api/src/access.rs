//! Authorization guards.
//!
//! Every workspace-scoped operation calls these before touching anything
//! else. A missing workspace and a workspace the caller cannot access are
//! reported differently (404 vs 403); everything below the workspace is
//! scoped in SQL, so out-of-scope rows simply look missing.

use sqlx::PgPool;
use taskly_core::error::CoreError;
use taskly_core::types::DbId;
use taskly_db::models::project::Project;
use taskly_db::models::workspace::Workspace;
use taskly_db::repositories::{ProjectRepo, WorkspaceRepo};

use crate::error::AppError;

/// Verify the user can access the workspace (owner or member), returning it.
///
/// Fails with `NotFound` when the workspace is missing or soft-deleted,
/// `Forbidden` when it exists but the user has no membership.
pub async fn require_workspace_access(
    pool: &PgPool,
    workspace_id: DbId,
    user_id: DbId,
) -> Result<Workspace, AppError> {
    if let Some(workspace) = WorkspaceRepo::find_for_user(pool, workspace_id, user_id).await? {
        return Ok(workspace);
    }
    match WorkspaceRepo::find_by_id(pool, workspace_id).await? {
        Some(_) => Err(AppError::Core(CoreError::Forbidden(
            "You do not have access to this workspace".into(),
        ))),
        None => Err(AppError::Core(CoreError::NotFound {
            entity: "Workspace",
            id: workspace_id,
        })),
    }
}

/// Verify the project exists, is not soft-deleted, and belongs to the
/// workspace, returning it. Fails with `NotFound` otherwise.
pub async fn require_project_in_workspace(
    pool: &PgPool,
    project_id: DbId,
    workspace_id: DbId,
) -> Result<Project, AppError> {
    ProjectRepo::find_in_workspace(pool, project_id, workspace_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
}
