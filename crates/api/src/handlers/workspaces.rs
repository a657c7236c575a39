//! Workspace CRUD and membership handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskly_core::error::CoreError;
use taskly_core::types::DbId;
use taskly_db::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace};
use taskly_db::repositories::WorkspaceRepo;

use crate::access::require_workspace_access;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// DTO for adding a workspace member.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
    pub role: Option<String>,
}

/// GET /workspaces
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Workspace>>>> {
    let workspaces = WorkspaceRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: workspaces }))
}

/// POST /workspaces
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateWorkspace>,
) -> AppResult<(StatusCode, Json<DataResponse<Workspace>>)> {
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Workspace name must not be empty".into()).into());
    }
    let workspace = WorkspaceRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: workspace })))
}

/// GET /workspaces/{workspace_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Workspace>>> {
    let workspace = require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    Ok(Json(DataResponse { data: workspace }))
}

/// PATCH /workspaces/{workspace_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(input): Json<UpdateWorkspace>,
) -> AppResult<Json<DataResponse<Workspace>>> {
    let workspace = require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    require_owner(&workspace, user.user_id)?;

    let updated = WorkspaceRepo::update(&state.pool, workspace_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Workspace",
            id: workspace_id,
        })?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /workspaces/{workspace_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let workspace = require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    require_owner(&workspace, user.user_id)?;

    if !WorkspaceRepo::soft_delete(&state.pool, workspace_id).await? {
        return Err(CoreError::NotFound {
            entity: "Workspace",
            id: workspace_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /workspaces/{workspace_id}/members
pub async fn add_member(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<StatusCode> {
    let workspace = require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    require_owner(&workspace, user.user_id)?;

    let role = input.role.as_deref().unwrap_or("member");
    WorkspaceRepo::add_member(&state.pool, workspace_id, input.user_id, role).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mutating workspace operations are reserved for the owner.
fn require_owner(workspace: &Workspace, user_id: DbId) -> Result<(), AppError> {
    if workspace.owner_id != user_id {
        return Err(CoreError::Forbidden("Only the workspace owner can do this".into()).into());
    }
    Ok(())
}
