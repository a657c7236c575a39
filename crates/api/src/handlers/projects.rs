//! Project CRUD handlers, all nested under a workspace.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskly_core::error::CoreError;
use taskly_core::types::DbId;
use taskly_db::models::project::{CreateProject, Project, UpdateProject};
use taskly_db::repositories::ProjectRepo;

use crate::access::{require_project_in_workspace, require_workspace_access};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /workspaces/{workspace_id}/projects
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let projects = ProjectRepo::list_by_workspace(&state.pool, workspace_id).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /workspaces/{workspace_id}/projects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Project name must not be empty".into()).into());
    }
    let project = ProjectRepo::create(&state.pool, workspace_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /workspaces/{workspace_id}/projects/{project_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Project>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let project = require_project_in_workspace(&state.pool, project_id, workspace_id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PATCH /workspaces/{workspace_id}/projects/{project_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, project_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let updated = ProjectRepo::update(&state.pool, project_id, workspace_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /workspaces/{workspace_id}/projects/{project_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    if !ProjectRepo::soft_delete(&state.pool, project_id, workspace_id).await? {
        return Err(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
