//! Task CRUD handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskly_core::error::CoreError;
use taskly_core::types::DbId;
use taskly_db::models::task::{CreateTask, Task, UpdateTask};
use taskly_db::repositories::task_repo::TaskUpdateOutcome;
use taskly_db::repositories::TaskRepo;

use crate::access::{require_project_in_workspace, require_workspace_access};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub project_id: DbId,
}

/// GET /workspaces/{workspace_id}/tasks?project_id={project_id}
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    require_project_in_workspace(&state.pool, query.project_id, workspace_id).await?;
    let tasks = TaskRepo::list_by_project(&state.pool, query.project_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}

/// POST /workspaces/{workspace_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    require_project_in_workspace(&state.pool, input.project_id, workspace_id).await?;
    if input.title.trim().is_empty() {
        return Err(CoreError::Validation("Task title must not be empty".into()).into());
    }
    let task = TaskRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /workspaces/{workspace_id}/tasks/{task_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<Task>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let task = TaskRepo::find_in_workspace(&state.pool, task_id, workspace_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        })?;
    Ok(Json(DataResponse { data: task }))
}

/// PATCH /workspaces/{workspace_id}/tasks/{task_id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, task_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    match TaskRepo::update(&state.pool, task_id, workspace_id, &input).await? {
        TaskUpdateOutcome::Updated(task) => Ok(Json(DataResponse { data: task })),
        TaskUpdateOutcome::Conflict => Err(CoreError::Conflict(
            "Task was modified by someone else, reload and retry".into(),
        )
        .into()),
        TaskUpdateOutcome::NotFound => Err(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }
        .into()),
    }
}

/// DELETE /workspaces/{workspace_id}/tasks/{task_id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    if !TaskRepo::delete(&state.pool, task_id, workspace_id).await? {
        return Err(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }
        .into());
    }
    Ok(StatusCode::NO_CONTENT)
}
