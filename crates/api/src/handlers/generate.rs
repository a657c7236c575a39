//! Generation orchestration handlers.
//!
//! `generate` turns a free-text prompt into a persisted PENDING draft batch;
//! `regenerate` re-runs the provider for an existing batch and replaces its
//! items. Both call the provider only after authorization and validation
//! pass, and persist only after the provider returns, so a failed provider
//! call leaves no rows behind.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskly_core::error::CoreError;
use taskly_core::generation::{validate_prompt, validate_task_count, GenerationContext};
use taskly_core::types::DbId;
use taskly_db::models::draft_batch::{
    CreateDraftBatch, DraftBatchWithItems, GenerateTasksRequest,
};
use taskly_db::models::draft_item::NewDraftItem;
use taskly_db::models::project::Project;
use taskly_db::models::workspace::Workspace;
use taskly_db::repositories::DraftBatchRepo;

use crate::access::{require_project_in_workspace, require_workspace_access};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /workspaces/{workspace_id}/generate-tasks
pub async fn generate(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(request): Json<GenerateTasksRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<DraftBatchWithItems>>)> {
    validate_prompt(&request.prompt)?;
    validate_task_count(request.number_of_tasks)?;

    let workspace = require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let project =
        require_project_in_workspace(&state.pool, request.project_id, workspace_id).await?;

    let context = build_context(&workspace, &project, &request);
    let generated = state.generator.generate_tasks(&context).await?;
    tracing::info!(
        project_id = %project.id,
        task_count = generated.tasks.len(),
        "Generation backend returned a batch"
    );

    let input = CreateDraftBatch {
        project_id: project.id,
        creator_id: user.user_id,
        title: generated.batch_title.clone(),
        prompt: request.prompt.clone(),
    };
    let items = to_draft_items(generated.tasks);
    let (batch, items) = DraftBatchRepo::create_with_items(&state.pool, &input, &items).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: DraftBatchWithItems { batch, items },
        }),
    ))
}

/// POST /workspaces/{workspace_id}/generate-tasks/{batch_id}/regenerate
///
/// Replaces the batch's items and updates its title and prompt. The batch
/// status is deliberately left untouched, so regenerating a batch that was
/// already accepted or cancelled is allowed and does not reopen it.
pub async fn regenerate(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, batch_id)): Path<(DbId, DbId)>,
    Json(request): Json<GenerateTasksRequest>,
) -> AppResult<Json<DataResponse<DraftBatchWithItems>>> {
    validate_prompt(&request.prompt)?;
    validate_task_count(request.number_of_tasks)?;

    let workspace = require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let existing = DraftBatchRepo::find_in_workspace(&state.pool, batch_id, workspace_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "DraftBatch",
            id: batch_id,
        })?;
    // The batch stays bound to its original project; a different project_id
    // in the request body is ignored.
    let project =
        require_project_in_workspace(&state.pool, existing.project_id, workspace_id).await?;

    let context = build_context(&workspace, &project, &request);
    let generated = state.generator.generate_tasks(&context).await?;
    tracing::info!(
        batch_id = %batch_id,
        task_count = generated.tasks.len(),
        "Generation backend returned a replacement batch"
    );

    let items = to_draft_items(generated.tasks);
    let (batch, items) = DraftBatchRepo::replace_items(
        &state.pool,
        batch_id,
        &generated.batch_title,
        &request.prompt,
        &items,
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "DraftBatch",
        id: batch_id,
    })?;

    Ok(Json(DataResponse {
        data: DraftBatchWithItems { batch, items },
    }))
}

/// Assemble the prompt context from the resolved workspace and project.
fn build_context(
    workspace: &Workspace,
    project: &Project,
    request: &GenerateTasksRequest,
) -> GenerationContext {
    GenerationContext {
        prompt: request.prompt.clone(),
        number_of_tasks: request.number_of_tasks,
        workspace_name: workspace.name.clone(),
        workspace_context: workspace.context.clone(),
        project_name: project.name.clone(),
        project_description: project.description.clone(),
        project_context: project.context.clone(),
    }
}

/// Convert provider suggestions into insertable draft items, preserving
/// their order.
fn to_draft_items(tasks: Vec<taskly_ai::GeneratedTask>) -> Vec<NewDraftItem> {
    tasks
        .into_iter()
        .map(|task| NewDraftItem {
            title: task.title,
            description: if task.description.trim().is_empty() {
                None
            } else {
                Some(task.description)
            },
            status: task.status,
            priority: task.priority,
        })
        .collect()
}
