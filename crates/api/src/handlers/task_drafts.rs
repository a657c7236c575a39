//! Draft batch lifecycle handlers: review, item patching, accept, cancel,
//! and soft delete.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use taskly_core::error::CoreError;
use taskly_core::types::DbId;
use taskly_db::models::draft_batch::{
    AcceptBatchResponse, CancelBatchResponse, DraftBatch, DraftBatchStatus, DraftBatchSummary,
    DraftBatchWithItems,
};
use taskly_db::models::draft_item::{DraftItem, UpdateDraftItem};
use taskly_db::repositories::{DraftBatchRepo, DraftItemRepo};

use crate::access::{require_project_in_workspace, require_workspace_access};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DraftListQuery {
    pub project_id: DbId,
}

/// GET /workspaces/{workspace_id}/task-drafts?project_id={project_id}
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Query(query): Query<DraftListQuery>,
) -> AppResult<Json<DataResponse<Vec<DraftBatchSummary>>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    require_project_in_workspace(&state.pool, query.project_id, workspace_id).await?;
    let batches = DraftBatchRepo::list_by_project(&state.pool, query.project_id).await?;
    Ok(Json(DataResponse { data: batches }))
}

/// GET /workspaces/{workspace_id}/task-drafts/{batch_id}
pub async fn get(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, batch_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<DraftBatchWithItems>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let batch = find_batch(&state, batch_id, workspace_id).await?;
    let items = DraftItemRepo::list_by_batch(&state.pool, batch.id).await?;
    Ok(Json(DataResponse {
        data: DraftBatchWithItems { batch, items },
    }))
}

/// PATCH /workspaces/{workspace_id}/task-drafts/items/{item_id}
///
/// Items stay editable regardless of batch status; only acceptance reads
/// the `enabled` flag.
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateDraftItem>,
) -> AppResult<Json<DataResponse<DraftItem>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let item = DraftItemRepo::update(&state.pool, item_id, workspace_id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "DraftItem",
            id: item_id,
        })?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /workspaces/{workspace_id}/task-drafts/{batch_id}/accept
///
/// Materializes the batch's enabled items into tasks and flips the batch
/// to ACCEPTED, atomically. Requires the batch to be PENDING with at least
/// one enabled item.
pub async fn accept(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, batch_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<AcceptBatchResponse>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let batch = find_batch(&state, batch_id, workspace_id).await?;
    if batch.status != DraftBatchStatus::Pending {
        return Err(not_pending());
    }

    let items = DraftItemRepo::list_by_batch(&state.pool, batch.id).await?;
    let enabled: Vec<DraftItem> = items.into_iter().filter(|item| item.enabled).collect();
    if enabled.is_empty() {
        return Err(CoreError::Validation(
            "At least one enabled item is required to accept a batch".into(),
        )
        .into());
    }

    let accepted =
        DraftBatchRepo::accept(&state.pool, batch.id, batch.project_id, user.user_id, &enabled)
            .await?;
    if !accepted {
        // Lost the race against a concurrent accept or cancel.
        return Err(not_pending());
    }

    tracing::info!(
        batch_id = %batch.id,
        tasks_created = enabled.len(),
        "Draft batch accepted"
    );
    Ok(Json(DataResponse {
        data: AcceptBatchResponse {
            accepted: true,
            tasks_created: enabled.len(),
        },
    }))
}

/// POST /workspaces/{workspace_id}/task-drafts/{batch_id}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, batch_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<CancelBatchResponse>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let batch = find_batch(&state, batch_id, workspace_id).await?;
    if !DraftBatchRepo::cancel(&state.pool, batch.id).await? {
        return Err(not_pending());
    }
    Ok(Json(DataResponse {
        data: CancelBatchResponse { cancelled: true },
    }))
}

/// DELETE /workspaces/{workspace_id}/task-drafts/{batch_id}
///
/// Soft delete, allowed in any status. The batch disappears from every
/// read and lifecycle operation afterwards.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path((workspace_id, batch_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<DraftBatch>>> {
    require_workspace_access(&state.pool, workspace_id, user.user_id).await?;
    let batch = DraftBatchRepo::soft_delete(&state.pool, batch_id, workspace_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "DraftBatch",
            id: batch_id,
        })?;
    Ok(Json(DataResponse { data: batch }))
}

async fn find_batch(
    state: &AppState,
    batch_id: DbId,
    workspace_id: DbId,
) -> Result<DraftBatch, AppError> {
    DraftBatchRepo::find_in_workspace(&state.pool, batch_id, workspace_id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "DraftBatch",
                id: batch_id,
            }
            .into()
        })
}

fn not_pending() -> AppError {
    CoreError::InvalidState("Draft batch is no longer PENDING".into()).into()
}
