//! Draft batch entity model and DTOs.
//!
//! A draft batch is one AI-generation request's result set, reviewable
//! before any of it becomes real tasks.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskly_core::types::{DbId, Timestamp};

use crate::models::draft_item::DraftItem;

/// Batch review status, stored as the Postgres `draft_batch_status` enum.
///
/// Transitions are one-directional: PENDING is initial, ACCEPTED and
/// CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "draft_batch_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftBatchStatus {
    Pending,
    Accepted,
    Cancelled,
}

/// A draft batch row from the `draft_batches` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DraftBatch {
    pub id: DbId,
    pub project_id: DbId,
    pub creator_id: DbId,
    /// Short summary produced by the generation backend.
    pub title: String,
    /// The original user request text.
    pub prompt: String,
    pub status: DraftBatchStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
}

/// A draft batch annotated with its item count, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DraftBatchSummary {
    pub id: DbId,
    pub project_id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub prompt: String,
    pub status: DraftBatchStatus,
    pub item_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert input for a new draft batch.
#[derive(Debug, Clone)]
pub struct CreateDraftBatch {
    pub project_id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub prompt: String,
}

/// A draft batch together with its items, the full review payload.
#[derive(Debug, Serialize)]
pub struct DraftBatchWithItems {
    #[serde(flatten)]
    pub batch: DraftBatch,
    pub items: Vec<DraftItem>,
}

/// DTO for a generate or regenerate request.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTasksRequest {
    pub project_id: DbId,
    /// The user's free-text request (1..=1000 chars).
    pub prompt: String,
    /// Explicit task-count override (1..=20).
    pub number_of_tasks: Option<u8>,
}

/// Summary returned by a successful accept.
#[derive(Debug, Serialize)]
pub struct AcceptBatchResponse {
    pub accepted: bool,
    pub tasks_created: usize,
}

/// Acknowledgement returned by a successful cancel.
#[derive(Debug, Serialize)]
pub struct CancelBatchResponse {
    pub cancelled: bool,
}
