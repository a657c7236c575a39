//! Draft item entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskly_core::types::{DbId, Timestamp};

use crate::models::task::{TaskPriority, TaskStatus};

/// A draft item row from the `draft_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DraftItem {
    pub id: DbId,
    pub batch_id: DbId,
    /// Zero-based insertion order within the batch.
    pub position: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Disabled items stay visible and editable but are never materialized
    /// into tasks on accept.
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert input for one draft item, used at batch creation and regeneration.
#[derive(Debug, Clone)]
pub struct NewDraftItem {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

/// DTO for patching a draft item. Only fields present in the patch change;
/// omitted fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDraftItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub enabled: Option<bool>,
}
