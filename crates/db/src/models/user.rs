//! User entity model.
//!
//! Credential storage and token issuance live outside this service; users
//! exist here so tasks and draft batches can reference their creator.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskly_core::types::{DbId, Timestamp};

/// A user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub display_name: String,
}
