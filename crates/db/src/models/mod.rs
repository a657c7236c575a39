//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod draft_batch;
pub mod draft_item;
pub mod project;
pub mod task;
pub mod user;
pub mod workspace;
