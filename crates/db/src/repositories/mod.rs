//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods operating on
//! entities below a workspace take the workspace id and scope their
//! queries to it, so a row outside the caller's workspace behaves exactly
//! like a missing row.

pub mod draft_batch_repo;
pub mod draft_item_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;
pub mod workspace_repo;

pub use draft_batch_repo::DraftBatchRepo;
pub use draft_item_repo::DraftItemRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use workspace_repo::WorkspaceRepo;
