//! Request handlers, one module per resource.

pub mod generate;
pub mod projects;
pub mod task_drafts;
pub mod tasks;
pub mod workspaces;
