//! Route tables, one module per resource, composed into the `/api/v1` tree.

pub mod generate;
pub mod health;
pub mod projects;
pub mod task_drafts;
pub mod tasks;
pub mod workspaces;

use axum::Router;

use crate::state::AppState;

/// All authenticated API routes, to be nested under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/workspaces", workspaces::router())
        .nest("/workspaces/{workspace_id}/projects", projects::router())
        .nest("/workspaces/{workspace_id}/tasks", tasks::router())
        .nest("/workspaces/{workspace_id}/generate-tasks", generate::router())
        .nest("/workspaces/{workspace_id}/task-drafts", task_drafts::router())
}
