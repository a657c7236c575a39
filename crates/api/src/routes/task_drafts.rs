//! Draft batch routes, nested under `/workspaces/{workspace_id}/task-drafts`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::task_drafts;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task_drafts::list))
        .route(
            "/{batch_id}",
            get(task_drafts::get).delete(task_drafts::delete),
        )
        .route("/{batch_id}/accept", post(task_drafts::accept))
        .route("/{batch_id}/cancel", post(task_drafts::cancel))
        .route("/items/{item_id}", patch(task_drafts::update_item))
}
