//! Task routes, nested under `/workspaces/{workspace_id}/tasks`.

use axum::routing::get;
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list).post(tasks::create))
        .route(
            "/{task_id}",
            get(tasks::get).patch(tasks::update).delete(tasks::delete),
        )
}
