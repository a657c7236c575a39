//! Generation routes, nested under `/workspaces/{workspace_id}/generate-tasks`.

use axum::routing::post;
use axum::Router;

use crate::handlers::generate;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(generate::generate))
        .route("/{batch_id}/regenerate", post(generate::regenerate))
}
