//! Project routes, nested under `/workspaces/{workspace_id}/projects`.

use axum::routing::get;
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{project_id}",
            get(projects::get)
                .patch(projects::update)
                .delete(projects::delete),
        )
}
