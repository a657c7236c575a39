//! Workspace routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::workspaces;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workspaces::list).post(workspaces::create))
        .route(
            "/{workspace_id}",
            get(workspaces::get)
                .patch(workspaces::update)
                .delete(workspaces::delete),
        )
        .route("/{workspace_id}/members", post(workspaces::add_member))
}
