//! HTTP-level tests for direct task CRUD, including the optimistic
//! concurrency guard on updates.

mod common;

use axum::http::StatusCode;
use common::{
    assert_error, body_json, delete, get, patch_json, post_json, sample_batch, seed_user,
    StubGenerator,
};
use sqlx::PgPool;
use std::sync::Arc;

struct Scene {
    stub: Arc<StubGenerator>,
    pool: PgPool,
    token: String,
    workspace_id: String,
    project_id: String,
}

impl Scene {
    fn app(&self) -> axum::Router {
        common::build_test_app(self.pool.clone(), self.stub.clone())
    }
}

async fn scene(pool: PgPool) -> Scene {
    let stub = StubGenerator::returning(sample_batch());
    let (_, token) = seed_user(&pool, "tasks@example.com").await;

    let app = common::build_test_app(pool.clone(), stub.clone());
    let response = post_json(
        app,
        "/api/v1/workspaces",
        &token,
        serde_json::json!({"name": "Acme"}),
    )
    .await;
    let workspace_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let app = common::build_test_app(pool.clone(), stub.clone());
    let response = post_json(
        app,
        &format!("/api/v1/workspaces/{workspace_id}/projects"),
        &token,
        serde_json::json!({"name": "Website"}),
    )
    .await;
    let project_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    Scene {
        stub,
        pool,
        token,
        workspace_id,
        project_id,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn create_applies_defaults(pool: PgPool) {
    let scene = scene(pool).await;
    let response = post_json(
        scene.app(),
        &format!("/api/v1/workspaces/{}/tasks", scene.workspace_id),
        &scene.token,
        serde_json::json!({"project_id": scene.project_id, "title": "Write copy"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "TODO");
    assert_eq!(json["data"]["priority"], "MEDIUM");
}

#[sqlx::test(migrations = "../../migrations")]
async fn stale_update_is_a_conflict(pool: PgPool) {
    let scene = scene(pool).await;
    let response = post_json(
        scene.app(),
        &format!("/api/v1/workspaces/{}/tasks", scene.workspace_id),
        &scene.token,
        serde_json::json!({"project_id": scene.project_id, "title": "Write copy"}),
    )
    .await;
    let created = body_json(response).await["data"].clone();
    let task_id = created["id"].as_str().unwrap();
    let uri = format!(
        "/api/v1/workspaces/{}/tasks/{task_id}",
        scene.workspace_id
    );

    // First writer wins.
    let response = patch_json(
        scene.app(),
        &uri,
        &scene.token,
        serde_json::json!({
            "status": "IN_PROGRESS",
            "expected_updated_at": created["updated_at"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Second writer still holds the old timestamp.
    let response = patch_json(
        scene.app(),
        &uri,
        &scene.token,
        serde_json::json!({
            "status": "DONE",
            "expected_updated_at": created["updated_at"],
        }),
    )
    .await;
    assert_error(response, StatusCode::CONFLICT, "CONFLICT").await;

    let response = get(scene.app(), &uri, &scene.token).await;
    assert_eq!(body_json(response).await["data"]["status"], "IN_PROGRESS");
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_is_permanent(pool: PgPool) {
    let scene = scene(pool).await;
    let response = post_json(
        scene.app(),
        &format!("/api/v1/workspaces/{}/tasks", scene.workspace_id),
        &scene.token,
        serde_json::json!({"project_id": scene.project_id, "title": "Temp"}),
    )
    .await;
    let task_id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let uri = format!(
        "/api/v1/workspaces/{}/tasks/{task_id}",
        scene.workspace_id
    );

    let response = delete(scene.app(), &uri, &scene.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(scene.app(), &uri, &scene.token).await;
    assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}
