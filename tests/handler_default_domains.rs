mod common;

use axum_test::TestServer;
use common::bearer;
use serde_json::json;
use sqlx::PgPool;

async fn make_server(pool: &PgPool) -> TestServer {
    let (state, _rx) = common::create_test_state(pool.clone());
    TestServer::new(common::api_app(state)).unwrap()
}

async fn stored_reflist(pool: &PgPool, workspace_id: &str) -> Option<bool> {
    sqlx::query_scalar("SELECT reflist FROM default_domains WHERE workspace_id = $1")
        .bind(workspace_id)
        .fetch_optional(pool)
        .await
        .unwrap()
}

// ─── GET ─────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_without_row_is_empty(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.read"]).await;
    let server = make_server(&pool).await;

    let response = server
        .get("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), json!([]));
}

#[sqlx::test]
async fn test_list_after_update_with_search(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "pro").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.read", "domains.write"]).await;
    let server = make_server(&pool).await;

    server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": ["refl.ist"] }))
        .await
        .assert_status_ok();

    let all = server
        .get("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(all.json::<serde_json::Value>(), json!(["refl.ist"]));

    let matching = server
        .get("/api/domains/default?search=REFL")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(matching.json::<serde_json::Value>(), json!(["refl.ist"]));

    let none = server
        .get("/api/domains/default?search=dub")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(none.json::<serde_json::Value>(), json!([]));
}

#[sqlx::test]
async fn test_list_requires_scope(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    let token = common::workspace_token(&pool, "ws_1", &["links.read"]).await;
    let server = make_server(&pool).await;

    let response = server
        .get("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 403);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "forbidden");
    assert_eq!(json["error"]["details"]["required_scope"], "domains.read");
}

#[sqlx::test]
async fn test_missing_token_is_unauthorized(pool: PgPool) {
    let server = make_server(&pool).await;

    let response = server.get("/api/domains/default").await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.header("www-authenticate").to_str().unwrap(), "Bearer");
}

#[sqlx::test]
async fn test_partner_token_is_unauthorized(pool: PgPool) {
    common::create_partner(&pool, "pn_1", "Jane").await;
    let token = common::partner_token(&pool, "pn_1").await;
    let server = make_server(&pool).await;

    let response = server
        .get("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 401);
}

// ─── PATCH ───────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_update_persists_reflist(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.write"]).await;
    let server = make_server(&pool).await;

    let response = server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": ["dub.sh", "refl.ist"] }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["workspaceId"], "ws_1");
    assert_eq!(json["reflist"], true);
    assert_eq!(stored_reflist(&pool, "ws_1").await, Some(true));

    server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": [] }))
        .await
        .assert_status_ok();
    assert_eq!(stored_reflist(&pool, "ws_1").await, Some(false));
}

#[sqlx::test]
async fn test_free_plan_cannot_select_dub_link(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.write"]).await;
    let server = make_server(&pool).await;

    let response = server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": ["refl.ist", "dub.link"] }))
        .await;

    assert_eq!(response.status_code(), 403);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "forbidden");
    assert_eq!(
        json["error"]["message"],
        "You can only use dub.link on a Pro plan and above. Upgrade to Pro to use this domain."
    );
    assert_eq!(stored_reflist(&pool, "ws_1").await, None);
}

#[sqlx::test]
async fn test_paid_plan_can_select_dub_link(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "pro").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.write"]).await;
    let server = make_server(&pool).await;

    let response = server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": ["dub.link"] }))
        .await;

    response.assert_status_ok();
    assert_eq!(stored_reflist(&pool, "ws_1").await, Some(false));
}

#[sqlx::test]
async fn test_unknown_domain_is_validation_error(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "pro").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.write"]).await;
    let server = make_server(&pool).await;

    let response = server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": ["example.com"] }))
        .await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["details"]["domain"], "example.com");
}

#[sqlx::test]
async fn test_malformed_body_is_validation_error(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "pro").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.write"]).await;
    let server = make_server(&pool).await;

    let response = server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": "refl.ist" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert_eq!(json["error"]["message"], "Invalid request body");
    assert_eq!(stored_reflist(&pool, "ws_1").await, None);
}

#[sqlx::test]
async fn test_update_requires_write_scope(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "pro").await;
    let token = common::workspace_token(&pool, "ws_1", &["domains.read"]).await;
    let server = make_server(&pool).await;

    let response = server
        .patch("/api/domains/default")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "defaultDomains": ["refl.ist"] }))
        .await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(stored_reflist(&pool, "ws_1").await, None);
}
