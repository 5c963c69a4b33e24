mod common;

use axum_test::TestServer;
use common::{LinkFixture, bearer};
use serde_json::{Value, json};
use sqlx::PgPool;

async fn make_server(pool: &PgPool) -> TestServer {
    let (state, _rx) = common::create_test_state(pool.clone());
    TestServer::new(common::api_app(state)).unwrap()
}

async fn link_exists(pool: &PgPool, id: &str) -> bool {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM links WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

// ─── INFO ────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_info_returns_partner_and_discount(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "pro").await;
    common::create_partner(&pool, "pn_1", "Jane").await;
    common::create_program(&pool, "prog_1", "ws_1", chrono::Utc::now()).await;
    common::create_discount(&pool, "disc_1", "prog_1", 25, "percentage").await;
    common::set_default_discount(&pool, "prog_1", "disc_1").await;
    common::enroll(&pool, "pn_1", "prog_1", None).await;
    common::create_link(
        &pool,
        LinkFixture::new("link_1", "dub.sh", "jane", "ws_1").partner("prog_1", "pn_1"),
    )
    .await;
    let token = common::workspace_token(&pool, "ws_1", &["links.read"]).await;
    let server = make_server(&pool).await;

    let response = server
        .get("/api/links/info?domain=dub.sh&key=JANE")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["id"], "link_1");
    assert_eq!(json["key"], "jane");
    assert_eq!(json["partner"]["id"], "pn_1");
    assert_eq!(json["partner"]["name"], "Jane");
    assert_eq!(json["discount"]["id"], "disc_1");
    assert_eq!(json["discount"]["amount"], 25);
    assert_eq!(json["discount"]["type"], "percentage");
}

#[sqlx::test]
async fn test_info_plain_link_has_null_partner(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    common::create_link(&pool, LinkFixture::new("link_1", "dub.sh", "docs", "ws_1")).await;
    let token = common::workspace_token(&pool, "ws_1", &["links.read"]).await;
    let server = make_server(&pool).await;

    let response = server
        .get("/api/links/info?domain=dub.sh&key=docs")
        .add_header("Authorization", bearer(&token))
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert!(json["partner"].is_null());
    assert!(json["discount"].is_null());
}

#[sqlx::test]
async fn test_info_other_workspace_is_not_found(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    common::create_workspace(&pool, "ws_2", "free").await;
    common::create_link(&pool, LinkFixture::new("link_1", "dub.sh", "docs", "ws_2")).await;
    let token = common::workspace_token(&pool, "ws_1", &["links.read"]).await;
    let server = make_server(&pool).await;

    let response = server
        .get("/api/links/info?domain=dub.sh&key=docs")
        .add_header("Authorization", bearer(&token))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[sqlx::test]
async fn test_info_case_sensitive_domain_returns_decoded_key(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    let stored = partner_links::utils::key_codec::encode_key("AbC");
    common::create_link(&pool, LinkFixture::new("link_1", "buff.ly", &stored, "ws_1")).await;
    let token = common::workspace_token(&pool, "ws_1", &["links.read"]).await;
    let server = make_server(&pool).await;

    let found = server
        .get("/api/links/info?domain=buff.ly&key=AbC")
        .add_header("Authorization", bearer(&token))
        .await;
    found.assert_status_ok();
    assert_eq!(found.json::<Value>()["key"], "AbC");

    let wrong_case = server
        .get("/api/links/info?domain=buff.ly&key=abc")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(wrong_case.status_code(), 404);
}

// ─── BULK DELETE ─────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_bulk_delete_own_links(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    common::create_workspace(&pool, "ws_2", "free").await;
    common::create_link(&pool, LinkFixture::new("a", "dub.sh", "a", "ws_1")).await;
    common::create_link(&pool, LinkFixture::new("b", "dub.sh", "b", "ws_1")).await;
    common::create_link(&pool, LinkFixture::new("c", "dub.sh", "c", "ws_2")).await;
    let token = common::workspace_token(&pool, "ws_1", &["links.write"]).await;
    let server = make_server(&pool).await;

    let response = server
        .delete("/api/links/bulk")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "linkIds": ["a", "b", "c", "missing"] }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "deletedCount": 2 }));
    assert!(!link_exists(&pool, "a").await);
    assert!(!link_exists(&pool, "b").await);
    assert!(link_exists(&pool, "c").await);
}

#[sqlx::test]
async fn test_bulk_delete_folder_links_need_folder_scope(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    common::create_link(&pool, LinkFixture::new("a", "dub.sh", "a", "ws_1")).await;
    common::create_link(&pool, LinkFixture::new("b", "dub.sh", "b", "ws_1").folder("fold_1")).await;
    let limited = common::workspace_token(&pool, "ws_1", &["links.write"]).await;
    let full = common::workspace_token(&pool, "ws_1", &["links.write", "folders.write"]).await;
    let server = make_server(&pool).await;
    let body = json!({ "linkIds": ["a", "b"] });

    let denied = server
        .delete("/api/links/bulk")
        .add_header("Authorization", bearer(&limited))
        .json(&body)
        .await;
    assert_eq!(denied.status_code(), 403);
    assert!(link_exists(&pool, "a").await);

    let allowed = server
        .delete("/api/links/bulk")
        .add_header("Authorization", bearer(&full))
        .json(&body)
        .await;
    allowed.assert_status_ok();
    assert_eq!(allowed.json::<Value>()["deletedCount"], 2);
}

#[sqlx::test]
async fn test_bulk_delete_validates_size(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    let token = common::workspace_token(&pool, "ws_1", &["links.write"]).await;
    let server = make_server(&pool).await;

    let empty = server
        .delete("/api/links/bulk")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "linkIds": [] }))
        .await;
    assert_eq!(empty.status_code(), 400);

    let ids: Vec<String> = (0..101).map(|i| format!("link_{i}")).collect();
    let too_many = server
        .delete("/api/links/bulk")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "linkIds": ids }))
        .await;
    assert_eq!(too_many.status_code(), 400);
    assert_eq!(too_many.json::<Value>()["error"]["code"], "validation_error");
}

#[sqlx::test]
async fn test_bulk_delete_requires_write_scope(pool: PgPool) {
    common::create_workspace(&pool, "ws_1", "free").await;
    common::create_link(&pool, LinkFixture::new("a", "dub.sh", "a", "ws_1")).await;
    let token = common::workspace_token(&pool, "ws_1", &["links.read"]).await;
    let server = make_server(&pool).await;

    let response = server
        .delete("/api/links/bulk")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "linkIds": ["a"] }))
        .await;

    assert_eq!(response.status_code(), 403);
    assert!(link_exists(&pool, "a").await);
}
