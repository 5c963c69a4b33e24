#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use chrono::{DateTime, Utc};
use partner_links::api::routes::api_router;
use partner_links::application::services::auth_service::hash_token;
use partner_links::domain::link_event::LinkEvent;
use partner_links::infrastructure::cache::NullCache;
use partner_links::state::AppState;
use partner_links::utils::key_codec::KeyCodec;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

pub const TEST_SECRET: &str = "test-signing-secret";

pub async fn create_workspace(pool: &PgPool, id: &str, plan: &str) {
    sqlx::query("INSERT INTO workspaces (id, name, slug, plan) VALUES ($1, $1, $1, $2)")
        .bind(id)
        .bind(plan)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_partner(pool: &PgPool, id: &str, name: &str) {
    sqlx::query("INSERT INTO partners (id, name, image) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(name)
        .bind(format!("https://img.example.com/{id}.png"))
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_program(pool: &PgPool, id: &str, workspace_id: &str, created_at: DateTime<Utc>) {
    sqlx::query("INSERT INTO programs (id, workspace_id, name, created_at) VALUES ($1, $2, $1, $3)")
        .bind(id)
        .bind(workspace_id)
        .bind(created_at)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_discount(pool: &PgPool, id: &str, program_id: &str, amount: i32, kind: &str) {
    sqlx::query(
        "INSERT INTO discounts (id, program_id, amount, type, max_duration) VALUES ($1, $2, $3, $4, 6)",
    )
    .bind(id)
    .bind(program_id)
    .bind(amount)
    .bind(kind)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn set_default_discount(pool: &PgPool, program_id: &str, discount_id: &str) {
    sqlx::query("UPDATE programs SET default_discount_id = $2 WHERE id = $1")
        .bind(program_id)
        .bind(discount_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn enroll(pool: &PgPool, partner_id: &str, program_id: &str, discount_id: Option<&str>) {
    sqlx::query(
        "INSERT INTO program_enrollments (id, partner_id, program_id, discount_id)
         VALUES ($1 || ':' || $2, $1, $2, $3)",
    )
    .bind(partner_id)
    .bind(program_id)
    .bind(discount_id)
    .execute(pool)
    .await
    .unwrap();
}

/// Link row; `program_id`/`partner_id` set together for partner links.
pub struct LinkFixture<'a> {
    pub id: &'a str,
    pub domain: &'a str,
    pub key: &'a str,
    pub workspace_id: &'a str,
    pub program_id: Option<&'a str>,
    pub partner_id: Option<&'a str>,
    pub folder_id: Option<&'a str>,
}

impl<'a> LinkFixture<'a> {
    pub fn new(id: &'a str, domain: &'a str, key: &'a str, workspace_id: &'a str) -> Self {
        Self {
            id,
            domain,
            key,
            workspace_id,
            program_id: None,
            partner_id: None,
            folder_id: None,
        }
    }

    pub fn partner(mut self, program_id: &'a str, partner_id: &'a str) -> Self {
        self.program_id = Some(program_id);
        self.partner_id = Some(partner_id);
        self
    }

    pub fn folder(mut self, folder_id: &'a str) -> Self {
        self.folder_id = Some(folder_id);
        self
    }
}

pub async fn create_link(pool: &PgPool, link: LinkFixture<'_>) {
    sqlx::query(
        "INSERT INTO links (id, domain, key, url, workspace_id, program_id, partner_id, folder_id)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(link.id)
    .bind(link.domain)
    .bind(link.key)
    .bind(format!("https://example.com/{}", link.id))
    .bind(link.workspace_id)
    .bind(link.program_id)
    .bind(link.partner_id)
    .bind(link.folder_id)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_event(
    pool: &PgPool,
    event: &str,
    link_id: &str,
    occurred_at: DateTime<Utc>,
    sale_amount: i64,
) {
    sqlx::query(
        "INSERT INTO link_events (event, link_id, program_id, partner_id, occurred_at, sale_amount, country)
         SELECT $1, l.id, l.program_id, l.partner_id, $3, $4, 'US' FROM links l WHERE l.id = $2",
    )
    .bind(event)
    .bind(link_id)
    .bind(occurred_at)
    .bind(sale_amount)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_commission(
    pool: &PgPool,
    id: &str,
    program_id: &str,
    partner_id: &str,
    earnings: i64,
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO commissions (id, program_id, partner_id, amount, earnings, created_at)
         VALUES ($1, $2, $3, $4 * 10, $4, $5)",
    )
    .bind(id)
    .bind(program_id)
    .bind(partner_id)
    .bind(earnings)
    .bind(created_at)
    .execute(pool)
    .await
    .unwrap();
}

/// Issues a workspace token and returns its raw value.
pub async fn workspace_token(pool: &PgPool, workspace_id: &str, scopes: &[&str]) -> String {
    let raw = format!("ws-token-{workspace_id}-{}", scopes.join("-"));
    insert_token(pool, &raw, Some(workspace_id), None, scopes).await;
    raw
}

/// Issues a partner token and returns its raw value.
pub async fn partner_token(pool: &PgPool, partner_id: &str) -> String {
    let raw = format!("pn-token-{partner_id}");
    insert_token(pool, &raw, None, Some(partner_id), &[]).await;
    raw
}

async fn insert_token(
    pool: &PgPool,
    raw: &str,
    workspace_id: Option<&str>,
    partner_id: Option<&str>,
    scopes: &[&str],
) {
    let scopes: Vec<String> = scopes.iter().map(|s| s.to_string()).collect();
    sqlx::query(
        "INSERT INTO api_tokens (name, token_hash, workspace_id, partner_id, scopes)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(raw)
    .bind(hash_token(TEST_SECRET, raw))
    .bind(workspace_id)
    .bind(partner_id)
    .bind(&scopes)
    .execute(pool)
    .await
    .unwrap();
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn create_test_state(pool: PgPool) -> (AppState, mpsc::Receiver<LinkEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        Arc::new(pool),
        Arc::new(NullCache::new()),
        tx,
        KeyCodec::new(["buff.ly".to_string()]),
        TEST_SECRET.to_string(),
    );

    (state, rx)
}

/// `/api` routes with their authentication layers, without rate limiting.
pub fn api_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router(state.clone()))
        .with_state(state)
}

/// Inserts a fixed peer address, as `into_make_service_with_connect_info` would.
pub async fn fake_peer(
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    next.run(req).await
}
