//! PostgreSQL implementation of token repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use super::parse_column;
use crate::domain::entities::{Partner, Workspace};
use crate::domain::repositories::{ApiToken, NewApiToken, TokenGrant, TokenRepository};
use crate::error::AppError;

const TOKEN_COLUMNS: &str =
    "id, name, token_hash, workspace_id, partner_id, scopes, created_at, last_used_at, revoked_at";

#[derive(sqlx::FromRow)]
struct ApiTokenRow {
    id: i64,
    name: String,
    token_hash: String,
    workspace_id: Option<String>,
    partner_id: Option<String>,
    scopes: Vec<String>,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    revoked_at: Option<DateTime<Utc>>,
}

impl From<ApiTokenRow> for ApiToken {
    fn from(r: ApiTokenRow) -> Self {
        ApiToken {
            id: r.id,
            name: r.name,
            token_hash: r.token_hash,
            workspace_id: r.workspace_id,
            partner_id: r.partner_id,
            scopes: r.scopes,
            created_at: r.created_at,
            last_used_at: r.last_used_at,
            revoked_at: r.revoked_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GrantRow {
    token_id: i64,
    scopes: Vec<String>,
    workspace_id: Option<String>,
    workspace_name: Option<String>,
    workspace_slug: Option<String>,
    workspace_plan: Option<String>,
    workspace_created_at: Option<DateTime<Utc>>,
    partner_id: Option<String>,
    partner_name: Option<String>,
    partner_image: Option<String>,
}

impl TryFrom<GrantRow> for TokenGrant {
    type Error = AppError;

    fn try_from(r: GrantRow) -> Result<Self, Self::Error> {
        let workspace = match (
            r.workspace_id,
            r.workspace_name,
            r.workspace_slug,
            r.workspace_plan,
            r.workspace_created_at,
        ) {
            (Some(id), Some(name), Some(slug), Some(plan), Some(created_at)) => Some(Workspace {
                id,
                name,
                slug,
                plan: parse_column("workspaces.plan", &plan)?,
                created_at,
            }),
            _ => None,
        };

        let partner = match (r.partner_id, r.partner_name) {
            (Some(id), Some(name)) => Some(Partner {
                id,
                name,
                image: r.partner_image,
            }),
            _ => None,
        };

        Ok(TokenGrant {
            token_id: r.token_id,
            workspace,
            partner,
            scopes: r.scopes,
        })
    }
}

/// PostgreSQL repository for API token storage and resolution.
///
/// Stores keyed hashes of tokens. Raw tokens are never persisted.
pub struct PgTokenRepository {
    pool: Arc<PgPool>,
}

impl PgTokenRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn resolve(&self, token_hash: &str) -> Result<Option<TokenGrant>, AppError> {
        let row = sqlx::query_as::<_, GrantRow>(
            r#"
            SELECT t.id AS token_id,
                   t.scopes,
                   w.id AS workspace_id,
                   w.name AS workspace_name,
                   w.slug AS workspace_slug,
                   w.plan AS workspace_plan,
                   w.created_at AS workspace_created_at,
                   p.id AS partner_id,
                   p.name AS partner_name,
                   p.image AS partner_image
            FROM api_tokens t
            LEFT JOIN workspaces w ON w.id = t.workspace_id
            LEFT JOIN partners p ON p.id = t.partner_id
            WHERE t.token_hash = $1
              AND t.revoked_at IS NULL
            "#,
        )
        .bind(token_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(TokenGrant::try_from).transpose()
    }

    async fn update_last_used(&self, token_id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE api_tokens
            SET last_used_at = NOW()
            WHERE id = $1
              AND revoked_at IS NULL
            "#,
        )
        .bind(token_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn create_token(&self, token: NewApiToken) -> Result<ApiToken, AppError> {
        let sql = format!(
            r#"
            INSERT INTO api_tokens (name, token_hash, workspace_id, partner_id, scopes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TOKEN_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ApiTokenRow>(&sql)
            .bind(token.name)
            .bind(token.token_hash)
            .bind(token.workspace_id)
            .bind(token.partner_id)
            .bind(token.scopes)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM api_tokens ORDER BY created_at DESC");

        let rows = sqlx::query_as::<_, ApiTokenRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(ApiToken::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM api_tokens WHERE id = $1");

        let row = sqlx::query_as::<_, ApiTokenRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ApiToken::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let sql = format!("SELECT {TOKEN_COLUMNS} FROM api_tokens WHERE name = $1");

        let row = sqlx::query_as::<_, ApiTokenRow>(&sql)
            .bind(name)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ApiToken::from))
    }

    async fn revoke_token(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE api_tokens
            SET revoked_at = COALESCE(revoked_at, NOW())
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Token not found",
                json!({ "token_id": id }),
            ));
        }

        Ok(())
    }
}
