//! PostgreSQL implementation of default domains repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{DefaultDomainFlags, DefaultDomains};
use crate::domain::repositories::DefaultDomainsRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct DefaultDomainsRow {
    id: i64,
    workspace_id: String,
    reflist: bool,
    updated_at: DateTime<Utc>,
}

impl From<DefaultDomainsRow> for DefaultDomains {
    fn from(r: DefaultDomainsRow) -> Self {
        DefaultDomains {
            id: r.id,
            workspace_id: r.workspace_id,
            reflist: r.reflist,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for per-workspace reference domain flags.
///
/// One row per workspace, enforced by a unique `workspace_id`.
pub struct PgDefaultDomainsRepository {
    pool: Arc<PgPool>,
}

impl PgDefaultDomainsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DefaultDomainsRepository for PgDefaultDomainsRepository {
    async fn find_by_workspace(
        &self,
        workspace_id: &str,
    ) -> Result<Option<DefaultDomains>, AppError> {
        let row = sqlx::query_as::<_, DefaultDomainsRow>(
            r#"
            SELECT id, workspace_id, reflist, updated_at
            FROM default_domains
            WHERE workspace_id = $1
            "#,
        )
        .bind(workspace_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(DefaultDomains::from))
    }

    async fn upsert(
        &self,
        workspace_id: &str,
        flags: DefaultDomainFlags,
    ) -> Result<DefaultDomains, AppError> {
        let row = sqlx::query_as::<_, DefaultDomainsRow>(
            r#"
            INSERT INTO default_domains (workspace_id, reflist)
            VALUES ($1, $2)
            ON CONFLICT (workspace_id)
            DO UPDATE SET reflist = EXCLUDED.reflist, updated_at = NOW()
            RETURNING id, workspace_id, reflist, updated_at
            "#,
        )
        .bind(workspace_id)
        .bind(flags.reflist)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }
}
