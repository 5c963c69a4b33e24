//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use super::parse_column;
use crate::domain::entities::{Discount, Link, LinkPartner};
use crate::domain::repositories::{LinkPartnerRecord, LinkRepository};
use crate::error::AppError;

const LINK_COLUMNS: &str = "l.id, l.domain, l.key, l.url, l.workspace_id, l.program_id, \
                            l.partner_id, l.folder_id, l.created_at, l.updated_at";

#[derive(sqlx::FromRow)]
struct LinkRow {
    id: String,
    domain: String,
    key: String,
    url: String,
    workspace_id: Option<String>,
    program_id: Option<String>,
    partner_id: Option<String>,
    folder_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LinkRow> for Link {
    fn from(r: LinkRow) -> Self {
        Link {
            id: r.id,
            domain: r.domain,
            key: r.key,
            url: r.url,
            workspace_id: r.workspace_id,
            program_id: r.program_id,
            partner_id: r.partner_id,
            folder_id: r.folder_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkPartnerRow {
    #[sqlx(flatten)]
    link: LinkRow,
    partner_row_id: Option<String>,
    partner_name: Option<String>,
    partner_image: Option<String>,
    partner_discount_id: Option<String>,
    partner_discount_amount: Option<i32>,
    partner_discount_type: Option<String>,
    partner_discount_max_duration: Option<i32>,
    program_discount_id: Option<String>,
    program_discount_amount: Option<i32>,
    program_discount_type: Option<String>,
    program_discount_max_duration: Option<i32>,
}

fn discount_from_columns(
    id: Option<String>,
    amount: Option<i32>,
    discount_type: Option<String>,
    max_duration: Option<i32>,
) -> Result<Option<Discount>, AppError> {
    let (Some(id), Some(amount), Some(discount_type)) = (id, amount, discount_type) else {
        return Ok(None);
    };

    Ok(Some(Discount {
        id,
        amount,
        discount_type: parse_column("discounts.type", &discount_type)?,
        max_duration,
    }))
}

impl TryFrom<LinkPartnerRow> for LinkPartnerRecord {
    type Error = AppError;

    fn try_from(r: LinkPartnerRow) -> Result<Self, Self::Error> {
        let partner = match (r.partner_row_id, r.partner_name) {
            (Some(id), Some(name)) => Some(LinkPartner {
                id,
                name,
                image: r.partner_image,
            }),
            _ => None,
        };

        Ok(LinkPartnerRecord {
            link: r.link.into(),
            partner,
            partner_discount: discount_from_columns(
                r.partner_discount_id,
                r.partner_discount_amount,
                r.partner_discount_type,
                r.partner_discount_max_duration,
            )?,
            program_discount: discount_from_columns(
                r.program_discount_id,
                r.program_discount_amount,
                r.program_discount_type,
                r.program_discount_max_duration,
            )?,
        })
    }
}

/// PostgreSQL repository for link lookups and deletion.
///
/// Case-insensitive lookups go through the `(domain, lower(key))` index.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_with_partner(
        &self,
        domain: &str,
        key: &str,
        case_sensitive: bool,
    ) -> Result<Option<LinkPartnerRecord>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS},
                   p.id AS partner_row_id,
                   p.name AS partner_name,
                   p.image AS partner_image,
                   pd.id AS partner_discount_id,
                   pd.amount AS partner_discount_amount,
                   pd.type AS partner_discount_type,
                   pd.max_duration AS partner_discount_max_duration,
                   gd.id AS program_discount_id,
                   gd.amount AS program_discount_amount,
                   gd.type AS program_discount_type,
                   gd.max_duration AS program_discount_max_duration
            FROM links l
            LEFT JOIN program_enrollments pe
                   ON pe.program_id = l.program_id AND pe.partner_id = l.partner_id
            LEFT JOIN partners p ON p.id = pe.partner_id
            LEFT JOIN discounts pd ON pd.id = pe.discount_id
            LEFT JOIN programs pr ON pr.id = l.program_id
            LEFT JOIN discounts gd ON gd.id = pr.default_discount_id
            WHERE l.domain = $1
              AND (($3 AND l.key = $2) OR (NOT $3 AND lower(l.key) = lower($2)))
            ORDER BY l.created_at
            LIMIT 1
            "#
        );

        let row = sqlx::query_as::<_, LinkPartnerRow>(&sql)
            .bind(domain)
            .bind(key)
            .bind(case_sensitive)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(LinkPartnerRecord::try_from).transpose()
    }

    async fn find_by_domain_key(
        &self,
        domain: &str,
        key: &str,
        case_sensitive: bool,
    ) -> Result<Option<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links l
            WHERE l.domain = $1
              AND (($3 AND l.key = $2) OR (NOT $3 AND lower(l.key) = lower($2)))
            ORDER BY l.created_at
            LIMIT 1
            "#
        );

        let row = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(domain)
            .bind(key)
            .bind(case_sensitive)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Link::from))
    }

    async fn find_many_in_workspace(
        &self,
        workspace_id: &str,
        link_ids: &[String],
    ) -> Result<Vec<Link>, AppError> {
        let sql = format!(
            r#"
            SELECT {LINK_COLUMNS}
            FROM links l
            WHERE l.workspace_id = $1 AND l.id = ANY($2)
            ORDER BY l.created_at
            "#
        );

        let rows = sqlx::query_as::<_, LinkRow>(&sql)
            .bind(workspace_id)
            .bind(link_ids)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Link::from).collect())
    }

    async fn delete_many(&self, workspace_id: &str, link_ids: &[String]) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM links
            WHERE workspace_id = $1 AND id = ANY($2)
            "#,
        )
        .bind(workspace_id)
        .bind(link_ids)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }
}
