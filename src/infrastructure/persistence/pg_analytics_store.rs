//! PostgreSQL implementation of the analytics store.
//!
//! Aggregates `link_events` on the fly. Every query shares the same scope
//! predicate and half-open time window; the grouping decides the shape.
//! Time buckets are computed in the caller's timezone and returned as UTC
//! instants, with empty buckets filled by `generate_series`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::analytics::{
    AnalyticsQuery, AnalyticsResult, DimensionRow, DimensionValue, EventKind, EventMetrics,
    EventTotals, GroupBy, NewLinkEvent, TimeseriesPoint, TopLinkRow,
};
use crate::domain::repositories::AnalyticsStore;
use crate::error::AppError;

const TOP_ROWS_LIMIT: i64 = 100;

const TOTALS: &str = r#"
    COUNT(e.id) FILTER (WHERE e.event = 'click')::BIGINT AS clicks,
    COUNT(e.id) FILTER (WHERE e.event = 'lead')::BIGINT AS leads,
    COUNT(e.id) FILTER (WHERE e.event = 'sale')::BIGINT AS sales,
    COALESCE(SUM(e.sale_amount) FILTER (WHERE e.event = 'sale'), 0)::BIGINT AS sale_amount
"#;

const SCOPE: &str = r#"
    ($1::text IS NULL OR e.program_id = $1::text)
    AND ($2::text IS NULL OR e.partner_id = $2::text)
    AND ($3::text IS NULL OR e.link_id = $3::text)
    AND e.occurred_at >= $4::timestamptz
    AND e.occurred_at < $5::timestamptz
"#;

#[derive(sqlx::FromRow)]
struct TotalsRow {
    clicks: i64,
    leads: i64,
    sales: i64,
    sale_amount: i64,
}

impl From<TotalsRow> for EventTotals {
    fn from(r: TotalsRow) -> Self {
        EventTotals {
            clicks: r.clicks,
            leads: r.leads,
            sales: r.sales,
            sale_amount: r.sale_amount,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BucketRow {
    start: DateTime<Utc>,
    #[sqlx(flatten)]
    totals: TotalsRow,
}

#[derive(sqlx::FromRow)]
struct TopLinkDbRow {
    id: String,
    domain: String,
    key: String,
    url: String,
    #[sqlx(flatten)]
    totals: TotalsRow,
}

#[derive(sqlx::FromRow)]
struct DimensionDbRow {
    value: String,
    #[sqlx(flatten)]
    totals: TotalsRow,
}

/// Ranking column for top-N groupings.
fn order_column(event: EventKind) -> &'static str {
    match event {
        EventKind::Clicks | EventKind::Composite => "clicks",
        EventKind::Leads => "leads",
        EventKind::Sales => "sale_amount",
    }
}

/// Column and fallback label for a breakdown grouping.
fn dimension(group_by: GroupBy) -> Option<(&'static str, &'static str)> {
    match group_by {
        GroupBy::Countries => Some(("country", "Unknown")),
        GroupBy::Devices => Some(("device", "Unknown")),
        GroupBy::Referers => Some(("referer", "(direct)")),
        GroupBy::Count | GroupBy::Timeseries | GroupBy::TopLinks => None,
    }
}

fn dimension_value(group_by: GroupBy, value: String) -> DimensionValue {
    match group_by {
        GroupBy::Devices => DimensionValue::Device { device: value },
        GroupBy::Referers => DimensionValue::Referer { referer: value },
        _ => DimensionValue::Country { country: value },
    }
}

/// PostgreSQL analytics store over the `link_events` table.
pub struct PgAnalyticsStore {
    pool: Arc<PgPool>,
}

impl PgAnalyticsStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    fn scoped<'q, O>(
        sql: &'q str,
        query: &'q AnalyticsQuery,
    ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>
    where
        O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
    {
        sqlx::query_as::<_, O>(sql)
            .bind(query.scope.program_id.as_deref())
            .bind(query.scope.partner_id.as_deref())
            .bind(query.scope.link_id.as_deref())
            .bind(query.window.start)
            .bind(query.window.end)
    }

    async fn count(&self, query: &AnalyticsQuery) -> Result<AnalyticsResult, AppError> {
        let sql = format!("SELECT {TOTALS} FROM link_events e WHERE {SCOPE}");

        let row = Self::scoped::<TotalsRow>(&sql, query)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(AnalyticsResult::Count(EventMetrics::shape(
            query.event,
            row.into(),
        )))
    }

    async fn timeseries(&self, query: &AnalyticsQuery) -> Result<AnalyticsResult, AppError> {
        let sql = format!(
            r#"
            WITH buckets AS (
                SELECT generate_series(
                    date_trunc($6::text, $4::timestamptz AT TIME ZONE $7::text),
                    date_trunc($6::text, $5::timestamptz AT TIME ZONE $7::text),
                    ('1 ' || $6::text)::interval
                ) AS bucket
            )
            SELECT (b.bucket AT TIME ZONE $7::text) AS start, {TOTALS}
            FROM buckets b
            LEFT JOIN link_events e
                   ON date_trunc($6::text, e.occurred_at AT TIME ZONE $7::text) = b.bucket
                  AND {SCOPE}
            GROUP BY b.bucket
            ORDER BY b.bucket
            "#
        );

        let rows = Self::scoped::<BucketRow>(&sql, query)
            .bind(query.window.granularity.as_str())
            .bind(query.timezone.as_str())
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(AnalyticsResult::Timeseries(
            rows.into_iter()
                .map(|r| TimeseriesPoint {
                    start: r.start,
                    metrics: EventMetrics::shape(query.event, r.totals.into()),
                })
                .collect(),
        ))
    }

    async fn top_links(&self, query: &AnalyticsQuery) -> Result<AnalyticsResult, AppError> {
        let order = order_column(query.event);
        let sql = format!(
            r#"
            SELECT l.id, l.domain, l.key, l.url, {TOTALS}
            FROM link_events e
            JOIN links l ON l.id = e.link_id
            WHERE {SCOPE}
            GROUP BY l.id, l.domain, l.key, l.url
            ORDER BY {order} DESC, l.id
            LIMIT $6
            "#
        );

        let rows = Self::scoped::<TopLinkDbRow>(&sql, query)
            .bind(TOP_ROWS_LIMIT)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(AnalyticsResult::TopLinks(
            rows.into_iter()
                .map(|r| TopLinkRow {
                    id: r.id,
                    domain: r.domain,
                    key: r.key,
                    url: r.url,
                    metrics: EventMetrics::shape(query.event, r.totals.into()),
                })
                .collect(),
        ))
    }

    async fn breakdown(
        &self,
        query: &AnalyticsQuery,
        column: &'static str,
        fallback: &'static str,
    ) -> Result<AnalyticsResult, AppError> {
        let order = order_column(query.event);
        let sql = format!(
            r#"
            SELECT COALESCE(e.{column}, '{fallback}') AS value, {TOTALS}
            FROM link_events e
            WHERE {SCOPE}
            GROUP BY 1
            ORDER BY {order} DESC, value
            LIMIT $6
            "#
        );

        let rows = Self::scoped::<DimensionDbRow>(&sql, query)
            .bind(TOP_ROWS_LIMIT)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(AnalyticsResult::Breakdown(
            rows.into_iter()
                .map(|r| DimensionRow {
                    value: dimension_value(query.group_by, r.value),
                    metrics: EventMetrics::shape(query.event, r.totals.into()),
                })
                .collect(),
        ))
    }
}

#[async_trait]
impl AnalyticsStore for PgAnalyticsStore {
    async fn query(&self, query: &AnalyticsQuery) -> Result<AnalyticsResult, AppError> {
        match query.group_by {
            GroupBy::Count => self.count(query).await,
            GroupBy::Timeseries => self.timeseries(query).await,
            GroupBy::TopLinks => self.top_links(query).await,
            other => match dimension(other) {
                Some((column, fallback)) => self.breakdown(query, column, fallback).await,
                None => Err(AppError::internal("Unsupported grouping", json!({}))),
            },
        }
    }

    async fn record_event(&self, event: NewLinkEvent) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO link_events (
                event, link_id, program_id, partner_id, occurred_at,
                sale_amount, country, device, referer, user_agent, ip
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(event.event)
        .bind(&event.link_id)
        .bind(event.program_id)
        .bind(event.partner_id)
        .bind(event.occurred_at)
        .bind(event.sale_amount)
        .bind(event.country)
        .bind(event.device)
        .bind(event.referer)
        .bind(event.user_agent)
        .bind(event.ip)
        .execute(self.pool.as_ref())
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if e
                    .as_database_error()
                    .is_some_and(|db| db.is_foreign_key_violation()) =>
            {
                Err(AppError::bad_request(
                    "Link no longer exists",
                    json!({ "link_id": event.link_id }),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }
}
