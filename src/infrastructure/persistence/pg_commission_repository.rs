//! PostgreSQL implementation of commission repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::analytics::{AnalyticsWindow, EarningsPoint};
use crate::domain::repositories::CommissionRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct EarningsRow {
    start: DateTime<Utc>,
    earnings: i64,
}

pub struct PgCommissionRepository {
    pool: Arc<PgPool>,
}

impl PgCommissionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommissionRepository for PgCommissionRepository {
    async fn earnings_timeseries(
        &self,
        program_id: &str,
        window: AnalyticsWindow,
        timezone: &str,
    ) -> Result<Vec<EarningsPoint>, AppError> {
        // Buckets are computed in local time, then converted back to UTC.
        let rows = sqlx::query_as::<_, EarningsRow>(
            r#"
            WITH buckets AS (
                SELECT generate_series(
                    date_trunc($4::text, $2::timestamptz AT TIME ZONE $5::text),
                    date_trunc($4::text, $3::timestamptz AT TIME ZONE $5::text),
                    ('1 ' || $4::text)::interval
                ) AS bucket
            ),
            sums AS (
                SELECT date_trunc($4::text, created_at AT TIME ZONE $5::text) AS bucket,
                       SUM(earnings)::BIGINT AS earnings
                FROM commissions
                WHERE program_id = $1
                  AND created_at >= $2
                  AND created_at < $3
                GROUP BY 1
            )
            SELECT (b.bucket AT TIME ZONE $5::text) AS start,
                   COALESCE(s.earnings, 0)::BIGINT AS earnings
            FROM buckets b
            LEFT JOIN sums s ON s.bucket = b.bucket
            ORDER BY b.bucket
            "#,
        )
        .bind(program_id)
        .bind(window.start)
        .bind(window.end)
        .bind(window.granularity.as_str())
        .bind(timezone)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| EarningsPoint {
                start: r.start,
                earnings: r.earnings,
            })
            .collect())
    }
}
