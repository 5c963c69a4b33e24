//! Program revenue and commission series with request deduplication.

use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::query::{PartnerAnalyticsFilters, build_query};
use super::{ClientError, Fetcher};
use crate::domain::analytics::RevenuePoint;

/// Identical URLs fetched within this window share one response.
pub const DEDUP_WINDOW: Duration = Duration::from_secs(60);

/// Commission earnings bucket as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommissionPoint {
    pub start: DateTime<Utc>,
    pub earnings: i64,
}

pub struct ProgramAnalyticsClient<F: Fetcher> {
    fetcher: F,
    workspace_id: String,
    timezone: String,
    recent: Cache<String, String>,
}

fn dedup_cache(window: Duration) -> Cache<String, String> {
    Cache::builder()
        .max_capacity(1_000)
        .time_to_live(window)
        .build()
}

impl<F: Fetcher> ProgramAnalyticsClient<F> {
    pub fn new(fetcher: F, workspace_id: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            fetcher,
            workspace_id: workspace_id.into(),
            timezone: timezone.into(),
            recent: dedup_cache(DEDUP_WINDOW),
        }
    }

    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.recent = dedup_cache(window);
        self
    }

    /// Sales revenue of `program_id`. `enabled = false` sends no request.
    pub async fn program_revenue(
        &self,
        program_id: &str,
        filters: &PartnerAnalyticsFilters,
        enabled: bool,
    ) -> Result<Option<Vec<RevenuePoint>>, ClientError> {
        if !enabled {
            return Ok(None);
        }
        let url = format!(
            "/api/programs/{program_id}/revenue?{}",
            build_query(filters, &self.timezone, &self.workspace_id)
        );
        self.fetch_json(&url).await.map(Some)
    }

    /// Commission earnings of `program_id`. `enabled = false` sends no request.
    pub async fn commissions_timeseries(
        &self,
        program_id: &str,
        filters: &PartnerAnalyticsFilters,
        enabled: bool,
    ) -> Result<Option<Vec<CommissionPoint>>, ClientError> {
        if !enabled {
            return Ok(None);
        }
        let url = format!(
            "/api/programs/{program_id}/commissions/timeseries?{}",
            build_query(filters, &self.timezone, &self.workspace_id)
        );
        self.fetch_json(&url).await.map(Some)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        // Concurrent callers of the same URL share one in-flight fetch; failed
        // fetches are not cached.
        let body = self
            .recent
            .try_get_with(url.to_string(), self.fetcher.get(url))
            .await?;

        Ok(serde_json::from_str(&body)?)
    }
}
