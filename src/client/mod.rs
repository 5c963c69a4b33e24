//! Typed HTTP client for program dashboards.
//!
//! Builds the canonical analytics query string from UI-facing filters and
//! deduplicates identical requests for a short window.
//!
//! ```rust,ignore
//! let fetcher = HttpFetcher::new("https://api.example.com", token);
//! let client = ProgramAnalyticsClient::new(fetcher, "ws_1", "Europe/Berlin");
//!
//! let revenue = client
//!     .program_revenue("prog_1", &PartnerAnalyticsFilters::default(), true)
//!     .await?;
//! ```

pub mod fetcher;
pub mod program_analytics;
pub mod query;

pub use fetcher::{Fetcher, HttpFetcher};
pub use program_analytics::{CommissionPoint, DEDUP_WINDOW, ProgramAnalyticsClient};
pub use query::{PartnerAnalyticsFilters, build_query};

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// Failure of a fetch that was shared between concurrent callers.
    #[error(transparent)]
    Shared(#[from] std::sync::Arc<ClientError>),
}
