//! Repository trait for partner commissions.

use crate::domain::analytics::{AnalyticsWindow, EarningsPoint};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommissionRepository: Send + Sync {
    /// Sums commission earnings of a program per time bucket, with empty
    /// buckets reported as zero.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn earnings_timeseries(
        &self,
        program_id: &str,
        window: AnalyticsWindow,
        timezone: &str,
    ) -> Result<Vec<EarningsPoint>, AppError>;
}
