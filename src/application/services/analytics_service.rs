//! Partner and program analytics.
//!
//! Request filters are normalized by [`compose_query`] into an
//! [`AnalyticsQuery`] whose scope is fixed by the caller's identity, never by
//! the request: partner queries are always bound to the partner and its
//! enrolled program.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::analytics::{
    AnalyticsQuery, AnalyticsResult, AnalyticsScope, DEFAULT_PARTNER_INTERVAL, DEFAULT_TIMEZONE,
    EarningsPoint, EventKind, GroupBy, Interval, RevenuePoint, is_valid_timezone,
    resolve_window,
};
use crate::domain::entities::Program;
use crate::domain::repositories::{
    AnalyticsStore, CommissionRepository, LinkRepository, ProgramRepository,
};
use crate::error::AppError;

/// Caller-supplied analytics filters, all optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsFilters {
    pub event: Option<EventKind>,
    pub group_by: Option<GroupBy>,
    pub interval: Option<Interval>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub timezone: Option<String>,
    pub link_id: Option<String>,
    pub domain: Option<String>,
    pub key: Option<String>,
}

/// Builds the canonical query for `filters` inside `scope`.
///
/// # Errors
///
/// Returns [`AppError::Validation`] for a timezone missing from the tz database.
pub fn compose_query(
    filters: &AnalyticsFilters,
    scope: AnalyticsScope,
    now: DateTime<Utc>,
    data_available_from: Option<DateTime<Utc>>,
) -> Result<AnalyticsQuery, AppError> {
    let timezone = match filters.timezone.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_TIMEZONE.to_string(),
        Some(tz) if is_valid_timezone(tz) => tz.to_string(),
        Some(tz) => {
            return Err(AppError::bad_request(
                "Invalid timezone",
                json!({ "timezone": tz }),
            ));
        }
    };

    Ok(AnalyticsQuery {
        event: filters.event.unwrap_or_default(),
        group_by: filters.group_by.unwrap_or_default(),
        window: resolve_window(
            filters.start,
            filters.end,
            filters.interval,
            DEFAULT_PARTNER_INTERVAL,
            now,
            data_available_from,
        ),
        timezone,
        scope,
    })
}

pub struct AnalyticsService<S, P, C, L>
where
    S: AnalyticsStore,
    P: ProgramRepository,
    C: CommissionRepository,
    L: LinkRepository,
{
    store: Arc<S>,
    program_repository: Arc<P>,
    commission_repository: Arc<C>,
    link_service: Arc<LinkService<L>>,
}

impl<S, P, C, L> AnalyticsService<S, P, C, L>
where
    S: AnalyticsStore,
    P: ProgramRepository,
    C: CommissionRepository,
    L: LinkRepository,
{
    pub fn new(
        store: Arc<S>,
        program_repository: Arc<P>,
        commission_repository: Arc<C>,
        link_service: Arc<LinkService<L>>,
    ) -> Self {
        Self {
            store,
            program_repository,
            commission_repository,
            link_service,
        }
    }

    /// Analytics of one partner inside a program it is enrolled in.
    ///
    /// A `domain` + `key` pair (used only when `link_id` is absent) must name
    /// a link of the calling partner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the partner is not enrolled, or the
    /// named link is missing or owned by someone else.
    /// Returns [`AppError::Validation`] for a malformed timezone.
    pub async fn partner_program_analytics(
        &self,
        partner_id: &str,
        program_id: &str,
        filters: AnalyticsFilters,
    ) -> Result<AnalyticsResult, AppError> {
        let enrollment = self
            .program_repository
            .find_enrollment(partner_id, program_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Program enrollment not found",
                    json!({ "program_id": program_id }),
                )
            })?;

        let mut link_id = filters.link_id.clone();
        if link_id.is_none()
            && let (Some(domain), Some(key)) = (filters.domain.as_deref(), filters.key.as_deref())
        {
            let link = self
                .link_service
                .find_link(domain, key)
                .await?
                .filter(|link| link.partner_id.as_deref() == Some(partner_id))
                .ok_or_else(|| AppError::not_found("Link not found", json!({})))?;
            link_id = Some(link.id);
        }

        let scope = AnalyticsScope {
            program_id: Some(enrollment.program.id.clone()),
            partner_id: Some(partner_id.to_string()),
            link_id,
        };
        let query = compose_query(
            &filters,
            scope,
            Utc::now(),
            Some(enrollment.program.created_at),
        )?;

        tracing::debug!(
            partner_id,
            program_id,
            event = query.event.as_str(),
            group_by = query.group_by.as_str(),
            "Partner analytics query"
        );

        let mut result = self.store.query(&query).await?;
        if let AnalyticsResult::TopLinks(rows) = &mut result {
            let codec = self.link_service.codec();
            for row in rows.iter_mut() {
                row.key = codec.decode_key_if_case_sensitive(&row.domain, &row.key);
            }
        }

        Ok(result)
    }

    /// Sales revenue of a workspace's program per time bucket.
    ///
    /// Always a sales time series; `event` and `groupBy` filters are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program is not in the workspace.
    pub async fn program_revenue(
        &self,
        workspace_id: &str,
        program_id: &str,
        filters: AnalyticsFilters,
    ) -> Result<Vec<RevenuePoint>, AppError> {
        let program = self.workspace_program(workspace_id, program_id).await?;

        let mut query = compose_query(
            &filters,
            AnalyticsScope {
                program_id: Some(program.id),
                ..Default::default()
            },
            Utc::now(),
            Some(program.created_at),
        )?;
        query.event = EventKind::Sales;
        query.group_by = GroupBy::Timeseries;

        match self.store.query(&query).await? {
            AnalyticsResult::Timeseries(points) => Ok(points
                .into_iter()
                .map(|p| RevenuePoint {
                    start: p.start,
                    sale_amount: p.metrics.sale_amount.unwrap_or(0),
                })
                .collect()),
            _ => Err(AppError::internal(
                "Unexpected analytics result",
                json!({}),
            )),
        }
    }

    /// Commission earnings of a workspace's program per time bucket.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the program is not in the workspace.
    pub async fn commissions_timeseries(
        &self,
        workspace_id: &str,
        program_id: &str,
        filters: AnalyticsFilters,
    ) -> Result<Vec<EarningsPoint>, AppError> {
        let program = self.workspace_program(workspace_id, program_id).await?;

        let query = compose_query(
            &filters,
            AnalyticsScope {
                program_id: Some(program.id.clone()),
                ..Default::default()
            },
            Utc::now(),
            Some(program.created_at),
        )?;

        self.commission_repository
            .earnings_timeseries(&program.id, query.window, &query.timezone)
            .await
    }

    async fn workspace_program(
        &self,
        workspace_id: &str,
        program_id: &str,
    ) -> Result<Program, AppError> {
        self.program_repository
            .find_in_workspace(workspace_id, program_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Program not found", json!({ "program_id": program_id }))
            })
    }
}
