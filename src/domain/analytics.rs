//! Analytics query model: event kinds, grouping, time windows and results.
//!
//! The window rules live here as pure functions so they can be tested
//! without a store:
//!
//! - explicit `start` + `end` win over any named interval
//! - otherwise the named interval applies, or the caller's default
//! - the window never starts before the owner's `data_available_from`

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default interval for partner-facing analytics.
pub const DEFAULT_PARTNER_INTERVAL: Interval = Interval::Days90;

/// Timezone used when the caller does not send one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Earliest timestamp `all` reaches back to when no floor is known.
pub fn data_epoch() -> DateTime<Utc> {
    start_of_day(2022, 1, 1).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Checks that `tz` names a zone of the IANA tz database (`UTC`,
/// `Europe/Berlin`, `America/Argentina/Buenos_Aires`, `Etc/GMT+5`).
pub fn is_valid_timezone(tz: &str) -> bool {
    tz.parse::<Tz>().is_ok()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Clicks,
    Leads,
    Sales,
    #[default]
    Composite,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Clicks => "clicks",
            EventKind::Leads => "leads",
            EventKind::Sales => "sales",
            EventKind::Composite => "composite",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Count,
    Timeseries,
    TopLinks,
    Countries,
    Devices,
    Referers,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Count => "count",
            GroupBy::Timeseries => "timeseries",
            GroupBy::TopLinks => "top_links",
            GroupBy::Countries => "countries",
            GroupBy::Devices => "devices",
            GroupBy::Referers => "referers",
        }
    }
}

/// Named relative time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "24h")]
    Hours24,
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
    #[serde(rename = "1y")]
    Year1,
    #[serde(rename = "mtd")]
    MonthToDate,
    #[serde(rename = "qtd")]
    QuarterToDate,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "all")]
    All,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Hours24 => "24h",
            Interval::Days7 => "7d",
            Interval::Days30 => "30d",
            Interval::Days90 => "90d",
            Interval::Year1 => "1y",
            Interval::MonthToDate => "mtd",
            Interval::QuarterToDate => "qtd",
            Interval::YearToDate => "ytd",
            Interval::All => "all",
        }
    }

    /// Start of the interval relative to `now`.
    ///
    /// `All` has no start of its own; the caller supplies the floor.
    pub fn start_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Interval::Hours24 => Some(now - Duration::hours(24)),
            Interval::Days7 => Some(now - Duration::days(7)),
            Interval::Days30 => Some(now - Duration::days(30)),
            Interval::Days90 => Some(now - Duration::days(90)),
            Interval::Year1 => Some(now - Duration::days(365)),
            Interval::MonthToDate => start_of_day(now.year(), now.month(), 1),
            Interval::QuarterToDate => {
                let quarter_month = (now.month() - 1) / 3 * 3 + 1;
                start_of_day(now.year(), quarter_month, 1)
            }
            Interval::YearToDate => start_of_day(now.year(), 1, 1),
            Interval::All => None,
        }
    }
}

/// Bucket width of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Month,
}

impl Granularity {
    /// Unit name understood by PostgreSQL `date_trunc`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Month => "month",
        }
    }

    pub fn for_span(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let span = end - start;
        if span <= Duration::days(2) {
            Granularity::Hour
        } else if span <= Duration::days(180) {
            Granularity::Day
        } else {
            Granularity::Month
        }
    }
}

/// Normalized, half-open `[start, end)` time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

/// Resolves request time parameters into a concrete window.
///
/// Only a complete `start`/`end` pair counts as an explicit window; a lone
/// bound is ignored in favour of the interval.
pub fn resolve_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    interval: Option<Interval>,
    default_interval: Interval,
    now: DateTime<Utc>,
    data_available_from: Option<DateTime<Utc>>,
) -> AnalyticsWindow {
    let floor = data_available_from.unwrap_or_else(data_epoch);

    let (mut start, mut end) = match (start, end) {
        (Some(s), Some(e)) if s > e => (e, s),
        (Some(s), Some(e)) => (s, e),
        _ => {
            let interval = interval.unwrap_or(default_interval);
            (interval.start_from(now).unwrap_or(floor), now)
        }
    };

    if start < floor {
        start = floor;
    }
    if end < start {
        end = start;
    }

    AnalyticsWindow {
        start,
        end,
        granularity: Granularity::for_span(start, end),
    }
}

fn start_of_day(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Data boundary a query must stay within.
///
/// `None` fields are unconstrained; callers always set at least the program
/// or workspace boundary before handing a query to a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsScope {
    pub program_id: Option<String>,
    pub partner_id: Option<String>,
    pub link_id: Option<String>,
}

/// Canonical analytics query handed to an [`crate::domain::repositories::AnalyticsStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsQuery {
    pub event: EventKind,
    pub group_by: GroupBy,
    pub window: AnalyticsWindow,
    pub timezone: String,
    pub scope: AnalyticsScope,
}

/// Raw aggregate of all event kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTotals {
    pub clicks: i64,
    pub leads: i64,
    pub sales: i64,
    pub sale_amount: i64,
}

/// Metrics shaped for the requested event kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_amount: Option<i64>,
}

impl EventMetrics {
    pub fn shape(event: EventKind, totals: EventTotals) -> Self {
        match event {
            EventKind::Clicks => Self {
                clicks: Some(totals.clicks),
                ..Default::default()
            },
            EventKind::Leads => Self {
                leads: Some(totals.leads),
                ..Default::default()
            },
            EventKind::Sales => Self {
                sales: Some(totals.sales),
                sale_amount: Some(totals.sale_amount),
                ..Default::default()
            },
            EventKind::Composite => Self {
                clicks: Some(totals.clicks),
                leads: Some(totals.leads),
                sales: Some(totals.sales),
                sale_amount: Some(totals.sale_amount),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeseriesPoint {
    pub start: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: EventMetrics,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLinkRow {
    pub id: String,
    pub domain: String,
    pub key: String,
    pub url: String,
    #[serde(flatten)]
    pub metrics: EventMetrics,
}

/// Value of a breakdown dimension, serialized under the dimension's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Country { country: String },
    Device { device: String },
    Referer { referer: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionRow {
    #[serde(flatten)]
    pub value: DimensionValue,
    #[serde(flatten)]
    pub metrics: EventMetrics,
}

/// Aggregated result; the variant follows the query's [`GroupBy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalyticsResult {
    Count(EventMetrics),
    Timeseries(Vec<TimeseriesPoint>),
    TopLinks(Vec<TopLinkRow>),
    Breakdown(Vec<DimensionRow>),
}

/// Revenue bucket as consumed by program dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    pub start: DateTime<Utc>,
    pub sale_amount: i64,
}

/// Commission earnings bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsPoint {
    pub start: DateTime<Utc>,
    pub earnings: i64,
}

/// New event written by the ingestion worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLinkEvent {
    pub event: &'static str,
    pub link_id: String,
    pub program_id: Option<String>,
    pub partner_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub sale_amount: i64,
    pub country: Option<String>,
    pub device: Option<String>,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}
