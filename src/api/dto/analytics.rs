//! Query parameters shared by the analytics endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};

use crate::application::services::AnalyticsFilters;
use crate::domain::analytics::{EventKind, GroupBy, Interval};

/// `?event=&groupBy=&interval=&start=&end=&timezone=&linkId=&domain=&key=`
///
/// Empty string values are treated as absent, so clients may send every
/// parameter unconditionally.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQueryParams {
    #[serde(default)]
    pub event: Option<EventKind>,

    #[serde(default)]
    pub group_by: Option<GroupBy>,

    #[serde(default)]
    pub interval: Option<Interval>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub timezone: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub link_id: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub domain: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub key: Option<String>,
}

impl From<AnalyticsQueryParams> for AnalyticsFilters {
    fn from(params: AnalyticsQueryParams) -> Self {
        Self {
            event: params.event,
            group_by: params.group_by,
            interval: params.interval,
            start: params.start,
            end: params.end,
            timezone: params.timezone,
            link_id: params.link_id,
            domain: params.domain,
            key: params.key,
        }
    }
}
