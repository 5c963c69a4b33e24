//! Canonical query strings for program analytics requests.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::analytics::{DEFAULT_PARTNER_INTERVAL, EventKind, GroupBy, Interval};

/// Filters as chosen in a dashboard; every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnerAnalyticsFilters {
    pub event: Option<EventKind>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub interval: Option<Interval>,
    pub group_by: Option<GroupBy>,
}

/// Serializes `filters` in a fixed parameter order so equal filters always
/// produce equal URLs.
///
/// `start` and `end` are sent only as a pair; otherwise `interval` is sent,
/// falling back to the partner default.
pub fn build_query(filters: &PartnerAnalyticsFilters, timezone: &str, workspace_id: &str) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());

    query.append_pair("event", filters.event.unwrap_or_default().as_str());

    match (filters.start, filters.end) {
        (Some(start), Some(end)) => {
            query.append_pair("start", &iso(start));
            query.append_pair("end", &iso(end));
        }
        _ => {
            let interval = filters.interval.unwrap_or(DEFAULT_PARTNER_INTERVAL);
            query.append_pair("interval", interval.as_str());
        }
    }

    query.append_pair("groupBy", filters.group_by.unwrap_or_default().as_str());
    query.append_pair("timezone", timezone);
    query.append_pair("workspaceId", workspace_id);

    query.finish()
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
