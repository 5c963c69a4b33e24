//! Click event model for asynchronous ingestion.

use chrono::{DateTime, Utc};
use woothee::parser::Parser;

use crate::domain::analytics::NewLinkEvent;
use crate::domain::entities::Link;

/// An in-memory click on a resolved link, queued for the background worker.
///
/// Carries the link's program and partner so the event lands inside the
/// right analytics scope without another lookup.
#[derive(Debug, Clone)]
pub struct LinkEvent {
    pub link_id: String,
    pub program_id: Option<String>,
    pub partner_id: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
}

impl LinkEvent {
    /// Creates a click event for `link` observed now.
    pub fn click(
        link: &Link,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
        country: Option<&str>,
    ) -> Self {
        Self {
            link_id: link.id.clone(),
            program_id: link.program_id.clone(),
            partner_id: link.partner_id.clone(),
            occurred_at: Utc::now(),
            ip,
            user_agent: user_agent.map(str::to_string),
            referer: referer.map(referer_host),
            country: country.map(|c| c.to_ascii_uppercase()),
        }
    }

    /// Converts the queued click into a storable event row.
    pub fn into_new_event(self) -> NewLinkEvent {
        let device = self.user_agent.as_deref().map(device_from_user_agent);

        NewLinkEvent {
            event: "click",
            link_id: self.link_id,
            program_id: self.program_id,
            partner_id: self.partner_id,
            occurred_at: self.occurred_at,
            sale_amount: 0,
            country: self.country,
            device: device.map(str::to_string),
            referer: self.referer,
            user_agent: self.user_agent,
            ip: self.ip,
        }
    }
}

/// Coarse device class derived from a User-Agent header.
fn device_from_user_agent(user_agent: &str) -> &'static str {
    let parsed = Parser::new().parse(user_agent).unwrap_or_default();
    match parsed.category {
        "crawler" => "bot",
        "smartphone" | "mobilephone" if parsed.os == "iPad" => "tablet",
        "smartphone" | "mobilephone" => "mobile",
        "appliance" => "appliance",
        _ => "desktop",
    }
}

/// Reduces a referer URL to its host; unparsable values are kept verbatim.
fn referer_host(referer: &str) -> String {
    url::Url::parse(referer)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| referer.to_string())
}
