//! Reference ("default") domains a workspace can opt into.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Shared short domains offered to every workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceDomain {
    DubSh,
    DubLink,
    ChatgPt,
    AmznId,
    SptiFi,
    GitNew,
    CalLink,
    FigPage,
    GglLink,
    ReflIst,
}

impl ReferenceDomain {
    pub const ALL: [ReferenceDomain; 10] = [
        ReferenceDomain::DubSh,
        ReferenceDomain::DubLink,
        ReferenceDomain::ChatgPt,
        ReferenceDomain::AmznId,
        ReferenceDomain::SptiFi,
        ReferenceDomain::GitNew,
        ReferenceDomain::CalLink,
        ReferenceDomain::FigPage,
        ReferenceDomain::GglLink,
        ReferenceDomain::ReflIst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceDomain::DubSh => "dub.sh",
            ReferenceDomain::DubLink => "dub.link",
            ReferenceDomain::ChatgPt => "chatg.pt",
            ReferenceDomain::AmznId => "amzn.id",
            ReferenceDomain::SptiFi => "spti.fi",
            ReferenceDomain::GitNew => "git.new",
            ReferenceDomain::CalLink => "cal.link",
            ReferenceDomain::FigPage => "fig.page",
            ReferenceDomain::GglLink => "ggl.link",
            ReferenceDomain::ReflIst => "refl.ist",
        }
    }

    /// Whether the domain is only available on paid plans.
    pub fn requires_paid_plan(&self) -> bool {
        matches!(self, ReferenceDomain::DubLink)
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

/// Persisted per-workspace flags.
///
/// Only `refl.ist` is still backed by a column; the other reference domains
/// are accepted on write but not stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultDomainFlags {
    pub reflist: bool,
}

impl DefaultDomainFlags {
    pub fn from_selection(selection: &[ReferenceDomain]) -> Self {
        Self {
            reflist: selection.contains(&ReferenceDomain::ReflIst),
        }
    }

    pub fn enabled(&self) -> Vec<ReferenceDomain> {
        let mut enabled = Vec::new();
        if self.reflist {
            enabled.push(ReferenceDomain::ReflIst);
        }
        enabled
    }
}

/// Stored default-domain row of a workspace.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultDomains {
    pub id: i64,
    pub workspace_id: String,
    pub reflist: bool,
    pub updated_at: DateTime<Utc>,
}

impl DefaultDomains {
    pub fn flags(&self) -> DefaultDomainFlags {
        DefaultDomainFlags {
            reflist: self.reflist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(ReferenceDomain::parse("refl.ist"), Some(ReferenceDomain::ReflIst));
        assert_eq!(ReferenceDomain::parse("dub.link"), Some(ReferenceDomain::DubLink));
        assert_eq!(ReferenceDomain::parse("Refl.ist"), None);
        assert_eq!(ReferenceDomain::parse("example.com"), None);
    }

    #[test]
    fn test_all_names_parse_back() {
        for domain in ReferenceDomain::ALL {
            assert_eq!(ReferenceDomain::parse(domain.as_str()), Some(domain));
        }
    }

    #[test]
    fn test_only_dub_link_is_gated() {
        let gated: Vec<_> = ReferenceDomain::ALL
            .into_iter()
            .filter(|d| d.requires_paid_plan())
            .collect();
        assert_eq!(gated, vec![ReferenceDomain::DubLink]);
    }

    #[test]
    fn test_flags_from_selection() {
        let flags = DefaultDomainFlags::from_selection(&[
            ReferenceDomain::DubSh,
            ReferenceDomain::ReflIst,
        ]);
        assert!(flags.reflist);
        assert_eq!(flags.enabled(), vec![ReferenceDomain::ReflIst]);

        let flags = DefaultDomainFlags::from_selection(&[ReferenceDomain::GitNew]);
        assert!(!flags.reflist);
        assert!(flags.enabled().is_empty());
    }
}
