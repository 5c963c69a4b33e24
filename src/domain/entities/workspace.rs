//! Workspace (tenant) entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Billing plan of a workspace.
///
/// Stored as lowercase text in the `workspaces.plan` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Pro,
    Business,
    Advanced,
    Enterprise,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Business => "business",
            Plan::Advanced => "advanced",
            Plan::Enterprise => "enterprise",
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Plan::Free)
    }
}

impl std::str::FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "business" => Ok(Plan::Business),
            "advanced" => Ok(Plan::Advanced),
            "enterprise" => Ok(Plan::Enterprise),
            other => Err(format!("unknown plan '{other}'")),
        }
    }
}

/// A tenant owning links, programs and domain settings.
#[derive(Debug, Clone, Serialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}
