//! DTOs for the workspace default-domain endpoints.

use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};

/// `GET /api/domains/default?search=`
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct DefaultDomainsSearch {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub search: Option<String>,
}

/// `PATCH /api/domains/default` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDefaultDomainsRequest {
    pub default_domains: Vec<String>,
}
