//! Link entity and its partner-enriched view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::discount::Discount;

/// A short link identified by its `(domain, key)` pair.
///
/// Links created through a partner program carry both `program_id` and
/// `partner_id`. For case-sensitive domains `key` holds the encoded key as
/// stored; see [`crate::utils::key_codec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub domain: String,
    pub key: String,
    pub url: String,
    pub workspace_id: Option<String>,
    pub program_id: Option<String>,
    pub partner_id: Option<String>,
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partner summary embedded into a resolved link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPartner {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

/// A link merged with its owning partner and effective discount.
///
/// Serializes flat: link fields at the top level plus `partner` and
/// `discount`, each `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkWithPartner {
    #[serde(flatten)]
    pub link: Link,
    pub partner: Option<LinkPartner>,
    pub discount: Option<Discount>,
}

/// Anything that may live inside a folder.
pub trait InFolder {
    fn folder_id(&self) -> Option<&str>;
}

impl InFolder for Link {
    fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }
}

/// Returns true if at least one of the links is stored in a folder.
pub fn links_have_folders<T: InFolder>(links: &[T]) -> bool {
    links.iter().any(|link| link.folder_id().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DiscountType;

    fn sample_link(folder_id: Option<&str>) -> Link {
        let now = Utc::now();
        Link {
            id: "link_1".to_string(),
            domain: "dub.sh".to_string(),
            key: "summer".to_string(),
            url: "https://example.com".to_string(),
            workspace_id: Some("ws_1".to_string()),
            program_id: None,
            partner_id: None,
            folder_id: folder_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_links_have_folders() {
        assert!(!links_have_folders::<Link>(&[]));
        assert!(!links_have_folders(&[sample_link(None), sample_link(None)]));
        assert!(links_have_folders(&[
            sample_link(None),
            sample_link(Some("fold_1"))
        ]));
    }

    #[test]
    fn test_link_with_partner_serializes_flat_with_nulls() {
        let resolved = LinkWithPartner {
            link: sample_link(None),
            partner: None,
            discount: None,
        };

        let json = serde_json::to_value(&resolved).unwrap();

        assert_eq!(json["key"], "summer");
        assert_eq!(json["domain"], "dub.sh");
        assert!(json["partner"].is_null());
        assert!(json["discount"].is_null());
        assert!(json.get("link").is_none());
    }

    #[test]
    fn test_link_with_partner_serializes_nested_objects() {
        let resolved = LinkWithPartner {
            link: sample_link(None),
            partner: Some(LinkPartner {
                id: "pn_1".to_string(),
                name: "Jane".to_string(),
                image: None,
            }),
            discount: Some(Discount {
                id: "disc_1".to_string(),
                amount: 25,
                discount_type: DiscountType::Percentage,
                max_duration: Some(3),
            }),
        };

        let json = serde_json::to_value(&resolved).unwrap();

        assert_eq!(json["partner"]["id"], "pn_1");
        assert!(json["partner"]["image"].is_null());
        assert_eq!(json["discount"]["type"], "percentage");
        assert_eq!(json["discount"]["maxDuration"], 3);
    }
}
