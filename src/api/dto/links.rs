//! DTOs for link lookup and maintenance.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `GET /api/links/info?domain=&key=`
#[derive(Debug, Deserialize, Validate)]
pub struct LinkInfoQuery {
    #[validate(length(min = 1, max = 253, message = "domain is required"))]
    pub domain: String,

    #[validate(length(min = 1, max = 190, message = "key is required"))]
    pub key: String,
}

/// `DELETE /api/links/bulk` body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, max = 100, message = "between 1 and 100 link ids"))]
    pub link_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_delete_bounds() {
        let empty = BulkDeleteRequest { link_ids: vec![] };
        assert!(empty.validate().is_err());

        let one = BulkDeleteRequest {
            link_ids: vec!["link_1".to_string()],
        };
        assert!(one.validate().is_ok());

        let too_many = BulkDeleteRequest {
            link_ids: (0..101).map(|i| format!("link_{i}")).collect(),
        };
        assert!(too_many.validate().is_err());
    }

    #[test]
    fn test_bulk_delete_reads_camel_case() {
        let req: BulkDeleteRequest =
            serde_json::from_str(r#"{"linkIds":["a","b"]}"#).unwrap();
        assert_eq!(req.link_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let json = serde_json::to_value(BulkDeleteResponse { deleted_count: 3 }).unwrap();
        assert_eq!(json["deletedCount"], 3);
    }
}
