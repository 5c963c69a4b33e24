//! Link resolution and maintenance service.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::entities::{
    Link, LinkWithPartner, links_have_folders, resolve_effective_discount,
};
use crate::domain::principal::{Scope, WorkspaceContext};
use crate::domain::repositories::{LinkPartnerRecord, LinkRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::key_codec::KeyCodec;
use serde_json::json;

/// Merges a joined link row into the partner-enriched view.
///
/// For case-sensitive domains the stored key is decoded back to what the
/// user typed. The discount follows [`resolve_effective_discount`].
pub fn resolve_link_with_partner(record: LinkPartnerRecord, codec: &KeyCodec) -> LinkWithPartner {
    let LinkPartnerRecord {
        mut link,
        partner,
        partner_discount,
        program_discount,
    } = record;

    link.key = codec.decode_key_if_case_sensitive(&link.domain, &link.key);

    LinkWithPartner {
        link,
        partner,
        discount: resolve_effective_discount(partner_discount, program_discount),
    }
}

/// Service for resolving and deleting links.
///
/// Resolved links are cached by `(domain, query key)`; deletions evict them.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheService>,
    codec: KeyCodec,
}

impl<L: LinkRepository> LinkService<L> {
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheService>, codec: KeyCodec) -> Self {
        Self {
            link_repository,
            cache,
            codec,
        }
    }

    pub fn codec(&self) -> &KeyCodec {
        &self.codec
    }

    /// Finds the link at `domain`/`key` with its partner and effective
    /// discount.
    ///
    /// The key may arrive percent-encoded or in any case on
    /// case-insensitive domains. No match is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_link_with_partner(
        &self,
        domain: &str,
        key: &str,
    ) -> Result<Option<LinkWithPartner>, AppError> {
        let domain = domain.to_ascii_lowercase();
        let key_query = self.codec.key_to_query(&domain, key);
        self.resolve(&domain, &key_query).await
    }

    /// [`LinkService::get_link_with_partner`] for a key extracted by the
    /// router, which has already percent-decoded it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_link_with_partner_decoded(
        &self,
        domain: &str,
        key: &str,
    ) -> Result<Option<LinkWithPartner>, AppError> {
        let domain = domain.to_ascii_lowercase();
        let key_query = self.codec.decoded_key_to_query(&domain, key);
        self.resolve(&domain, &key_query).await
    }

    async fn resolve(
        &self,
        domain: &str,
        key_query: &str,
    ) -> Result<Option<LinkWithPartner>, AppError> {
        let started = Instant::now();

        if let Ok(Some(cached)) = self.cache.get_link(domain, key_query).await {
            return Ok(Some(cached));
        }

        let case_sensitive = self.codec.is_case_sensitive_domain(domain);
        let resolved = self
            .link_repository
            .find_with_partner(domain, key_query, case_sensitive)
            .await?
            .map(|record| resolve_link_with_partner(record, &self.codec));

        if let Some(link) = &resolved
            && let Err(e) = self.cache.set_link(domain, key_query, link, None).await
        {
            tracing::warn!(error = %e, "Failed to cache resolved link");
        }

        tracing::debug!(
            domain = %domain,
            key = %key_query,
            found = resolved.is_some(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "getLinkWithPartner"
        );

        Ok(resolved)
    }

    /// Finds a bare link by `domain`/`key`, honouring case-sensitivity. The
    /// key is taken as already percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn find_link(&self, domain: &str, key: &str) -> Result<Option<Link>, AppError> {
        let domain = domain.to_ascii_lowercase();
        let key_query = self.codec.decoded_key_to_query(&domain, key);
        let case_sensitive = self.codec.is_case_sensitive_domain(&domain);

        self.link_repository
            .find_by_domain_key(&domain, &key_query, case_sensitive)
            .await
    }

    /// Resolves a link owned by the calling workspace.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches or it belongs to
    /// another workspace.
    pub async fn link_info(
        &self,
        ctx: &WorkspaceContext,
        domain: &str,
        key: &str,
    ) -> Result<LinkWithPartner, AppError> {
        self.get_link_with_partner_decoded(domain, key)
            .await?
            .filter(|resolved| {
                resolved.link.workspace_id.as_deref() == Some(ctx.workspace.id.as_str())
            })
            .ok_or_else(|| {
                AppError::not_found("Link not found", json!({ "domain": domain, "key": key }))
            })
    }

    /// Deletes links of the calling workspace and returns how many were
    /// removed. Ids of other workspaces are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if any selected link sits in a folder
    /// and the token lacks `folders.write`; nothing is deleted then.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn bulk_delete(
        &self,
        ctx: &WorkspaceContext,
        link_ids: &[String],
    ) -> Result<u64, AppError> {
        let ids: Vec<String> = link_ids
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let workspace_id = ctx.workspace.id.as_str();

        let links = self
            .link_repository
            .find_many_in_workspace(workspace_id, &ids)
            .await?;

        if links.is_empty() {
            return Ok(0);
        }

        if links_have_folders(&links) {
            ctx.require(Scope::FoldersWrite)?;
        }

        let owned: Vec<String> = links.iter().map(|l| l.id.clone()).collect();
        let deleted = self
            .link_repository
            .delete_many(workspace_id, &owned)
            .await?;

        for link in &links {
            let key_query = self.codec.stored_key_to_query(&link.domain, &link.key);
            if let Err(e) = self.cache.invalidate(&link.domain, &key_query).await {
                tracing::warn!(
                    error = %e,
                    link_id = %link.id,
                    domain = %link.domain,
                    "Failed to evict deleted link from cache"
                );
            }
        }

        tracing::info!(workspace_id, requested = ids.len(), deleted, "Links deleted");

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Discount, DiscountType, LinkPartner, Plan, Workspace};
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, MockCacheService, NullCache};
    use crate::utils::key_codec::encode_key;
    use chrono::Utc;

    fn codec() -> KeyCodec {
        KeyCodec::new(["buff.ly"])
    }

    fn create_test_link(id: &str, domain: &str, key: &str, folder_id: Option<&str>) -> Link {
        let now = Utc::now();
        Link {
            id: id.to_string(),
            domain: domain.to_string(),
            key: key.to_string(),
            url: "https://example.com/landing".to_string(),
            workspace_id: Some("ws_1".to_string()),
            program_id: Some("prog_1".to_string()),
            partner_id: Some("pn_1".to_string()),
            folder_id: folder_id.map(str::to_string),
            created_at: now,
            updated_at: now,
        }
    }

    fn discount(id: &str, amount: i32) -> Discount {
        Discount {
            id: id.to_string(),
            amount,
            discount_type: DiscountType::Percentage,
            max_duration: None,
        }
    }

    fn record(link: Link) -> LinkPartnerRecord {
        LinkPartnerRecord {
            link,
            partner: Some(LinkPartner {
                id: "pn_1".to_string(),
                name: "Jane".to_string(),
                image: Some("https://img/jane.png".to_string()),
            }),
            partner_discount: None,
            program_discount: Some(discount("disc_default", 10)),
        }
    }

    fn context(scopes: &[Scope]) -> WorkspaceContext {
        WorkspaceContext {
            workspace: Workspace {
                id: "ws_1".to_string(),
                name: "Acme".to_string(),
                slug: "acme".to_string(),
                plan: Plan::Pro,
                created_at: Utc::now(),
            },
            scopes: scopes.iter().copied().collect(),
        }
    }

    fn service(repo: MockLinkRepository) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo), Arc::new(NullCache::new()), codec())
    }

    #[test]
    fn test_resolve_prefers_partner_discount() {
        let mut rec = record(create_test_link("l1", "dub.sh", "summer", None));
        rec.partner_discount = Some(discount("disc_partner", 25));

        let resolved = resolve_link_with_partner(rec, &codec());

        assert_eq!(resolved.discount.unwrap().id, "disc_partner");
        assert_eq!(resolved.partner.unwrap().name, "Jane");
    }

    #[test]
    fn test_resolve_decodes_case_sensitive_key() {
        let rec = record(create_test_link("l1", "buff.ly", &encode_key("AbC"), None));

        let resolved = resolve_link_with_partner(rec, &codec());

        assert_eq!(resolved.link.key, "AbC");
    }

    #[tokio::test]
    async fn test_get_link_with_partner_normalizes_key() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_with_partner()
            .withf(|domain, key, cs| domain == "dub.sh" && key == "summer" && !cs)
            .times(1)
            .returning(|_, _, _| Ok(Some(record(create_test_link("l1", "dub.sh", "summer", None)))));

        let resolved = service(repo)
            .get_link_with_partner("DUB.sh", "SUMMER")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(resolved.link.id, "l1");
        assert_eq!(resolved.discount.unwrap().id, "disc_default");
    }

    #[tokio::test]
    async fn test_decoded_key_is_not_percent_decoded_again() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_with_partner()
            .withf(|domain, key, cs| domain == "dub.sh" && key == "a%41" && !cs)
            .times(1)
            .returning(|_, _, _| Ok(None));

        let resolved = service(repo)
            .get_link_with_partner_decoded("dub.sh", "A%41")
            .await
            .unwrap();

        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_get_link_with_partner_encodes_case_sensitive_key() {
        let expected = encode_key("AbC");
        let mut repo = MockLinkRepository::new();
        repo.expect_find_with_partner()
            .withf(move |domain, key, cs| domain == "buff.ly" && key == expected && *cs)
            .times(1)
            .returning(|_, _, _| Ok(None));

        let resolved = service(repo)
            .get_link_with_partner("buff.ly", "AbC")
            .await
            .unwrap();

        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_repository() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_with_partner().never();

        let mut cache = MockCacheService::new();
        cache
            .expect_get_link()
            .withf(|domain, key| domain == "dub.sh" && key == "summer")
            .returning(|_, _| {
                Ok(Some(resolve_link_with_partner(
                    record(create_test_link("l1", "dub.sh", "summer", None)),
                    &KeyCodec::default(),
                )))
            });

        let service = LinkService::new(Arc::new(repo), Arc::new(cache), codec());

        let resolved = service.get_link_with_partner("dub.sh", "Summer").await.unwrap();

        assert_eq!(resolved.unwrap().link.id, "l1");
    }

    #[tokio::test]
    async fn test_cache_miss_stores_resolution() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_with_partner()
            .returning(|_, _, _| Ok(Some(record(create_test_link("l1", "dub.sh", "summer", None)))));

        let mut cache = MockCacheService::new();
        cache.expect_get_link().returning(|_, _| Ok(None));
        cache
            .expect_set_link()
            .withf(|domain, key, link, ttl| {
                domain == "dub.sh" && key == "summer" && link.link.id == "l1" && ttl.is_none()
            })
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let service = LinkService::new(Arc::new(repo), Arc::new(cache), codec());

        assert!(
            service
                .get_link_with_partner("dub.sh", "summer")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_link_info_hides_other_workspaces() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_with_partner().returning(|_, _, _| {
            let mut link = create_test_link("l1", "dub.sh", "summer", None);
            link.workspace_id = Some("ws_other".to_string());
            Ok(Some(record(link)))
        });

        let err = service(repo)
            .link_info(&context(&[Scope::LinksRead]), "dub.sh", "summer")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_bulk_delete_requires_folder_scope() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_many_in_workspace().returning(|_, _| {
            Ok(vec![
                create_test_link("l1", "dub.sh", "a", None),
                create_test_link("l2", "dub.sh", "b", Some("fold_1")),
            ])
        });
        repo.expect_delete_many().never();

        let err = service(repo)
            .bulk_delete(&context(&[Scope::LinksWrite]), &["l1".into(), "l2".into()])
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_bulk_delete_with_folder_scope() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_many_in_workspace()
            .withf(|ws, ids| ws == "ws_1" && ids == ["l1".to_string(), "l2".to_string()])
            .returning(|_, _| Ok(vec![create_test_link("l2", "dub.sh", "b", Some("fold_1"))]));
        repo.expect_delete_many()
            .withf(|ws, ids| ws == "ws_1" && ids == ["l2".to_string()])
            .times(1)
            .returning(|_, _| Ok(1));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|domain, key| domain == "dub.sh" && key == "b")
            .times(1)
            .returning(|_, _| Ok(()));

        let service = LinkService::new(Arc::new(repo), Arc::new(cache), codec());

        let deleted = service
            .bulk_delete(
                &context(&[Scope::LinksWrite, Scope::FoldersWrite]),
                &["l2".into(), "l1".into(), "l2".into()],
            )
            .await
            .unwrap();

        assert_eq!(deleted, 1);
    }

    #[tokio::test]
    async fn test_bulk_delete_evicts_every_link_despite_cache_errors() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_many_in_workspace().returning(|_, _| {
            Ok(vec![
                create_test_link("l1", "dub.sh", "a", None),
                create_test_link("l2", "buff.ly", &encode_key("AbC"), None),
            ])
        });
        repo.expect_delete_many().times(1).returning(|_, _| Ok(2));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|domain, key| domain == "dub.sh" && key == "a")
            .times(1)
            .returning(|_, _| Err(CacheError::ConnectionError("redis down".to_string())));
        let expected = encode_key("AbC");
        cache
            .expect_invalidate()
            .withf(move |domain, key| domain == "buff.ly" && key == expected)
            .times(1)
            .returning(|_, _| Ok(()));

        let service = LinkService::new(Arc::new(repo), Arc::new(cache), codec());

        let deleted = service
            .bulk_delete(&context(&[Scope::LinksWrite]), &["l1".into(), "l2".into()])
            .await
            .unwrap();

        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_of_foreign_ids_is_noop() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_many_in_workspace().returning(|_, _| Ok(vec![]));
        repo.expect_delete_many().never();

        let deleted = service(repo)
            .bulk_delete(&context(&[Scope::LinksWrite]), &["l9".into()])
            .await
            .unwrap();

        assert_eq!(deleted, 0);
    }
}
