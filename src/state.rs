//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{
    AnalyticsService, AuthService, DefaultDomainService, LinkService,
};
use crate::domain::link_event::LinkEvent;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::persistence::{
    PgAnalyticsStore, PgCommissionRepository, PgDefaultDomainsRepository, PgLinkRepository,
    PgProgramRepository, PgTokenRepository,
};
use crate::utils::key_codec::KeyCodec;

pub type AppLinkService = LinkService<PgLinkRepository>;
pub type AppAnalyticsService = AnalyticsService<
    PgAnalyticsStore,
    PgProgramRepository,
    PgCommissionRepository,
    PgLinkRepository,
>;
pub type AppDefaultDomainService = DefaultDomainService<PgDefaultDomainsRepository>;
pub type AppAuthService = AuthService<PgTokenRepository>;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub link_service: Arc<AppLinkService>,
    pub analytics_service: Arc<AppAnalyticsService>,
    pub default_domain_service: Arc<AppDefaultDomainService>,
    pub auth_service: Arc<AppAuthService>,
    pub cache: Arc<dyn CacheService>,
    pub event_sender: mpsc::Sender<LinkEvent>,
}

impl AppState {
    /// Wires PostgreSQL repositories into the services.
    pub fn new(
        pool: Arc<PgPool>,
        cache: Arc<dyn CacheService>,
        event_sender: mpsc::Sender<LinkEvent>,
        codec: KeyCodec,
        token_signing_secret: String,
    ) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(pool.clone()));
        let link_service = Arc::new(LinkService::new(link_repository, cache.clone(), codec));

        let analytics_service = Arc::new(AnalyticsService::new(
            Arc::new(PgAnalyticsStore::new(pool.clone())),
            Arc::new(PgProgramRepository::new(pool.clone())),
            Arc::new(PgCommissionRepository::new(pool.clone())),
            link_service.clone(),
        ));

        let default_domain_service = Arc::new(DefaultDomainService::new(Arc::new(
            PgDefaultDomainsRepository::new(pool.clone()),
        )));

        let auth_service = Arc::new(AuthService::new(
            Arc::new(PgTokenRepository::new(pool.clone())),
            token_signing_secret,
        ));

        Self {
            db: pool,
            link_service,
            analytics_service,
            default_domain_service,
            auth_service,
            cache,
            event_sender,
        }
    }
}
