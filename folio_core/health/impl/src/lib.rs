use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use folio_core_health_contracts::{HealthService, HealthStatus};
use folio_extern_contracts::mail::MailApiService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthServiceImpl<MailApi> {
    mail_api: MailApi,
    config: HealthServiceConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthServiceConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    refreshed: Instant,
}

impl<MailApi> HealthServiceImpl<MailApi> {
    pub fn new(mail_api: MailApi, config: HealthServiceConfig) -> Self {
        Self {
            mail_api,
            config,
            state: Default::default(),
        }
    }
}

impl<MailApi> HealthService for HealthServiceImpl<MailApi>
where
    MailApi: MailApiService,
{
    async fn get_status(&self) -> HealthStatus {
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|cached| cached.refreshed.elapsed() < self.config.cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|cached| cached.refreshed.elapsed() < self.config.cache_ttl)
        {
            return cached.status;
        }

        let mail_api = self
            .mail_api
            .ping()
            .await
            .inspect_err(|err| error!("Failed to ping mail provider: {err:#}"))
            .is_ok();

        let status = HealthStatus { mail_api };

        cache_guard
            .insert(CachedStatus {
                status,
                refreshed: Instant::now(),
            })
            .status
    }
}
