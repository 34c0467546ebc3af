use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::Router;
use folio_core_contact_contracts::ContactService;
use folio_core_health_contracts::HealthService;
use tokio::net::TcpListener;

pub use middlewares::client_ip::RealIpConfig as RestServerRealIpConfig;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    config: RestServerConfig,
    health: Health,
    contact: Contact,
}

#[derive(Debug, Clone, Default)]
pub struct RestServerConfig {
    pub real_ip_config: Option<Arc<RestServerRealIpConfig>>,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthService,
    Contact: ContactService,
{
    pub fn new(config: RestServerConfig, health: Health, contact: Contact) -> Self {
        Self {
            config,
            health,
            contact,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let Self {
            config,
            health,
            contact,
        } = self;

        let router = Router::new()
            .merge(routes::health::router(health.into()))
            .merge(routes::contact::router(contact.into()));

        // Layer order, outermost first: cors (answers preflights before
        // anything else), panic handler, request id, client ip, trace (reads
        // the request id and client ip extensions).
        let router = middlewares::trace::add(router);
        let router = middlewares::client_ip::add(config.real_ip_config)(router);
        let router = middlewares::request_id::add(router);
        let router = middlewares::panic_handler::add(router);
        middlewares::cors::add(router)
    }
}
