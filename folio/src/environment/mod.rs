use std::sync::Arc;

use folio_api_rest::{RestServerConfig, RestServerRealIpConfig};
use folio_config::Config;
use folio_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use folio_core_health_impl::{HealthServiceConfig, HealthServiceImpl};

pub mod types;

use types::{MailApi, RestServer};

/// Composition root: wire the concrete service implementations together.
pub fn build_rest_server(config: &Config, mail_api: MailApi) -> RestServer {
    let rest_config = RestServerConfig {
        real_ip_config: config.http.real_ip.as_ref().map(|real_ip| {
            Arc::new(RestServerRealIpConfig {
                header: real_ip.header.clone(),
                set_from: real_ip.set_from,
            })
        }),
    };

    let contact = ContactServiceImpl::new(
        mail_api.clone(),
        ContactServiceConfig {
            recipient: Arc::new(config.contact.recipient.clone()),
        },
    );

    let health = HealthServiceImpl::new(
        mail_api,
        HealthServiceConfig {
            cache_ttl: config.health.cache_ttl.into(),
        },
    );

    RestServer::new(rest_config, health, contact)
}
