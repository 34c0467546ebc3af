//! Resolve the client ip, optionally trusting a reverse proxy header.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    Router,
};
use tracing::{error, warn};

pub fn add<S: Clone + Send + Sync + 'static>(
    real_ip_config: Option<Arc<RealIpConfig>>,
) -> impl FnOnce(Router<S>) -> Router<S> {
    |router| {
        router.layer(from_fn(move |mut request: Request, next: Next| {
            let client_ip = ClientIp::from_request(&request, real_ip_config.as_deref());
            request.extensions_mut().insert(client_ip);
            next.run(request)
        }))
    }
}

/// The header is only honored when the connection comes from `set_from`;
/// anyone else could forge it.
#[derive(Debug, Clone)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    fn from_request(request: &Request, real_ip_config: Option<&RealIpConfig>) -> Self {
        let connection_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .unwrap()
            .ip();

        let Some(RealIpConfig { header, set_from }) = real_ip_config else {
            return Self(connection_ip);
        };

        if *set_from != connection_ip {
            return Self(connection_ip);
        }

        let Some(header_value) = request.headers().get(header) else {
            warn!(%connection_ip, "real ip header not found");
            return Self(connection_ip);
        };

        match header_value
            .to_str()
            .ok()
            .and_then(|real_ip| real_ip.parse().ok())
        {
            Some(real_ip) => Self(real_ip),
            None => {
                error!(%connection_ip, ?header_value, "failed to parse real ip header value");
                Self(connection_ip)
            }
        }
    }
}
