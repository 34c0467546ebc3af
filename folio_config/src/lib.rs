use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use folio_models::email_address::EmailAddress;
use serde::Deserialize;
use url::Url;

mod duration;

pub use duration::Duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon-separated list of config files to load, in override order.
const CONFIG_PATH_ENV_VAR: &str = "FOLIO_CONFIG";

/// Any config value can be overridden from the environment, e.g.
/// `FOLIO__MAIL__API_KEY` for `mail.api_key`.
const ENV_PREFIX: &str = "FOLIO";

pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var(CONFIG_PATH_ENV_VAR)
        .map(|paths| paths.split(':').map(Into::into).collect())
        .unwrap_or_else(|_| vec![DEFAULT_CONFIG_PATH.to_owned()]);
    load_paths(&paths)
}

pub fn load_paths(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub mail: MailConfig,
    pub contact: ContactConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub real_ip: Option<RealIpConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Deserialize)]
pub struct MailConfig {
    pub endpoint: Option<Url>,
    pub api_key: String,
    pub from: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub recipient: EmailAddress,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}
