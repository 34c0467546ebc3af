use folio_config::MailConfig;
use folio_extern_impl::mail::{MailApiServiceConfig, MailApiServiceImpl};

/// Construct the transactional mail provider client.
pub fn connect(config: &MailConfig) -> MailApiServiceImpl {
    MailApiServiceImpl::new(MailApiServiceConfig::new(
        config.endpoint.clone(),
        config.api_key.clone(),
        config.from.clone(),
    ))
}
