use std::future::Future;

use folio_models::email_address::EmailAddress;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait MailApiService: Send + Sync + 'static {
    /// Submits a single email to the transactional mail provider. Exactly one
    /// provider call per invocation, no retries.
    fn send(&self, mail: OutboundMail) -> impl Future<Output = anyhow::Result<MailDelivery>> + Send;

    /// Probes provider reachability without sending anything.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMail {
    pub to: EmailAddress,
    pub reply_to: Option<EmailAddress>,
    pub subject: String,
    pub html: String,
}

/// Receipt returned by the provider, carrying its opaque message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDelivery {
    pub id: String,
}

#[cfg(feature = "mock")]
impl MockMailApiService {
    pub fn with_send(mut self, mail: OutboundMail, result: anyhow::Result<MailDelivery>) -> Self {
        self.expect_send()
            .once()
            .with(mockall::predicate::eq(mail))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }

    pub fn with_ping(mut self, result: anyhow::Result<()>) -> Self {
        self.expect_ping()
            .once()
            .return_once(move || Box::pin(std::future::ready(result)));
        self
    }
}
