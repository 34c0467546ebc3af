use std::future::Future;

use folio_extern_contracts::mail::MailDelivery;
use folio_models::contact::ContactSubmission;
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Delivers a validated submission to the site owner's mailbox and
    /// returns the provider's receipt. At most one delivery attempt per call;
    /// every failure is terminal.
    fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<MailDelivery, ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactService {
    pub fn with_send_message(
        mut self,
        submission: ContactSubmission,
        result: Result<MailDelivery, ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(move |_| Box::pin(std::future::ready(result)));
        self
    }
}
