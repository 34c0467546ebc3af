use std::sync::Arc;

use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_extern_contracts::mail::{MailApiService, MailDelivery, OutboundMail};
use folio_models::{contact::ContactSubmission, email_address::EmailAddress};

#[derive(Debug, Clone)]
pub struct ContactServiceImpl<MailApi> {
    mail_api: MailApi,
    config: ContactServiceConfig,
}

#[derive(Debug, Clone)]
pub struct ContactServiceConfig {
    pub recipient: Arc<EmailAddress>,
}

impl<MailApi> ContactServiceImpl<MailApi> {
    pub fn new(mail_api: MailApi, config: ContactServiceConfig) -> Self {
        Self { mail_api, config }
    }
}

impl<MailApi> ContactService for ContactServiceImpl<MailApi>
where
    MailApi: MailApiService,
{
    async fn send_message(
        &self,
        submission: ContactSubmission,
    ) -> Result<MailDelivery, ContactSendMessageError> {
        let mail = OutboundMail {
            to: (*self.config.recipient).clone(),
            reply_to: Some(submission.email.clone()),
            subject: format!(
                "[Contact Form] {} - from {}",
                submission.subject, *submission.name
            ),
            html: render_html(&submission),
        };

        self.mail_api.send(mail).await.map_err(|err| {
            tracing::error!("Failed to deliver contact message: {err:#}");
            ContactSendMessageError::Send
        })
    }
}

fn render_html(submission: &ContactSubmission) -> String {
    let name = escape_html(&submission.name);
    let email = escape_html(submission.email.as_str());
    let topic = submission.subject;
    let message = escape_html(&submission.message);

    format!(
        "<div style=\"font-family: sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h1>New contact form submission</h1>\
         <p><strong>Name:</strong> {name}</p>\
         <p><strong>Email:</strong> <a href=\"mailto:{email}\">{email}</a></p>\
         <p><strong>Subject:</strong> {topic}</p>\
         <h2>Message</h2>\
         <p style=\"white-space: pre-wrap;\">{message}</p>\
         </div>"
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
