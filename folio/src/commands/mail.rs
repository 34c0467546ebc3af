use clap::Subcommand;
use folio_config::Config;
use folio_extern_contracts::mail::{MailApiService, OutboundMail};
use folio_models::email_address::EmailAddress;

#[derive(Debug, Subcommand)]
pub enum MailCommand {
    /// Test mail deliverability
    Test { recipient: EmailAddress },
}

impl MailCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            MailCommand::Test { recipient } => test(config, recipient).await,
        }
    }
}

async fn test(config: Config, recipient: EmailAddress) -> anyhow::Result<()> {
    let mail_api = crate::mail::connect(&config.mail);

    let delivery = mail_api
        .send(OutboundMail {
            to: recipient,
            reply_to: None,
            subject: "Mail deliverability test".into(),
            html: "<p>Mail delivery seems to be working!</p>".into(),
        })
        .await?;

    println!("{}", delivery.id);

    Ok(())
}
