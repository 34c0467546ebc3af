use folio_config::Config;
use folio_extern_contracts::mail::MailApiService;
use tracing::info;

use crate::{environment, mail};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let mail_api = mail::connect(&config.mail);

    info!("Pinging mail provider");
    mail_api.ping().await?;

    let host = config.http.host;
    let port = config.http.port;
    let server = environment::build_rest_server(&config, mail_api);

    info!("Starting http server on {host}:{port}");
    server.serve(host, port).await
}
