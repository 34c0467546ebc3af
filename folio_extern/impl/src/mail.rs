use std::sync::Arc;

use anyhow::{bail, Context};
use folio_extern_contracts::mail::{MailApiService, MailDelivery, OutboundMail};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::http::HttpClient;

const API_ENDPOINT: &str = "https://api.resend.com/";

#[derive(Debug, Clone)]
pub struct MailApiServiceImpl {
    config: MailApiServiceConfig,
    client: HttpClient,
}

#[derive(Clone)]
pub struct MailApiServiceConfig {
    endpoint: Arc<Url>,
    api_key: Arc<str>,
    from: Arc<str>,
}

impl MailApiServiceConfig {
    pub fn new(endpoint_override: Option<Url>, api_key: String, from: String) -> Self {
        Self {
            endpoint: endpoint_override
                .unwrap_or_else(|| API_ENDPOINT.parse().unwrap())
                .into(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

impl std::fmt::Debug for MailApiServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailApiServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[redacted]")
            .field("from", &self.from)
            .finish()
    }
}

impl MailApiServiceImpl {
    pub fn new(config: MailApiServiceConfig) -> Self {
        Self {
            config,
            client: HttpClient::default(),
        }
    }

    fn send_endpoint(&self) -> anyhow::Result<Url> {
        self.config
            .endpoint
            .join("emails")
            .context("Failed to construct mail provider send endpoint")
    }
}

impl MailApiService for MailApiServiceImpl {
    async fn send(&self, mail: OutboundMail) -> anyhow::Result<MailDelivery> {
        let response = self
            .client
            .post(self.send_endpoint()?)
            .bearer_auth(&self.config.api_key)
            .json(&SendMailRequest {
                from: &self.config.from,
                to: [mail.to.as_str()],
                reply_to: mail.reply_to.as_ref().map(|address| address.as_str()),
                subject: &mail.subject,
                html: &mail.html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The raw provider body stays in the server log; callers only see
            // the status code.
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "mail provider rejected the send request");
            bail!("mail provider responded with status {status}");
        }

        let SendMailResponse { id } = response.json().await?;
        Ok(MailDelivery { id })
    }

    async fn ping(&self) -> anyhow::Result<()> {
        // Any HTTP response counts as reachable; auth is not exercised here.
        self.client
            .get((*self.config.endpoint).clone())
            .send()
            .await
            .map(|_| ())
            .map_err(Into::into)
    }
}

#[derive(Serialize)]
struct SendMailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct SendMailResponse {
    id: String,
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, sync::Mutex};

    use axum::{
        extract::State,
        http::{header, HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing, Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn(router: Router) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/").parse().unwrap()
    }

    fn service(endpoint: Url) -> MailApiServiceImpl {
        MailApiServiceImpl::new(MailApiServiceConfig::new(
            Some(endpoint),
            "test-api-key".into(),
            "Contact Form <no-reply@example.com>".into(),
        ))
    }

    fn mail() -> OutboundMail {
        OutboundMail {
            to: "owner@example.com".parse().unwrap(),
            reply_to: Some("jane@example.com".parse().unwrap()),
            subject: "[Contact Form] project - from Jane Doe".into(),
            html: "<p>Hello</p>".into(),
        }
    }

    #[tokio::test]
    async fn send_ok() {
        // Arrange
        let received: Arc<Mutex<Option<(Option<String>, Value)>>> = Default::default();
        let router = Router::new()
            .route(
                "/emails",
                routing::post(
                    |state: State<Arc<Mutex<Option<(Option<String>, Value)>>>>,
                     headers: HeaderMap,
                     Json(body): Json<Value>| async move {
                        let auth = headers
                            .get(header::AUTHORIZATION)
                            .and_then(|value| value.to_str().ok())
                            .map(ToOwned::to_owned);
                        *state.lock().unwrap() = Some((auth, body));
                        Json(json!({"id": "abc123"}))
                    },
                ),
            )
            .with_state(Arc::clone(&received));
        let endpoint = spawn(router).await;

        // Act
        let delivery = service(endpoint).send(mail()).await.unwrap();

        // Assert
        assert_eq!(delivery, MailDelivery { id: "abc123".into() });
        let (auth, body) = received.lock().unwrap().take().unwrap();
        assert_eq!(auth.as_deref(), Some("Bearer test-api-key"));
        assert_eq!(
            body,
            json!({
                "from": "Contact Form <no-reply@example.com>",
                "to": ["owner@example.com"],
                "reply_to": "jane@example.com",
                "subject": "[Contact Form] project - from Jane Doe",
                "html": "<p>Hello</p>",
            })
        );
    }

    #[tokio::test]
    async fn send_provider_error_is_not_leaked() {
        // Arrange
        async fn reject() -> Response {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"message": "upstream exploded"})),
            )
                .into_response()
        }
        let router = Router::new().route("/emails", routing::post(reject));
        let endpoint = spawn(router).await;

        // Act
        let result = service(endpoint).send(mail()).await;

        // Assert
        let message = result.unwrap_err().to_string();
        assert!(message.contains("503"), "unexpected error: {message}");
        assert!(!message.contains("upstream exploded"), "leaked: {message}");
    }

    #[tokio::test]
    async fn ping_accepts_any_http_response() {
        // A bare router answers 404; reachability is all that matters.
        let endpoint = spawn(Router::new()).await;

        service(endpoint).ping().await.unwrap();
    }

    #[tokio::test]
    async fn ping_fails_when_unreachable() {
        let endpoint: Url = "http://127.0.0.1:9/".parse().unwrap();

        assert!(service(endpoint).ping().await.is_err());
    }
}
