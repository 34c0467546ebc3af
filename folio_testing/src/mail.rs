use std::{net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

const SEND_ROUTE: &str = "/emails";

pub async fn start_server(host: IpAddr, port: u16, api_key: String) -> anyhow::Result<()> {
    info!("Starting mail provider testing server on {host}:{port}");
    info!("Send endpoint: http://{host}:{port}{SEND_ROUTE}");
    info!("Api key: {api_key:?}");

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(api_key))
        .await
        .context("Failed to start HTTP server")
}

pub fn router(api_key: String) -> Router<()> {
    Router::new()
        .route("/", routing::get(index))
        .route(SEND_ROUTE, routing::post(send))
        .with_state(Arc::<str>::from(api_key))
}

async fn index() -> &'static str {
    "folio mail provider testing server"
}

#[derive(Debug, Deserialize)]
struct SendRequest {
    from: String,
    to: Vec<String>,
    #[serde(default)]
    reply_to: Option<String>,
    subject: String,
    html: String,
}

#[derive(Serialize)]
struct SendResponse {
    id: Uuid,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: &'static str,
}

async fn send(state: State<Arc<str>>, headers: HeaderMap, mail: Json<SendRequest>) -> Response {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| key == &**state);

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                message: "invalid api key",
            }),
        )
            .into_response();
    }

    let Json(mail) = mail;
    let id = Uuid::new_v4();
    info!(
        %id,
        from = %mail.from,
        to = ?mail.to,
        reply_to = ?mail.reply_to,
        subject = %mail.subject,
        "Received mail"
    );
    info!("{}", mail.html);

    Json(SendResponse { id }).into_response()
}
