use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_health_contracts::{HealthService, HealthStatus};
use serde::Serialize;

pub fn router(service: Arc<impl HealthService>) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state(service)
}

#[derive(Serialize)]
struct HealthResponse {
    http: bool,
    mail_api: bool,
}

async fn health(service: State<Arc<impl HealthService>>) -> Response {
    let HealthStatus { mail_api } = service.get_status().await;

    let status = if mail_api {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    let response = HealthResponse {
        http: true,
        mail_api,
    };

    (status, Json(response)).into_response()
}
