use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_contact_contracts::{ContactSendMessageError, ContactService};
use folio_models::contact::{SubmissionField, SubmissionForm, SubmissionRejection};

use super::{error, internal_server_error};
use crate::models::contact::{
    ApiSubmissionReceipt, ALL_FIELDS_REQUIRED, FAILED_TO_SEND, INVALID_EMAIL_FORMAT,
};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(submit).options(preflight))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactService>>,
    form: Result<Json<SubmissionForm>, JsonRejection>,
) -> Response {
    // An unparsable body carries no usable fields, so it takes the same path
    // as an empty form.
    let form = form.map(|Json(form)| form).unwrap_or_default();

    let submission = match form.validate() {
        Ok(submission) => submission,
        Err(rejection) => return validation_error(rejection),
    };

    match service.send_message(submission).await {
        Ok(delivery) => Json(ApiSubmissionReceipt {
            success: true,
            id: delivery.id,
        })
        .into_response(),
        Err(ContactSendMessageError::Send) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, FAILED_TO_SEND)
        }
        Err(ContactSendMessageError::Other(err)) => internal_server_error(err),
    }
}

/// Bare `OPTIONS` without preflight headers bypasses the cors layer; answer
/// it here with the same empty 200.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

fn validation_error(rejection: SubmissionRejection) -> Response {
    // A rejection here means the payload bypassed the form's own validation,
    // or the two validation layers disagree.
    tracing::warn!(?rejection, "rejected contact submission");

    if rejection.has_missing_fields() {
        return error(StatusCode::BAD_REQUEST, ALL_FIELDS_REQUIRED);
    }

    if rejection.fields.contains_key(&SubmissionField::Email) {
        return error(StatusCode::BAD_REQUEST, INVALID_EMAIL_FORMAT);
    }

    match rejection.messages().into_values().next() {
        Some(message) => error(StatusCode::BAD_REQUEST, message),
        None => error(StatusCode::BAD_REQUEST, ALL_FIELDS_REQUIRED),
    }
}
