use serde::Serialize;

// Wire-level error messages the browser form matches on.
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";
pub const INVALID_EMAIL_FORMAT: &str = "Invalid email format";
pub const FAILED_TO_SEND: &str = "Failed to send message";

/// Success body: the provider's opaque message id, so the form can surface a
/// reference on request.
#[derive(Debug, Serialize)]
pub struct ApiSubmissionReceipt {
    pub success: bool,
    pub id: String,
}
