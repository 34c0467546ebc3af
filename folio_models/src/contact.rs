//! The contact submission model and its form validator.
//!
//! A submission is either fully valid or rejected outright. The same rules
//! run in the browser form and authoritatively in the relay, via the single
//! [`SubmissionForm::validate`] implementation.

use std::{collections::BTreeMap, fmt, str::FromStr};

use nutype::nutype;
use serde::Deserialize;
use thiserror::Error;

use crate::email_address::{EmailAddress, EmailAddressError};

pub const NAME_MAX_CHARS: usize = 100;
pub const MESSAGE_MAX_CHARS: usize = 5000;

/// A fully validated contact submission. Constructed transiently, delivered
/// once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: SubmissionName,
    pub email: EmailAddress,
    pub subject: InquiryTopic,
    pub message: SubmissionMessage,
}

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 100),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionName(String);

#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 5000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct SubmissionMessage(String);

/// Closed set of inquiry categories offered by the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryTopic {
    Project,
    Consulting,
    Startup,
    Other,
}

impl InquiryTopic {
    pub const ALL: [Self; 4] = [Self::Project, Self::Consulting, Self::Startup, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Consulting => "consulting",
            Self::Startup => "startup",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for InquiryTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown inquiry topic")]
pub struct UnknownInquiryTopicError;

impl FromStr for InquiryTopic {
    type Err = UnknownInquiryTopicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or(UnknownInquiryTopicError)
    }
}

/// Raw form input as it arrives from the client. Wrong-typed JSON values
/// deserialize to `None` instead of failing the whole body, so a malformed
/// field surfaces as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmissionForm {
    #[serde(default, deserialize_with = "folio_utils::serde::lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "folio_utils::serde::lenient::string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "folio_utils::serde::lenient::string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "folio_utils::serde::lenient::string")]
    pub message: Option<String>,
}

impl SubmissionForm {
    /// Validates the raw fields, returning either a normalized submission or
    /// an error for every field that failed. Pure function of its input.
    pub fn validate(&self) -> Result<ContactSubmission, SubmissionRejection> {
        let mut fields = BTreeMap::new();

        let name = match trimmed(&self.name) {
            Some(raw) => match SubmissionName::try_from(raw) {
                Ok(name) => Some(name),
                Err(SubmissionNameError::NotEmptyViolated) => {
                    fields.insert(SubmissionField::Name, FieldError::Missing);
                    None
                }
                Err(SubmissionNameError::LenCharMaxViolated) => {
                    fields.insert(
                        SubmissionField::Name,
                        FieldError::TooLong { max: NAME_MAX_CHARS },
                    );
                    None
                }
            },
            None => {
                fields.insert(SubmissionField::Name, FieldError::Missing);
                None
            }
        };

        let email = match trimmed(&self.email) {
            Some(raw) => match EmailAddress::try_from(raw) {
                Ok(email) => Some(email),
                Err(EmailAddressError::RegexViolated) => {
                    fields.insert(SubmissionField::Email, FieldError::InvalidEmail);
                    None
                }
            },
            None => {
                fields.insert(SubmissionField::Email, FieldError::Missing);
                None
            }
        };

        let subject = match trimmed(&self.subject) {
            Some(raw) => match raw.parse::<InquiryTopic>() {
                Ok(topic) => Some(topic),
                Err(UnknownInquiryTopicError) => {
                    fields.insert(SubmissionField::Subject, FieldError::UnknownTopic);
                    None
                }
            },
            None => {
                fields.insert(SubmissionField::Subject, FieldError::Missing);
                None
            }
        };

        let message = match trimmed(&self.message) {
            Some(raw) => match SubmissionMessage::try_from(raw) {
                Ok(message) => Some(message),
                Err(SubmissionMessageError::NotEmptyViolated) => {
                    fields.insert(SubmissionField::Message, FieldError::Missing);
                    None
                }
                Err(SubmissionMessageError::LenCharMaxViolated) => {
                    fields.insert(
                        SubmissionField::Message,
                        FieldError::TooLong { max: MESSAGE_MAX_CHARS },
                    );
                    None
                }
            },
            None => {
                fields.insert(SubmissionField::Message, FieldError::Missing);
                None
            }
        };

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(ContactSubmission {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(SubmissionRejection { fields }),
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Verdict for a form that failed validation: every failed field, with the
/// reason it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRejection {
    pub fields: BTreeMap<SubmissionField, FieldError>,
}

impl SubmissionRejection {
    pub fn has_missing_fields(&self) -> bool {
        self.fields
            .values()
            .any(|error| matches!(error, FieldError::Missing))
    }

    /// Human-readable message per failed field, e.g.
    /// `name is required` or `message must be at most 5000 characters`.
    pub fn messages(&self) -> BTreeMap<SubmissionField, String> {
        self.fields
            .iter()
            .map(|(field, error)| (*field, format!("{field} {error}")))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubmissionField {
    Name,
    Email,
    Subject,
    Message,
}

impl fmt::Display for SubmissionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Missing,
    TooLong { max: usize },
    InvalidEmail,
    UnknownTopic,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("is required"),
            Self::TooLong { max } => write!(f, "must be at most {max} characters"),
            Self::InvalidEmail => f.write_str("is not a valid email address"),
            Self::UnknownTopic => {
                f.write_str("must be one of ")?;
                for (i, topic) in InquiryTopic::ALL.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(topic.as_str())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn form() -> SubmissionForm {
        SubmissionForm {
            name: Some("Jane Doe".into()),
            email: Some("jane@example.com".into()),
            subject: Some("project".into()),
            message: Some("Hello".into()),
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let submission = form().validate().unwrap();

        assert_eq!(*submission.name, "Jane Doe");
        assert_eq!(submission.email.as_str(), "jane@example.com");
        assert_eq!(submission.subject, InquiryTopic::Project);
        assert_eq!(*submission.message, "Hello");
    }

    #[test]
    fn normalizes_surrounding_whitespace() {
        let submission = SubmissionForm {
            name: Some("  Jane Doe  ".into()),
            email: Some(" jane@example.com ".into()),
            subject: Some(" project ".into()),
            message: Some("  Hello  ".into()),
        }
        .validate()
        .unwrap();

        assert_eq!(*submission.name, "Jane Doe");
        assert_eq!(submission.email.as_str(), "jane@example.com");
        assert_eq!(*submission.message, "Hello");
    }

    #[test]
    fn rejects_each_missing_field() {
        for (field, patch) in [
            (SubmissionField::Name, SubmissionForm { name: None, ..form() }),
            (SubmissionField::Email, SubmissionForm { email: None, ..form() }),
            (SubmissionField::Subject, SubmissionForm { subject: None, ..form() }),
            (SubmissionField::Message, SubmissionForm { message: None, ..form() }),
        ] {
            let rejection = patch.validate().unwrap_err();
            assert_eq!(rejection.fields.get(&field), Some(&FieldError::Missing));
            assert_eq!(rejection.fields.len(), 1);
            assert!(rejection.has_missing_fields());
        }
    }

    #[test]
    fn treats_blank_fields_as_missing() {
        let rejection = SubmissionForm {
            name: Some("   ".into()),
            message: Some("".into()),
            ..form()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            rejection.fields,
            BTreeMap::from([
                (SubmissionField::Name, FieldError::Missing),
                (SubmissionField::Message, FieldError::Missing),
            ])
        );
    }

    #[test]
    fn rejects_malformed_email() {
        let rejection = SubmissionForm {
            email: Some("not-an-email".into()),
            ..form()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            rejection.fields.get(&SubmissionField::Email),
            Some(&FieldError::InvalidEmail)
        );
        assert!(!rejection.has_missing_fields());
    }

    #[test]
    fn rejects_oversized_fields() {
        let rejection = SubmissionForm {
            name: Some("x".repeat(NAME_MAX_CHARS + 1)),
            message: Some("y".repeat(MESSAGE_MAX_CHARS + 1)),
            ..form()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            rejection.fields,
            BTreeMap::from([
                (SubmissionField::Name, FieldError::TooLong { max: NAME_MAX_CHARS }),
                (SubmissionField::Message, FieldError::TooLong { max: MESSAGE_MAX_CHARS }),
            ])
        );
    }

    #[test]
    fn accepts_fields_at_their_limit() {
        let submission = SubmissionForm {
            name: Some("x".repeat(NAME_MAX_CHARS)),
            message: Some("y".repeat(MESSAGE_MAX_CHARS)),
            ..form()
        }
        .validate()
        .unwrap();

        assert_eq!(submission.name.len(), NAME_MAX_CHARS);
    }

    #[test]
    fn rejects_topics_outside_the_closed_set() {
        for raw in ["partnership", "Project", "PROJECT", "projects"] {
            let rejection = SubmissionForm {
                subject: Some(raw.into()),
                ..form()
            }
            .validate()
            .unwrap_err();

            assert_eq!(
                rejection.fields.get(&SubmissionField::Subject),
                Some(&FieldError::UnknownTopic)
            );
        }
    }

    #[test]
    fn accepts_every_listed_topic() {
        for topic in InquiryTopic::ALL {
            let submission = SubmissionForm {
                subject: Some(topic.as_str().into()),
                ..form()
            }
            .validate()
            .unwrap();
            assert_eq!(submission.subject, topic);
        }
    }

    #[test]
    fn validation_is_idempotent() {
        let valid = form();
        assert_eq!(valid.validate(), valid.validate());

        let invalid = SubmissionForm {
            name: None,
            email: Some("nope".into()),
            ..form()
        };
        assert_eq!(invalid.validate(), invalid.validate());
    }

    #[test]
    fn renders_field_messages() {
        let rejection = SubmissionForm {
            name: None,
            email: Some("nope".into()),
            subject: Some("sales".into()),
            message: Some("z".repeat(MESSAGE_MAX_CHARS + 1)),
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            rejection.messages(),
            BTreeMap::from([
                (SubmissionField::Name, "name is required".to_owned()),
                (SubmissionField::Email, "email is not a valid email address".to_owned()),
                (
                    SubmissionField::Subject,
                    "subject must be one of project, consulting, startup, other".to_owned()
                ),
                (
                    SubmissionField::Message,
                    "message must be at most 5000 characters".to_owned()
                ),
            ])
        );
    }

    #[test]
    fn wrong_typed_fields_deserialize_as_missing() {
        let form: SubmissionForm = serde_json::from_value(json!({
            "name": 42,
            "email": ["jane@example.com"],
            "subject": {"value": "project"},
            "message": true,
        }))
        .unwrap();

        assert_eq!(form, SubmissionForm::default());
        assert!(form.validate().unwrap_err().has_missing_fields());
    }

    #[test]
    fn ignores_unknown_body_fields() {
        let form: SubmissionForm = serde_json::from_value(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "subject": "project",
            "message": "Hello",
            "captcha": "irrelevant",
        }))
        .unwrap();

        assert!(form.validate().is_ok());
    }
}
