use std::{ops::Deref, sync::LazyLock};

use nutype::nutype;
use regex::Regex;

/// Pattern an address must satisfy on both sides of the submission pipeline.
/// The relay is reachable directly, so the server applies the exact same
/// pattern the form uses.
pub static EMAIL_ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[nutype(
    sanitize(trim),
    validate(regex = EMAIL_ADDRESS_REGEX),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        TryFrom,
        FromStr,
        Deref,
        Display,
        Serialize,
        Deserialize,
    )
)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.deref()
    }
}
