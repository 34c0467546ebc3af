//! Tolerant deserializers for untrusted client input.

use serde::{de::IgnoredAny, Deserialize, Deserializer};

/// Deserializes an optional string, mapping any non-string value to `None`
/// instead of failing the surrounding struct.
pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        String(String),
        Other(IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::String(value)) => Some(value),
        _ => None,
    })
}
