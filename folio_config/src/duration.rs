//! Human-friendly duration config format: whitespace-separated parts with a
//! unit suffix, e.g. `"30s"`, `"5m"`, `"1h 30m"`.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map(Duration).map_err(serde::de::Error::custom)
    }
}

fn parse(raw: &str) -> Result<std::time::Duration, String> {
    let mut parts = raw.split_whitespace().peekable();
    if parts.peek().is_none() {
        return Err("empty duration".into());
    }

    let mut seconds = 0;
    for part in parts {
        let (value, factor) = if let Some(value) = part.strip_suffix('s') {
            (value, 1)
        } else if let Some(value) = part.strip_suffix('m') {
            (value, 60)
        } else if let Some(value) = part.strip_suffix('h') {
            (value, 3600)
        } else if let Some(value) = part.strip_suffix('d') {
            (value, 86400)
        } else {
            return Err(format!("missing unit in duration part {part:?}"));
        };

        let value: u64 = value
            .parse()
            .map_err(|_| format!("invalid duration part {part:?}"))?;
        seconds += value * factor;
    }

    Ok(std::time::Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_json(raw: &str) -> Result<Duration, serde_json::Error> {
        serde_json::from_value(serde_json::Value::String(raw.into()))
    }

    #[test]
    fn parses_single_parts() {
        assert_eq!(parse_json("30s").unwrap().0.as_secs(), 30);
        assert_eq!(parse_json("5m").unwrap().0.as_secs(), 300);
        assert_eq!(parse_json("2h").unwrap().0.as_secs(), 7200);
        assert_eq!(parse_json("1d").unwrap().0.as_secs(), 86400);
    }

    #[test]
    fn parses_combined_parts() {
        assert_eq!(parse_json("1h 30m").unwrap().0.as_secs(), 5400);
        assert_eq!(parse_json("1d 1h 1m 1s").unwrap().0.as_secs(), 90061);
    }

    #[test]
    fn rejects_invalid_input() {
        for raw in ["", "  ", "30", "s", "30x", "1h30m", "-5s"] {
            assert!(parse_json(raw).is_err(), "accepted {raw:?}");
        }
    }
}
