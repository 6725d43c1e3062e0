//! Parsing helpers for durations, expiries and note IDs.

use chrono::Duration;
use uuid::Uuid;

use crate::errors::CliError;

/// Parse a duration string (e.g., "7d", "24h", "30m", "10s").
pub fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    let value = value.trim();
    let Some((unit_start, _)) = value.char_indices().last() else {
        return Err(anyhow::anyhow!(
            "Invalid duration: {} (expected <number><unit>)",
            value
        ));
    };

    let (num_str, unit) = value.split_at(unit_start);
    if num_str.is_empty() {
        return Err(anyhow::anyhow!(
            "Invalid duration: {} (expected <number><unit>)",
            value
        ));
    }
    let amount: i64 = num_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", value))?;
    if amount <= 0 {
        return Err(anyhow::anyhow!("Duration must be positive: {}", value));
    }

    let duration = match unit {
        "d" => Duration::try_days(amount),
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        "s" => Duration::try_seconds(amount),
        _ => {
            return Err(anyhow::anyhow!(
                "Invalid duration unit: {} (use d/h/m/s)",
                unit
            ))
        }
    };
    duration.ok_or_else(|| anyhow::anyhow!("Duration is too large: {}", value))
}

/// Parse a note expiry: "never" or a duration.
pub fn parse_expires_in(value: &str) -> anyhow::Result<Option<Duration>> {
    if value.trim().eq_ignore_ascii_case("never") {
        return Ok(None);
    }
    parse_duration(value)
        .map(Some)
        .map_err(|e| CliError::invalid_input(format!("{} (or use \"never\")", e)).into())
}

/// Parse a full note UUID.
pub fn parse_note_id(value: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        CliError::invalid_input(format!("Invalid note ID: {} (expected a full UUID)", value))
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("7d").unwrap(), Duration::days(7));
        assert_eq!(parse_duration("24h").unwrap(), Duration::hours(24));
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("10s").unwrap(), Duration::seconds(10));
    }

    #[test]
    fn test_parse_duration_rejects_bad_values() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("0h").is_err());
        assert!(parse_duration("-1h").is_err());
        assert!(parse_duration("5w").is_err());
        assert!(parse_duration("h").is_err());
        assert!(parse_duration("5é").is_err());
        assert!(parse_duration("é").is_err());
        assert!(parse_duration("1000000000000d").is_err());
        assert!(parse_duration("9223372036854775807s").is_err());
    }

    #[test]
    fn test_parse_expires_in() {
        assert_eq!(parse_expires_in("never").unwrap(), None);
        assert_eq!(parse_expires_in("NEVER").unwrap(), None);
        assert_eq!(parse_expires_in("1h").unwrap(), Some(Duration::hours(1)));
        assert!(parse_expires_in("soon").is_err());
    }

    #[test]
    fn test_parse_note_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_note_id(&id.to_string()).unwrap(), id);
        assert!(parse_note_id("abc").is_err());
    }
}
