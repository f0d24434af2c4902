//! Timestamp parsing for request bodies.
//!
//! Stations send naive local times (`2025-06-05T10:30:00`, optionally with a
//! space separator or fractional seconds), but browser front-ends often send
//! RFC 3339 with `Z` or an offset. Offset times are converted to local time,
//! which is what the database stores.

use chrono::{DateTime, Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a naive or offset timestamp into local time.
pub fn parse(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local())
        })
}

/// Drop sub-second precision; timestamps are stored to the second.
pub fn to_storage_precision(dt: NaiveDateTime) -> NaiveDateTime {
    dt.trunc_subsecs(0)
}

/// `deserialize_with` helper for optional timestamps; blank strings count
/// as absent.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn naive_forms_are_taken_as_local() {
        assert_eq!(parse("2025-06-05T10:30:00"), Some(at(10, 30, 0)));
        assert_eq!(parse("2025-06-05 10:30:00"), Some(at(10, 30, 0)));
        assert_eq!(
            parse("2025-06-05T10:30:00.250").map(to_storage_precision),
            Some(at(10, 30, 0))
        );
    }

    #[test]
    fn offset_forms_convert_to_local() {
        let expected = Utc
            .from_utc_datetime(&at(10, 30, 0))
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse("2025-06-05T10:30:00Z"), Some(expected));
        assert_eq!(parse("2025-06-05T12:30:00+02:00"), Some(expected));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse("yesterday"), None);
        assert_eq!(parse("2025-13-05T10:30:00"), None);
    }

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "deserialize_option")]
        when: Option<NaiveDateTime>,
    }

    #[test]
    fn deserializer_handles_missing_blank_and_invalid() {
        let body: Body = serde_json::from_str("{}").unwrap();
        assert!(body.when.is_none());
        let body: Body = serde_json::from_str(r#"{"when": ""}"#).unwrap();
        assert!(body.when.is_none());
        let body: Body = serde_json::from_str(r#"{"when": null}"#).unwrap();
        assert!(body.when.is_none());
        assert!(serde_json::from_str::<Body>(r#"{"when": "soon"}"#).is_err());
    }
}
