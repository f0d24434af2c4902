//! Repository layer: entity-scoped database operations.
//!
//! Plain functions over `&Connection`; callers decide transaction scope.

mod component;
mod detection;

use chrono::NaiveDateTime;

/// Storage format for all timestamps.
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_datetime(
    column: usize,
    raw: Option<String>,
) -> Result<Option<NaiveDateTime>, rusqlite::Error> {
    raw.map(|s| {
        NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

pub(crate) fn parse_enum<T>(column: usize, raw: &str) -> Result<T, rusqlite::Error>
where
    T: std::str::FromStr<Err = super::DatabaseError>,
{
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub use component::*;
pub use detection::*;
