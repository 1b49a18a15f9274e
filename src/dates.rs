use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a datetime in any of the formats the simulation and its
/// configuration files use.
///
/// Accepts `1958-01-01T00:00:00`, `1958-01-01 00:00:00`, and bare
/// `1958-01-01` dates, which anchor to midnight. Returns `None` when parsing
/// fails.
pub fn parse_forcing_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    None
}
