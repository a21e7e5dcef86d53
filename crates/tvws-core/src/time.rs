// Timestamp parsing and UTC coercion.
//
// User-facing timestamps arrive in local wall-clock convention (the
// datetime-picker shape `2025-01-20T14:30`) or as full RFC 3339 instants.
// The wire contract always carries absolute ISO-8601 UTC.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Parse a user-supplied timestamp string.
///
/// Accepts RFC 3339 (offset preserved), `YYYY-MM-DDTHH:MM:SS`, and the
/// minute-precision `YYYY-MM-DDTHH:MM`. Naive forms are interpreted in
/// the local timezone.
pub(crate) fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .map_err(|_| format!("unrecognized timestamp: '{input}'"))?;

    Ok(local_to_utc(naive))
}

/// Interpret a naive local wall-clock time as a UTC instant.
///
/// Ambiguous local times (DST fold) resolve to the earlier instant; a
/// nonexistent local time (DST gap) falls back to reading the value as
/// UTC directly.
pub(crate) fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| Utc.from_utc_datetime(&naive), |dt| dt.with_timezone(&Utc))
}

/// Render an instant in the wire format: second precision, `Z` suffix.
pub(crate) fn to_wire(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}
