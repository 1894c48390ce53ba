use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{RecurrenceError, RecurrenceResult};

/// Local date-time layouts, interpreted in the rule's timezone.
const LOCAL_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// A parsed rule date: an exact instant, or a whole local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParsedDate {
    Instant(DateTime<Tz>),
    Day(NaiveDate),
}

/// ## Summary
/// Parses one rule date in `tz`.
///
/// Accepts RFC 3339 with offset, iCalendar basic UTC (`YYYYMMDDTHHMMSSZ`),
/// local date-times and date-only values.
///
/// ## Errors
/// Returns `InvalidRule` if the text matches no layout, or names a local time
/// skipped by a DST transition.
pub(crate) fn parse_date(field: &str, text: &str, tz: Tz) -> RecurrenceResult<ParsedDate> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(ParsedDate::Instant(dt.with_timezone(&tz)));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y%m%dT%H%M%SZ") {
        return Ok(ParsedDate::Instant(
            Utc.from_utc_datetime(&naive).with_timezone(&tz),
        ));
    }

    if let Some(naive) = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return localize_strict(field, tz, naive).map(ParsedDate::Instant);
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .map(ParsedDate::Day)
        .ok_or_else(|| RecurrenceError::InvalidRule(format!("{field}: unparsable date '{text}'")))
}

/// ## Summary
/// Resolves a user-supplied local time. Ambiguous times take the earlier
/// instant; a time inside a DST gap is rejected.
///
/// ## Errors
/// Returns `InvalidRule` if `local` does not exist in `tz`.
pub(crate) fn localize_strict(
    field: &str,
    tz: Tz,
    local: NaiveDateTime,
) -> RecurrenceResult<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _latest) => Ok(earliest),
        LocalResult::None => Err(RecurrenceError::InvalidRule(format!(
            "{field}: local time {local} does not exist in {tz}"
        ))),
    }
}
