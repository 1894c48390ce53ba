//! Timezone identifier resolution for rule and settings timezones.

use std::str::FromStr;

use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

use crate::error::{RecurrenceError, RecurrenceResult};

/// Vendor prefixes some calendar clients put in front of IANA names.
const VENDOR_PREFIXES: [&str; 2] = ["/mozilla.org/", "/softwarestudio.org/"];

/// ## Summary
/// Resolves a rule or settings timezone identifier to a `chrono_tz::Tz`.
///
/// Identifiers chrono-tz knows resolve directly; anything else goes through
/// `normalize_tzid` first.
///
/// ## Errors
///
/// Returns `RecurrenceError::InvalidRule` if the identifier cannot be resolved.
pub fn resolve_timezone(tzid: &str) -> RecurrenceResult<Tz> {
    let trimmed = tzid.trim();
    Tz::from_str(trimmed)
        .or_else(|_| Tz::from_str(&normalize_tzid(trimmed)))
        .map_err(|_e| RecurrenceError::InvalidRule(format!("Unknown timezone: {tzid}")))
}

/// ## Summary
/// Maps a timezone identifier to its canonical IANA name.
///
/// Handles vendor-prefixed identifiers, Windows zone names
/// (`W. Europe Standard Time`) and IANA aliases (`US/Eastern`). Unrecognized
/// identifiers come back without their prefix and otherwise unchanged.
#[must_use]
pub fn normalize_tzid(tzid: &str) -> String {
    let name = VENDOR_PREFIXES
        .iter()
        .find_map(|prefix| tzid.strip_prefix(prefix))
        .unwrap_or(tzid);

    windows_zone(name)
        .or_else(|| iana_alias(name))
        .unwrap_or_else(|| name.to_string())
}

/// Canonical IANA name of a Windows zone name, via its BCP-47 zone.
fn windows_zone(name: &str) -> Option<String> {
    let zone = WindowsParser::new().parse(name, None)?;
    IanaParserExtended::new()
        .iter()
        .find(|entry| entry.time_zone == zone)
        .map(|entry| entry.canonical.to_string())
}

/// Canonical IANA name of an IANA identifier or alias (`Europe/Kiev`).
fn iana_alias(name: &str) -> Option<String> {
    let parsed = IanaParserExtended::new().parse(name);
    (parsed.time_zone != icu::time::TimeZone::UNKNOWN).then(|| parsed.canonical.to_string())
}
