//! Wall-clock calendar arithmetic.

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

/// ## Summary
/// Adds `months` calendar months to `anchor`, clamping the day to the last
/// valid day of the target month (Jan 31 + 1 month = Feb 28/29).
///
/// Returns `None` if the result leaves chrono's representable range.
pub(crate) fn add_months(anchor: NaiveDateTime, months: u64) -> Option<NaiveDateTime> {
    let total_months = u64::from(anchor.month0()).checked_add(months)?;
    let new_year = anchor
        .year()
        .checked_add(i32::try_from(total_months / 12).ok()?)?;
    let new_month = u32::try_from(total_months % 12).ok()? + 1;

    // Handle day overflow (e.g., Jan 31 + 1 month = Feb 28/29)
    let max_day = days_in_month(new_year, new_month);
    let new_day = anchor.day().min(max_day);

    NaiveDate::from_ymd_opt(new_year, new_month, new_day).map(|date| date.and_time(anchor.time()))
}

/// Returns the number of days in a month.
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .map_or(31, |d| d.pred_opt().map_or(31, |p| p.day()))
}

/// ## Summary
/// Resolves a stepped wall-clock time in `tz`.
///
/// An ambiguous time (DST fold) resolves to the earlier instant. A time in a
/// DST gap is shifted forward by one hour; if that still does not exist the
/// candidate is dropped.
pub(crate) fn localize(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _latest) => Some(earliest),
        LocalResult::None => {
            let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
            tz.from_local_datetime(&shifted).earliest()
        }
    }
}
