//! Immutable description of one recurrence rule.

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use super::{Frequency, Weekday};

/// ## Summary
/// A compiled recurrence rule.
///
/// Every temporal field is held in `timezone`; values handed to the `with_*`
/// constructors are converted on the way in. Once built, a `RuleSpec` is never
/// mutated and can be shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    start_date: DateTime<Tz>,
    end_date: Option<DateTime<Tz>>,
    until: Option<DateTime<Tz>>,
    timezone: Tz,
    frequency: Frequency,
    interval: NonZeroU32,
    count: Option<NonZeroU32>,
    by_day: BTreeSet<Weekday>,
    exceptions: BTreeSet<DateTime<Tz>>,
    excluded_days: BTreeSet<NaiveDate>,
    inclusions: BTreeSet<DateTime<Tz>>,
}

impl RuleSpec {
    /// Creates a rule anchored at `start_date`, in the start date's timezone.
    #[must_use]
    pub fn new(frequency: Frequency, start_date: DateTime<Tz>) -> Self {
        Self {
            timezone: start_date.timezone(),
            start_date,
            end_date: None,
            until: None,
            frequency,
            interval: NonZeroU32::MIN,
            count: None,
            by_day: BTreeSet::new(),
            exceptions: BTreeSet::new(),
            excluded_days: BTreeSet::new(),
            inclusions: BTreeSet::new(),
        }
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: NonZeroU32) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the count.
    #[must_use]
    pub fn with_count(mut self, count: NonZeroU32) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the end date.
    #[must_use]
    pub fn with_end_date<Z: TimeZone>(mut self, end_date: &DateTime<Z>) -> Self {
        self.end_date = Some(end_date.with_timezone(&self.timezone));
        self
    }

    /// Sets the until boundary.
    #[must_use]
    pub fn with_until<Z: TimeZone>(mut self, until: &DateTime<Z>) -> Self {
        self.until = Some(until.with_timezone(&self.timezone));
        self
    }

    /// Adds weekdays to the by-day filter.
    #[must_use]
    pub fn with_by_day(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.by_day.extend(days);
        self
    }

    /// Adds an excluded instant.
    #[must_use]
    pub fn with_exception<Z: TimeZone>(mut self, exception: &DateTime<Z>) -> Self {
        self.exceptions.insert(exception.with_timezone(&self.timezone));
        self
    }

    /// Excludes every occurrence falling on a local calendar date.
    #[must_use]
    pub fn with_excluded_day(mut self, day: NaiveDate) -> Self {
        self.excluded_days.insert(day);
        self
    }

    /// Adds an included instant.
    #[must_use]
    pub fn with_inclusion<Z: TimeZone>(mut self, inclusion: &DateTime<Z>) -> Self {
        self.inclusions.insert(inclusion.with_timezone(&self.timezone));
        self
    }

    #[must_use]
    pub fn start_date(&self) -> DateTime<Tz> {
        self.start_date
    }

    #[must_use]
    pub fn end_date(&self) -> Option<DateTime<Tz>> {
        self.end_date
    }

    #[must_use]
    pub fn until(&self) -> Option<DateTime<Tz>> {
        self.until
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub fn interval(&self) -> NonZeroU32 {
        self.interval
    }

    #[must_use]
    pub fn count(&self) -> Option<NonZeroU32> {
        self.count
    }

    #[must_use]
    pub fn by_day(&self) -> &BTreeSet<Weekday> {
        &self.by_day
    }

    #[must_use]
    pub fn exceptions(&self) -> &BTreeSet<DateTime<Tz>> {
        &self.exceptions
    }

    #[must_use]
    pub fn excluded_days(&self) -> &BTreeSet<NaiveDate> {
        &self.excluded_days
    }

    #[must_use]
    pub fn inclusions(&self) -> &BTreeSet<DateTime<Tz>> {
        &self.inclusions
    }

    /// ## Summary
    /// The single authoritative end boundary: the earlier of `end_date` and `until`.
    #[must_use]
    pub fn end_boundary(&self) -> Option<DateTime<Tz>> {
        match (self.end_date, self.until) {
            (Some(end), Some(until)) => Some(end.min(until)),
            (end, until) => end.or(until),
        }
    }

    /// A series is finite when a count or an end boundary caps the rule.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.count.is_some() || self.end_boundary().is_some()
    }

    /// ## Summary
    /// Returns true if a rule-generated instant is removed by an exception,
    /// either as an exact instant or by its local calendar date.
    #[must_use]
    pub fn is_excluded(&self, instant: &DateTime<Tz>) -> bool {
        self.exceptions.contains(instant) || self.excluded_days.contains(&instant.date_naive())
    }

    /// Returns true if the instant's local weekday passes the by-day filter.
    #[must_use]
    pub fn matches_by_day(&self, instant: &DateTime<Tz>) -> bool {
        use chrono::Datelike;

        self.by_day.is_empty() || self.by_day.contains(&Weekday::from(instant.weekday()))
    }
}

/// Renders the rule as RFC 5545 RRULE text.
impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency)?;

        if self.interval.get() > 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }

        if let Some(count) = self.count {
            write!(f, ";COUNT={count}")?;
        }

        if let Some(end) = self.end_boundary() {
            write!(
                f,
                ";UNTIL={}",
                end.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ")
            )?;
        }

        if !self.by_day.is_empty() {
            let days: Vec<_> = self.by_day.iter().copied().map(Weekday::as_str).collect();
            write!(f, ";BYDAY={}", days.join(","))?;
        }

        Ok(())
    }
}
