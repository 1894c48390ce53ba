use std::num::NonZeroU32;

use chrono::{DateTime, NaiveTime};
use chrono_tz::Tz;

use cadence_core::config::RecurrenceConfig;

use super::datetime::{ParsedDate, localize_strict, parse_date};
use super::fields::{DateList, IntegerField, RuleFields};
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::rfc::recur::core::{Frequency, RuleSpec, Weekday};
use crate::rfc::recur::expand::{localize, resolve_timezone};

/// Validates raw rule fields into a `RuleSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleCompiler {
    default_timezone: Tz,
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new(chrono_tz::UTC)
    }
}

impl RuleCompiler {
    /// Creates a compiler applying `default_timezone` to rules without one.
    #[must_use]
    pub fn new(default_timezone: Tz) -> Self {
        Self { default_timezone }
    }

    /// ## Summary
    /// Creates a compiler from the recurrence settings.
    ///
    /// ## Errors
    /// Returns `InvalidRule` if the configured default timezone is unknown.
    pub fn from_config(config: &RecurrenceConfig) -> RecurrenceResult<Self> {
        resolve_timezone(&config.default_timezone).map(Self::new)
    }

    #[must_use]
    pub fn default_timezone(&self) -> Tz {
        self.default_timezone
    }

    /// ## Summary
    /// Compiles `fields` into an immutable `RuleSpec`.
    ///
    /// Blank strings count as absent. Date-only values take whole-day
    /// meaning: a start at local midnight, an end or until at the last second
    /// of the day, an exception excluding the entire local day, and an
    /// inclusion at the start's time of day.
    ///
    /// ## Errors
    /// Returns `InvalidRule` if:
    /// - `frequency` is missing or not one of the seven frequencies
    /// - `start_date` is missing or unparsable
    /// - `interval` or `count` is not a positive integer
    /// - `timezone` is unknown, or a `by_day` token is not a weekday
    /// - any end, until, exception or inclusion value is unparsable
    pub fn compile(&self, fields: &RuleFields) -> RecurrenceResult<RuleSpec> {
        let tz = match non_blank(fields.timezone.as_deref()) {
            Some(tzid) => resolve_timezone(tzid)?,
            None => self.default_timezone,
        };

        let frequency = non_blank(fields.frequency.as_deref())
            .ok_or_else(|| RecurrenceError::InvalidRule("frequency is required".to_string()))?;
        let frequency = Frequency::parse(frequency).ok_or_else(|| {
            RecurrenceError::InvalidRule(format!("Unknown frequency: {frequency}"))
        })?;

        let start_text = non_blank(fields.start_date.as_deref())
            .ok_or_else(|| RecurrenceError::InvalidRule("start_date is required".to_string()))?;
        let start_date = match parse_date("start_date", start_text, tz)? {
            ParsedDate::Instant(dt) => dt,
            ParsedDate::Day(day) => {
                localize_strict("start_date", tz, day.and_time(NaiveTime::MIN))?
            }
        };

        let mut spec = RuleSpec::new(frequency, start_date);

        if let Some(interval) = resolve_integer("interval", fields.interval.as_ref())? {
            spec = spec.with_interval(interval);
        }

        if let Some(count) = resolve_integer("count", fields.count.as_ref())? {
            spec = spec.with_count(count);
        }

        if let Some(end_date) = parse_boundary("end_date", fields.end_date.as_deref(), tz)? {
            spec = spec.with_end_date(&end_date);
        }

        if let Some(until) = parse_boundary("until", fields.until.as_deref(), tz)? {
            spec = spec.with_until(&until);
        }

        if let Some(by_day) = fields.by_day.as_ref() {
            let days = by_day
                .tokens()
                .into_iter()
                .map(|token| {
                    Weekday::parse(token).ok_or_else(|| {
                        RecurrenceError::InvalidRule(format!("Unknown by_day token: {token}"))
                    })
                })
                .collect::<RecurrenceResult<Vec<_>>>()?;
            spec = spec.with_by_day(days);
        }

        for text in date_entries(fields.exceptions.as_ref()) {
            spec = match parse_date("exceptions", text, tz)? {
                ParsedDate::Instant(dt) => spec.with_exception(&dt),
                ParsedDate::Day(day) => spec.with_excluded_day(day),
            };
        }

        for text in date_entries(fields.inclusions.as_ref()) {
            let inclusion = match parse_date("inclusions", text, tz)? {
                ParsedDate::Instant(dt) => dt,
                ParsedDate::Day(day) => {
                    let local = day.and_time(start_date.naive_local().time());
                    localize(tz, local).ok_or_else(|| {
                        RecurrenceError::InvalidRule(format!(
                            "inclusions: {day} cannot be resolved in {tz}"
                        ))
                    })?
                }
            };
            spec = spec.with_inclusion(&inclusion);
        }

        tracing::debug!(
            rule = %spec,
            timezone = %tz,
            start = %spec.start_date(),
            exceptions = spec.exceptions().len() + spec.excluded_days().len(),
            inclusions = spec.inclusions().len(),
            "Compiled recurrence rule"
        );

        Ok(spec)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn resolve_integer(
    field: &str,
    value: Option<&IntegerField>,
) -> RecurrenceResult<Option<NonZeroU32>> {
    Ok(value.map(|value| value.resolve(field)).transpose()?.flatten())
}

fn date_entries(list: Option<&DateList>) -> Vec<&str> {
    list.map(DateList::entries).unwrap_or_default()
}

/// Last second of a local day, the time a date-only end boundary resolves to.
const END_OF_DAY: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(time) => time,
    None => panic!("23:59:59 is a valid time of day"),
};

/// An end boundary; a date-only value covers its whole local day.
fn parse_boundary(
    field: &str,
    text: Option<&str>,
    tz: Tz,
) -> RecurrenceResult<Option<DateTime<Tz>>> {
    let Some(text) = non_blank(text) else {
        return Ok(None);
    };

    match parse_date(field, text, tz)? {
        ParsedDate::Instant(dt) => Ok(Some(dt)),
        ParsedDate::Day(day) => localize_strict(field, tz, day.and_time(END_OF_DAY)).map(Some),
    }
}
