use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;

use crate::error::RecurrenceResult;
use crate::rfc::recur::core::{RuleSpec, Weekday};
use crate::rfc::recur::expand::localize;

impl RuleSpec {
    /// ## Summary
    /// Builds the equivalent RFC 5545 recurrence set for consumers that speak
    /// iCalendar.
    ///
    /// The set follows RFC semantics: month days that do not exist are
    /// skipped rather than clamped, so monthly and yearly rules anchored past
    /// the 28th diverge from `OccurrenceEngine`. When both `count` and an end
    /// boundary are set, the RRULE carries `COUNT` and the boundary is applied
    /// to the set with `before`.
    ///
    /// ## Errors
    /// Returns `RRuleError` if the `rrule` crate rejects the generated set.
    pub fn to_rrule_set(&self) -> RecurrenceResult<RRuleSet> {
        let text = self.rrule_set_text();
        tracing::trace!(rruleset = %text, "Building RRuleSet");

        let set = text.parse::<RRuleSet>()?;
        let tz = rrule::Tz::from(self.timezone());
        Ok(match (self.count(), self.end_boundary()) {
            (Some(_), Some(end)) => set.before(end.with_timezone(&tz)),
            _ => set,
        })
    }

    /// ## Summary
    /// Renders `DTSTART`, `RRULE`, `EXDATE` and `RDATE` lines. Excluded days
    /// become exclusions at the start's time of day.
    fn rrule_set_text(&self) -> String {
        let start = self.start_date();

        let mut rule = vec![format!("FREQ={}", self.frequency())];
        if self.interval().get() > 1 {
            rule.push(format!("INTERVAL={}", self.interval()));
        }
        match (self.count(), self.end_boundary()) {
            (Some(count), _) => rule.push(format!("COUNT={count}")),
            (None, Some(end)) => rule.push(format!("UNTIL={}", utc_basic(&end))),
            (None, None) => {}
        }
        if !self.by_day().is_empty() {
            let days: Vec<_> = self.by_day().iter().copied().map(Weekday::as_str).collect();
            rule.push(format!("BYDAY={}", days.join(",")));
        }

        let dtstart = if self.timezone() == chrono_tz::UTC {
            format!("DTSTART:{}", utc_basic(&start))
        } else {
            format!(
                "DTSTART;TZID={}:{}",
                self.timezone().name(),
                start.naive_local().format("%Y%m%dT%H%M%S")
            )
        };
        let mut lines = vec![dtstart, format!("RRULE:{}", rule.join(";"))];

        let time_of_day = start.naive_local().time();
        let exdates: Vec<String> = self
            .exceptions()
            .iter()
            .copied()
            .chain(
                self.excluded_days()
                    .iter()
                    .filter_map(|day| localize(self.timezone(), day.and_time(time_of_day))),
            )
            .map(|dt| utc_basic(&dt))
            .collect();
        if !exdates.is_empty() {
            lines.push(format!("EXDATE:{}", exdates.join(",")));
        }

        let rdates: Vec<String> = self.inclusions().iter().map(utc_basic).collect();
        if !rdates.is_empty() {
            lines.push(format!("RDATE:{}", rdates.join(",")));
        }

        lines.join("\n")
    }
}

fn utc_basic(dt: &DateTime<Tz>) -> String {
    dt.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}
