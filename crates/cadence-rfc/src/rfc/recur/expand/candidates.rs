//! Raw rule candidates: stepping, clamping, by-day handling and termination.

use std::collections::VecDeque;

use chrono::{DateTime, Datelike, Days, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;

use super::calendar::{add_months, localize};
use crate::rfc::recur::core::{Frequency, RuleSpec};

/// ## Summary
/// Lazily generates the instants a rule implies, in ascending order.
///
/// Candidate `k` is computed from the anchor (`start + k * interval` units)
/// rather than from candidate `k - 1`, so a clamped month never drags later
/// months down with it. Exceptions, inclusions and the window start are
/// applied downstream; this iterator only stops on `count`, the end boundary,
/// the window end, calendar overflow or the iteration ceiling.
///
/// A rule without a count may start at a later period (`resume_at`): nothing
/// before that instant is needed, and the phase stays anchored on the start.
///
/// The ceiling is charged for every step walked since the last candidate that
/// counted toward `count`. Rules without a count never reset it.
pub(crate) struct Candidates<'a> {
    spec: &'a RuleSpec,
    anchor: NaiveDateTime,
    /// Earliest of the rule's end boundary and the window end.
    stop_after: Option<DateTime<Tz>>,
    max_iterations: u64,
    period: u64,
    steps: u64,
    charged: u64,
    pending: VecDeque<DateTime<Tz>>,
    produced: u32,
    finished: bool,
    limit_reached: bool,
}

impl<'a> Candidates<'a> {
    pub(crate) fn new(
        spec: &'a RuleSpec,
        resume_at: Option<DateTime<Tz>>,
        window_end: Option<DateTime<Tz>>,
        max_iterations: u64,
    ) -> Self {
        let stop_after = match (spec.end_boundary(), window_end) {
            (Some(end), Some(window_end)) => Some(end.min(window_end)),
            (end, window_end) => end.or(window_end),
        };

        let mut candidates = Self {
            spec,
            anchor: spec.start_date().naive_local(),
            stop_after,
            max_iterations,
            period: 0,
            steps: 0,
            charged: 0,
            pending: VecDeque::new(),
            produced: 0,
            finished: false,
            limit_reached: false,
        };

        // With a count every earlier candidate has to be seen to be counted
        if let Some(instant) = resume_at.filter(|_| spec.count().is_none()) {
            candidates.period = candidates.period_reaching(instant);
        }
        candidates
    }

    /// True once the iteration ceiling cut the sequence short.
    pub(crate) fn limit_reached(&self) -> bool {
        self.limit_reached
    }

    /// Number of cursor steps walked so far.
    pub(crate) fn iterations(&self) -> u64 {
        self.steps
    }

    /// ## Summary
    /// A period from which stepping still yields every candidate at or after
    /// `instant`.
    ///
    /// Estimated from the distance between the anchor and `instant` in the
    /// rule's own unit, then backed off two periods so that clamping and DST
    /// shifts cannot push a skipped candidate past `instant`.
    fn period_reaching(&self, instant: DateTime<Tz>) -> u64 {
        let frequency = self.spec.frequency();

        let units = if frequency.is_sub_daily() {
            (instant - self.spec.start_date()).num_seconds() / clock_unit_seconds(frequency)
        } else {
            let target = instant.with_timezone(&self.spec.timezone()).naive_local();
            let years = i64::from(target.year()) - i64::from(self.anchor.year());
            let days = (target.date() - self.anchor.date()).num_days();
            match frequency {
                Frequency::Yearly => years,
                Frequency::Monthly => {
                    years * 12 + i64::from(target.month()) - i64::from(self.anchor.month())
                }
                Frequency::Weekly if !self.spec.by_day().is_empty() => {
                    let offset = i64::from(self.anchor.weekday().num_days_from_monday());
                    (days + offset).div_euclid(7)
                }
                Frequency::Weekly => days.div_euclid(7),
                _ => days,
            }
        };

        let periods = units.div_euclid(i64::from(self.spec.interval().get()));
        u64::try_from(periods.saturating_sub(2)).unwrap_or(0)
    }

    /// ## Summary
    /// Builds the candidates of one cursor step, already filtered by weekday.
    ///
    /// Returns `None` when the step cannot be represented (calendar overflow),
    /// which ends the sequence.
    fn period_candidates(&self, period: u64) -> Option<VecDeque<DateTime<Tz>>> {
        let step = period.checked_mul(u64::from(self.spec.interval().get()))?;
        let frequency = self.spec.frequency();
        let tz = self.spec.timezone();

        let candidate = if frequency.is_sub_daily() {
            let seconds = i64::try_from(step)
                .ok()?
                .checked_mul(clock_unit_seconds(frequency))?;
            self.spec
                .start_date()
                .checked_add_signed(TimeDelta::try_seconds(seconds)?)
        } else {
            match frequency {
                Frequency::Yearly => localize(tz, add_months(self.anchor, step.checked_mul(12)?)?),
                Frequency::Monthly => localize(tz, add_months(self.anchor, step)?),
                Frequency::Weekly if !self.spec.by_day().is_empty() => {
                    return self.week_candidates(step);
                }
                Frequency::Weekly => {
                    let days = Days::new(step.checked_mul(7)?);
                    localize(tz, self.anchor.checked_add_days(days)?)
                }
                _ => localize(tz, self.anchor.checked_add_days(Days::new(step))?),
            }
        };

        Some(
            candidate
                .filter(|dt| self.spec.matches_by_day(dt))
                .into_iter()
                .collect(),
        )
    }

    /// ## Summary
    /// Expands one week (Monday based) into one candidate per by-day weekday,
    /// at the anchor's time of day.
    fn week_candidates(&self, step: u64) -> Option<VecDeque<DateTime<Tz>>> {
        let anchor_date = self.anchor.date();
        let week_start = anchor_date
            .checked_sub_days(Days::new(u64::from(
                anchor_date.weekday().num_days_from_monday(),
            )))?
            .checked_add_days(Days::new(step.checked_mul(7)?))?;

        let mut week = VecDeque::with_capacity(self.spec.by_day().len());
        for weekday in self.spec.by_day() {
            let date = week_start.checked_add_days(Days::new(weekday.days_from_monday()))?;
            week.extend(localize(self.spec.timezone(), date.and_time(self.anchor.time())));
        }
        Some(week)
    }
}

/// Length of one sub-daily unit in seconds.
fn clock_unit_seconds(frequency: Frequency) -> i64 {
    match frequency {
        Frequency::Hourly => 3_600,
        Frequency::Minutely => 60,
        _ => 1,
    }
}

impl Iterator for Candidates<'_> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if self
                .spec
                .count()
                .is_some_and(|count| self.produced >= count.get())
            {
                self.finished = true;
                return None;
            }

            if let Some(candidate) = self.pending.pop_front() {
                // Only the first week can hold days before the anchor
                if candidate < self.spec.start_date() {
                    continue;
                }
                // Candidates are non-decreasing, so a bound violation is final
                if self.stop_after.is_some_and(|end| candidate > end) {
                    self.finished = true;
                    return None;
                }
                self.produced += 1;
                if self.spec.count().is_some() {
                    self.charged = 0;
                }
                return Some(candidate);
            }

            if self.charged >= self.max_iterations {
                tracing::warn!(
                    rule = %self.spec,
                    max_iterations = self.max_iterations,
                    steps = self.steps,
                    produced = self.produced,
                    "Recurrence expansion hit the iteration ceiling"
                );
                self.finished = true;
                self.limit_reached = true;
                return None;
            }

            if let Some(candidates) = self.period_candidates(self.period) {
                self.pending = candidates;
                self.period += 1;
                self.steps += 1;
                self.charged += 1;
            } else {
                tracing::trace!(period = self.period, "Calendar overflow, ending series");
                self.finished = true;
            }
        }
    }
}
