//! Positional queries over one rule's occurrences.

use std::sync::OnceLock;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::core::{Frequency, RuleSpec};
use super::expand::{OccurrenceEngine, Occurrences};
use crate::error::{RecurrenceError, RecurrenceResult};

/// ## Summary
/// Read-only façade answering `first`, `last`, `next`, `current` and
/// `between` for a single `RuleSpec`.
///
/// Every query returns `Ok(None)` (or an empty list) on an empty series.
/// Errors surface only for `UnboundedSeries` and `IterationLimit`.
#[derive(Debug)]
pub struct ScheduleView<'a> {
    spec: &'a RuleSpec,
    engine: OccurrenceEngine,
    expansion: OnceLock<Vec<DateTime<Tz>>>,
}

impl<'a> ScheduleView<'a> {
    /// Creates a view using an engine with default options.
    #[must_use]
    pub fn new(spec: &'a RuleSpec) -> Self {
        Self::with_engine(spec, OccurrenceEngine::default())
    }

    #[must_use]
    pub fn with_engine(spec: &'a RuleSpec, engine: OccurrenceEngine) -> Self {
        Self {
            spec,
            engine,
            expansion: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn spec(&self) -> &'a RuleSpec {
        self.spec
    }

    /// ## Summary
    /// Earliest occurrence.
    ///
    /// ## Errors
    /// Returns `IterationLimit` if the ceiling is hit before any occurrence.
    pub fn first(&self) -> RecurrenceResult<Option<DateTime<Tz>>> {
        self.find(self.engine.occurrences(self.spec, None), |_| true)
    }

    /// ## Summary
    /// Latest occurrence.
    ///
    /// ## Errors
    /// Returns `UnboundedSeries` if the series has no count and no end
    /// boundary, or `IterationLimit` if the expansion hits the ceiling.
    pub fn last(&self) -> RecurrenceResult<Option<DateTime<Tz>>> {
        Ok(self.all()?.last().copied())
    }

    /// ## Summary
    /// Earliest occurrence strictly after now.
    ///
    /// ## Errors
    /// Returns `IterationLimit` if the ceiling is hit first.
    pub fn next(&self) -> RecurrenceResult<Option<DateTime<Tz>>> {
        self.next_after(&Utc::now())
    }

    /// ## Summary
    /// Earliest occurrence strictly after `instant`.
    ///
    /// ## Errors
    /// Returns `IterationLimit` if the ceiling is hit first.
    pub fn next_after<Z: TimeZone>(
        &self,
        instant: &DateTime<Z>,
    ) -> RecurrenceResult<Option<DateTime<Tz>>> {
        let instant = instant.with_timezone(&Utc);
        self.find(self.engine.occurrences_from(self.spec, &instant), |occurrence| {
            *occurrence > instant
        })
    }

    /// ## Summary
    /// Latest occurrence at or before now.
    ///
    /// ## Errors
    /// Returns `IterationLimit` if the ceiling is hit first.
    pub fn current(&self) -> RecurrenceResult<Option<DateTime<Tz>>> {
        self.current_at(&Utc::now())
    }

    /// ## Summary
    /// Latest occurrence at or before `instant`.
    ///
    /// A rule with a count is scanned from its start. Otherwise the search
    /// looks back from `instant` one rule period at first, doubling the
    /// lookback until an occurrence turns up or the series start is covered.
    ///
    /// ## Errors
    /// Returns `IterationLimit` if a scan walks more cursor steps than the
    /// ceiling allows.
    pub fn current_at<Z: TimeZone>(
        &self,
        instant: &DateTime<Z>,
    ) -> RecurrenceResult<Option<DateTime<Tz>>> {
        let instant = instant.with_timezone(&Utc);

        if self.spec.count().is_some() {
            return self.latest_until(self.engine.occurrences(self.spec, None), instant);
        }

        let start = self.spec.start_date();
        let earliest = self
            .spec
            .inclusions()
            .first()
            .map_or(start, |inclusion| start.min(*inclusion));

        let mut lookback = nominal_period(self.spec);
        loop {
            let from = instant
                .checked_sub_signed(lookback)
                .filter(|from| *from > earliest);
            let Some(from) = from else {
                return self.latest_until(self.engine.occurrences(self.spec, None), instant);
            };

            let latest =
                self.latest_until(self.engine.occurrences_from(self.spec, &from), instant)?;
            if latest.is_some() {
                return Ok(latest);
            }
            lookback = lookback.checked_mul(2).unwrap_or(TimeDelta::MAX);
        }
    }

    /// ## Summary
    /// All occurrences in `[start, end]`, both inclusive.
    ///
    /// ## Errors
    /// Returns `IterationLimit` if the expansion hits the ceiling.
    pub fn between<A: TimeZone, B: TimeZone>(
        &self,
        start: &DateTime<A>,
        end: &DateTime<B>,
    ) -> RecurrenceResult<Vec<DateTime<Tz>>> {
        self.engine.expand_between(self.spec, start, end)
    }

    /// ## Summary
    /// The full expansion, computed once and cached in the view.
    ///
    /// ## Errors
    /// Returns `UnboundedSeries` or `IterationLimit` as `OccurrenceEngine::expand`.
    pub fn all(&self) -> RecurrenceResult<&[DateTime<Tz>]> {
        if let Some(expansion) = self.expansion.get() {
            return Ok(expansion);
        }
        let expansion = self.engine.expand(self.spec, None)?;
        Ok(self.expansion.get_or_init(|| expansion))
    }

    fn find(
        &self,
        mut occurrences: Occurrences<'_>,
        predicate: impl Fn(&DateTime<Tz>) -> bool,
    ) -> RecurrenceResult<Option<DateTime<Tz>>> {
        let found = occurrences.find(predicate);
        if found.is_none() {
            self.check_limit(&occurrences)?;
        }
        Ok(found)
    }

    fn latest_until(
        &self,
        mut occurrences: Occurrences<'_>,
        instant: DateTime<Utc>,
    ) -> RecurrenceResult<Option<DateTime<Tz>>> {
        let latest = occurrences
            .by_ref()
            .take_while(|occurrence| *occurrence <= instant)
            .last();
        self.check_limit(&occurrences)?;
        Ok(latest)
    }

    fn check_limit(&self, occurrences: &Occurrences<'_>) -> RecurrenceResult<()> {
        if occurrences.limit_reached() {
            return Err(RecurrenceError::IterationLimit(
                self.engine.options().max_iterations,
            ));
        }
        Ok(())
    }
}

/// Approximate length of one rule period, the first lookback of `current_at`.
fn nominal_period(spec: &RuleSpec) -> TimeDelta {
    let unit = match spec.frequency() {
        Frequency::Yearly => TimeDelta::days(366),
        Frequency::Monthly => TimeDelta::days(31),
        Frequency::Weekly => TimeDelta::weeks(1),
        Frequency::Daily => TimeDelta::days(1),
        Frequency::Hourly => TimeDelta::hours(1),
        Frequency::Minutely => TimeDelta::minutes(1),
        Frequency::Secondly => TimeDelta::seconds(1),
    };
    i32::try_from(spec.interval().get())
        .ok()
        .and_then(|interval| unit.checked_mul(interval))
        .unwrap_or(TimeDelta::MAX)
}
