use cadence_core::config::RecurrenceConfig;
use cadence_core::constants::DEFAULT_MAX_ITERATIONS;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

use super::{Occurrences, Window};
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::rfc::recur::core::RuleSpec;

/// Options for recurrence expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionOptions {
    /// Maximum number of cursor steps one expansion may walk without a
    /// candidate counting toward the rule's `count`.
    pub max_iterations: u64,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS, // Default limit to prevent runaway expansion
        }
    }
}

impl ExpansionOptions {
    /// Takes the iteration ceiling from the recurrence settings.
    #[must_use]
    pub fn from_config(config: &RecurrenceConfig) -> Self {
        Self {
            max_iterations: config.max_iterations,
        }
    }

    /// Sets the iteration ceiling.
    #[must_use]
    pub fn with_max_iterations(mut self, max: u64) -> Self {
        self.max_iterations = max;
        self
    }
}

/// ## Summary
/// Expands compiled rules into occurrence instants.
///
/// The engine holds only its options; every call is a pure function of the
/// `RuleSpec` and window it is given, so one engine can serve many threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OccurrenceEngine {
    options: ExpansionOptions,
}

impl OccurrenceEngine {
    /// Creates an engine with the given options.
    #[must_use]
    pub fn new(options: ExpansionOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn options(&self) -> ExpansionOptions {
        self.options
    }

    /// ## Summary
    /// Returns the lazy occurrence sequence of `spec`, optionally restricted
    /// to `window`. Works for unbounded rules; the caller decides how much to
    /// consume.
    #[must_use]
    pub fn occurrences<'a>(&self, spec: &'a RuleSpec, window: Option<Window>) -> Occurrences<'a> {
        Occurrences::new(spec, window, self.options.max_iterations)
    }

    /// ## Summary
    /// Returns the lazy occurrence sequence of `spec` from `start` (inclusive)
    /// onwards. A rule without a count starts stepping near `start` instead
    /// of at its anchor.
    #[must_use]
    pub fn occurrences_from<'a, Z: TimeZone>(
        &self,
        spec: &'a RuleSpec,
        start: &DateTime<Z>,
    ) -> Occurrences<'a> {
        Occurrences::starting_at(
            spec,
            start.with_timezone(&spec.timezone()),
            self.options.max_iterations,
        )
    }

    /// ## Summary
    /// Expands a rule into its full, strictly ascending occurrence list.
    ///
    /// An empty list is a valid outcome, not an error.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - No window is given and the rule has neither a count nor an end boundary
    ///   (`UnboundedSeries`)
    /// - The expansion walks more cursor steps than the safety ceiling allows
    ///   (`IterationLimit`)
    pub fn expand(
        &self,
        spec: &RuleSpec,
        window: Option<Window>,
    ) -> RecurrenceResult<Vec<DateTime<Tz>>> {
        if window.is_none() && !spec.is_bounded() {
            return Err(RecurrenceError::UnboundedSeries);
        }

        let mut occurrences = self.occurrences(spec, window);
        let result: Vec<_> = occurrences.by_ref().collect();

        if occurrences.limit_reached() {
            return Err(RecurrenceError::IterationLimit(self.options.max_iterations));
        }

        tracing::trace!(
            rule = %spec,
            iterations = occurrences.iterations(),
            occurrences = result.len(),
            windowed = window.is_some(),
            "Expanded recurrence rule"
        );

        Ok(result)
    }

    /// ## Summary
    /// Expands a rule restricted to `[start, end]` (both inclusive).
    ///
    /// Interval stepping and `count` stay anchored to the rule's start date.
    /// A rule without a count skips ahead to the window start; a counted rule
    /// is walked from its start.
    ///
    /// ## Errors
    ///
    /// Returns `IterationLimit` if covering the window walks more cursor steps
    /// than the safety ceiling allows.
    pub fn expand_between<A: TimeZone, B: TimeZone>(
        &self,
        spec: &RuleSpec,
        start: &DateTime<A>,
        end: &DateTime<B>,
    ) -> RecurrenceResult<Vec<DateTime<Tz>>> {
        self.expand(spec, Some(Window::new(start, end)))
    }
}
