use std::iter::Peekable;

use chrono::DateTime;
use chrono_tz::Tz;

use super::Window;
use super::candidates::Candidates;
use crate::rfc::recur::core::RuleSpec;

type Inclusions<'a> = Peekable<Box<dyn Iterator<Item = DateTime<Tz>> + Send + 'a>>;

/// ## Summary
/// Lazy, strictly ascending occurrence sequence of one rule.
///
/// Merges the rule's candidates with its inclusions, drops excepted
/// candidates and everything outside the window. An inclusion that coincides
/// with an exception is kept: inclusions win ties.
pub struct Occurrences<'a> {
    spec: &'a RuleSpec,
    candidates: Candidates<'a>,
    candidate: Option<DateTime<Tz>>,
    inclusions: Inclusions<'a>,
    window_start: Option<DateTime<Tz>>,
    last: Option<DateTime<Tz>>,
}

impl<'a> Occurrences<'a> {
    /// Occurrences within `window`, or the whole series without one.
    pub(crate) fn new(spec: &'a RuleSpec, window: Option<Window>, max_iterations: u64) -> Self {
        let tz = spec.timezone();
        Self::bounded(
            spec,
            window.map(|w| w.start.with_timezone(&tz)),
            window.map(|w| w.end.with_timezone(&tz)),
            max_iterations,
        )
    }

    /// Occurrences at or after `start`, with no upper bound.
    pub(crate) fn starting_at(
        spec: &'a RuleSpec,
        start: DateTime<Tz>,
        max_iterations: u64,
    ) -> Self {
        Self::bounded(spec, Some(start), None, max_iterations)
    }

    fn bounded(
        spec: &'a RuleSpec,
        window_start: Option<DateTime<Tz>>,
        window_end: Option<DateTime<Tz>>,
        max_iterations: u64,
    ) -> Self {
        let inclusions: Box<dyn Iterator<Item = DateTime<Tz>> + Send + 'a> = Box::new(
            spec.inclusions()
                .iter()
                .copied()
                .skip_while(move |inclusion| window_start.is_some_and(|start| *inclusion < start))
                .take_while(move |inclusion| window_end.is_none_or(|end| *inclusion <= end)),
        );

        Self {
            spec,
            candidates: Candidates::new(spec, window_start, window_end, max_iterations),
            candidate: None,
            inclusions: inclusions.peekable(),
            window_start,
            last: None,
        }
    }

    /// ## Summary
    /// True if the safety ceiling stopped the rule before it terminated on
    /// its own. Only meaningful once the iterator has returned `None` or the
    /// caller stopped consuming it.
    #[must_use]
    pub fn limit_reached(&self) -> bool {
        self.candidates.limit_reached()
    }

    /// Number of cursor steps walked so far.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.candidates.iterations()
    }

    /// Next rule candidate at or after the window start.
    fn pull_candidate(&mut self) -> Option<DateTime<Tz>> {
        let window_start = self.window_start;
        self.candidates
            .by_ref()
            .find(|candidate| window_start.is_none_or(|start| *candidate >= start))
    }
}

impl Iterator for Occurrences<'_> {
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.candidate.is_none() {
                self.candidate = self.pull_candidate();
            }

            let (next, included) = match (self.candidate, self.inclusions.peek().copied()) {
                (None, None) => return None,
                (Some(candidate), None) => {
                    self.candidate = None;
                    (candidate, false)
                }
                (None, Some(inclusion)) => {
                    self.inclusions.next();
                    (inclusion, true)
                }
                (Some(candidate), Some(inclusion)) => {
                    if candidate < inclusion {
                        self.candidate = None;
                        (candidate, false)
                    } else {
                        // Equal instants collapse into the inclusion
                        if candidate == inclusion {
                            self.candidate = None;
                        }
                        self.inclusions.next();
                        (inclusion, true)
                    }
                }
            };

            if !included && self.spec.is_excluded(&next) {
                continue;
            }

            if self.last.is_some_and(|last| next <= last) {
                continue;
            }

            self.last = Some(next);
            return Some(next);
        }
    }
}
