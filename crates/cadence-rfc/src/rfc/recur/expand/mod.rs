//! Occurrence expansion for recurrence rules.
//!
//! This module turns a compiled `RuleSpec` into its ordered occurrence
//! instants: interval stepping from the anchor, last-day-of-month clamping,
//! by-day filtering, count/end/window termination, exception removal and
//! inclusion merging.

mod calendar;
mod candidates;
mod engine;
mod occurrences;
mod timezone;
mod window;

pub use engine::{ExpansionOptions, OccurrenceEngine};
pub use occurrences::Occurrences;
pub use timezone::{normalize_tzid, resolve_timezone};
pub use window::Window;

pub(crate) use calendar::localize;
