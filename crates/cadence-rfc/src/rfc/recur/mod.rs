//! Recurrence rules: compile, expand, query.

pub mod build;
pub mod core;
pub mod expand;
pub mod parse;
pub mod view;

#[cfg(test)]
mod tests;

pub use self::core::{Frequency, RuleSpec, Weekday};
pub use expand::{ExpansionOptions, OccurrenceEngine, Occurrences, Window};
pub use parse::{DateEntry, DateList, IntegerField, RuleCompiler, RuleFields, TokenList};
pub use view::ScheduleView;
