//! Core recurrence value types.

mod frequency;
mod spec;
mod weekday;

pub use frequency::Frequency;
pub use spec::RuleSpec;
pub use weekday::Weekday;
