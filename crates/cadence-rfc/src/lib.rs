//! Recurrence rule compilation and occurrence expansion (RFC 5545 §3.3.10).
//!
//! Raw rule fields are compiled into an immutable [`RuleSpec`](rfc::recur::core::RuleSpec),
//! expanded by the [`OccurrenceEngine`](rfc::recur::expand::OccurrenceEngine) and queried
//! through a [`ScheduleView`](rfc::recur::view::ScheduleView).

pub mod error;
pub mod rfc;
