//! Integration tests across the cadence crates.

mod cases;
mod records;
mod rrule_crosscheck;
mod settings;
