//! Raw rule fields and their compilation into a `RuleSpec`.

mod compiler;
mod datetime;
mod fields;

pub use compiler::RuleCompiler;
pub use fields::{DateEntry, DateList, IntegerField, RuleFields, TokenList};
