//! Outbound representations of a compiled rule.

mod interop;
