//! End-to-end tests: raw fields through compilation, expansion and queries.
