//! Cadence recurrence engine - integration test support.
//!
//! Re-exports the workspace crates under one `component` path and provides
//! shared builders for rules and records.

pub mod component {
    pub use cadence_app::query;
    pub use cadence_core::config;
    pub use cadence_rfc::error;
    pub use cadence_rfc::rfc::recur;
}

pub mod fixtures {
    use anyhow::{Context, Result};
    use chrono::{DateTime, TimeZone};
    use chrono_tz::Tz;
    use serde_json::{Map, Value};

    use cadence_core::config::FieldMapping;
    use cadence_rfc::rfc::recur::{OccurrenceEngine, RuleCompiler, RuleFields, RuleSpec};

    /// ## Summary
    /// Compiles a JSON record through the default field mapping.
    ///
    /// ## Errors
    /// Returns an error if the value is not an object or the rule is invalid.
    pub fn spec_from_record(record: Value) -> Result<RuleSpec> {
        let Value::Object(record) = record else {
            anyhow::bail!("record must be a JSON object");
        };
        spec_from_map(&record, &FieldMapping::default())
    }

    /// ## Errors
    /// Returns an error if projection or compilation fails.
    pub fn spec_from_map(record: &Map<String, Value>, mapping: &FieldMapping) -> Result<RuleSpec> {
        let fields = RuleFields::from_record(record, mapping).context("projecting record")?;
        RuleCompiler::default()
            .compile(&fields)
            .context("compiling rule")
    }

    /// ## Errors
    /// Returns an error if the rule fails to compile or expand.
    pub fn expand_fields(fields: &RuleFields) -> Result<Vec<DateTime<Tz>>> {
        let spec = RuleCompiler::default().compile(fields)?;
        Ok(OccurrenceEngine::default().expand(&spec, None)?)
    }

    /// RFC 3339 rendering, for comparing against literal expectations.
    #[must_use]
    pub fn rfc3339(occurrences: &[DateTime<Tz>]) -> Vec<String> {
        occurrences.iter().map(DateTime::to_rfc3339).collect()
    }

    /// ## Errors
    /// Returns an error if the arguments do not name a valid UTC instant.
    pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> Result<DateTime<Tz>> {
        chrono_tz::UTC
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .context("invalid UTC instant")
    }
}
