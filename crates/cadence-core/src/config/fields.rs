//! Storage attribute names for the canonical recurrence fields.
//!
//! ## Summary
//! Host records rarely name their columns after the canonical rule fields
//! (`start_at` rather than `start_date`). `FieldMapping` is the explicit table
//! that translates one into the other; it is resolved once, before a rule is
//! compiled.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Canonical rule field names, in mapping order.
pub const CANONICAL_FIELDS: [&str; 10] = [
    "start_date",
    "end_date",
    "timezone",
    "frequency",
    "interval",
    "count",
    "by_day",
    "until",
    "exceptions",
    "inclusions",
];

/// Maps each canonical rule field to the attribute name used by the host record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub start_date: String,
    pub end_date: String,
    pub timezone: String,
    pub frequency: String,
    pub interval: String,
    pub count: String,
    pub by_day: String,
    pub until: String,
    pub exceptions: String,
    pub inclusions: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            start_date: "start_at".to_string(),
            end_date: "end_at".to_string(),
            timezone: "timezone".to_string(),
            frequency: "frequency".to_string(),
            interval: "interval".to_string(),
            count: "count".to_string(),
            by_day: "by_day".to_string(),
            until: "until".to_string(),
            exceptions: "exceptions".to_string(),
            inclusions: "inclusions".to_string(),
        }
    }
}

impl FieldMapping {
    /// Identity mapping: every attribute carries its canonical name.
    #[must_use]
    pub fn identity() -> Self {
        let [
            start_date,
            end_date,
            timezone,
            frequency,
            interval,
            count,
            by_day,
            until,
            exceptions,
            inclusions,
        ] = CANONICAL_FIELDS.map(str::to_string);
        Self {
            start_date,
            end_date,
            timezone,
            frequency,
            interval,
            count,
            by_day,
            until,
            exceptions,
            inclusions,
        }
    }

    /// ## Summary
    /// Returns `(canonical field, storage attribute)` pairs in canonical order.
    #[must_use]
    pub fn pairs(&self) -> [(&'static str, &str); 10] {
        [
            (CANONICAL_FIELDS[0], self.start_date.as_str()),
            (CANONICAL_FIELDS[1], self.end_date.as_str()),
            (CANONICAL_FIELDS[2], self.timezone.as_str()),
            (CANONICAL_FIELDS[3], self.frequency.as_str()),
            (CANONICAL_FIELDS[4], self.interval.as_str()),
            (CANONICAL_FIELDS[5], self.count.as_str()),
            (CANONICAL_FIELDS[6], self.by_day.as_str()),
            (CANONICAL_FIELDS[7], self.until.as_str()),
            (CANONICAL_FIELDS[8], self.exceptions.as_str()),
            (CANONICAL_FIELDS[9], self.inclusions.as_str()),
        ]
    }

    /// ## Summary
    /// Looks up the storage attribute for a canonical field name.
    #[must_use]
    pub fn attribute(&self, field: &str) -> Option<&str> {
        self.pairs()
            .into_iter()
            .find_map(|(canonical, attribute)| (canonical == field).then_some(attribute))
    }

    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if any attribute name is blank.
    pub fn validate(&self) -> CoreResult<()> {
        for (canonical, attribute) in self.pairs() {
            if attribute.trim().is_empty() {
                return Err(CoreError::InvalidConfiguration(format!(
                    "fields.{canonical} must name a record attribute"
                )));
            }
        }
        Ok(())
    }
}
