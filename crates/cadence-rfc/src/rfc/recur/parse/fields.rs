//! Raw, unvalidated rule fields as they arrive from a host record.

use std::num::NonZeroU32;

use cadence_core::config::FieldMapping;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{RecurrenceError, RecurrenceResult};

/// An integer given either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerField {
    Number(i64),
    Text(String),
}

impl IntegerField {
    /// ## Summary
    /// Resolves the value into a positive integer. A blank string is absent.
    ///
    /// ## Errors
    /// Returns `InvalidRule` if the value is not an integer or is not positive.
    pub fn resolve(&self, field: &str) -> RecurrenceResult<Option<NonZeroU32>> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(text) if text.trim().is_empty() => return Ok(None),
            Self::Text(text) => text.trim().parse::<i64>().map_err(|_e| {
                RecurrenceError::InvalidRule(format!("{field} must be an integer, got '{text}'"))
            })?,
        };

        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Some)
            .ok_or_else(|| {
                RecurrenceError::InvalidRule(format!(
                    "{field} must be a positive integer, got {value}"
                ))
            })
    }
}

impl From<u32> for IntegerField {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<&str> for IntegerField {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Weekday tokens as a comma-delimited string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenList {
    Delimited(String),
    Tokens(Vec<String>),
}

impl TokenList {
    /// Trimmed, non-empty tokens.
    #[must_use]
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::Delimited(text) => split_delimited(text),
            Self::Tokens(tokens) => tokens
                .iter()
                .map(|token| token.trim())
                .filter(|token| !token.is_empty())
                .collect(),
        }
    }
}

/// One exception or inclusion: a date string, or a record carrying a `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateEntry {
    Text(String),
    Record { date: String },
}

impl DateEntry {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Record { date: text } => text.trim(),
        }
    }
}

/// Exceptions or inclusions as a comma-delimited string or a list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateList {
    Delimited(String),
    Entries(Vec<DateEntry>),
}

impl DateList {
    /// Trimmed, non-empty date strings.
    #[must_use]
    pub fn entries(&self) -> Vec<&str> {
        match self {
            Self::Delimited(text) => split_delimited(text),
            Self::Entries(entries) => entries
                .iter()
                .map(DateEntry::text)
                .filter(|text| !text.is_empty())
                .collect(),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for DateList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Entries(iter.into_iter().map(|s| DateEntry::Text(s.into())).collect())
    }
}

fn split_delimited(text: &str) -> Vec<&str> {
    text.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// ## Summary
/// The raw field set a `RuleCompiler` validates into a `RuleSpec`.
///
/// Keys are the canonical field names. Every field is optional here; the
/// compiler decides what is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleFields {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub timezone: Option<String>,
    pub frequency: Option<String>,
    pub interval: Option<IntegerField>,
    pub count: Option<IntegerField>,
    pub by_day: Option<TokenList>,
    pub until: Option<String>,
    pub exceptions: Option<DateList>,
    pub inclusions: Option<DateList>,
}

impl RuleFields {
    #[must_use]
    pub fn new(frequency: impl Into<String>, start_date: impl Into<String>) -> Self {
        Self {
            frequency: Some(frequency.into()),
            start_date: Some(start_date.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_end_date(mut self, end_date: impl Into<String>) -> Self {
        self.end_date = Some(end_date.into());
        self
    }

    #[must_use]
    pub fn with_until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: impl Into<IntegerField>) -> Self {
        self.interval = Some(interval.into());
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: impl Into<IntegerField>) -> Self {
        self.count = Some(count.into());
        self
    }

    #[must_use]
    pub fn with_by_day(mut self, by_day: impl Into<String>) -> Self {
        self.by_day = Some(TokenList::Delimited(by_day.into()));
        self
    }

    #[must_use]
    pub fn with_exceptions(mut self, exceptions: DateList) -> Self {
        self.exceptions = Some(exceptions);
        self
    }

    #[must_use]
    pub fn with_inclusions(mut self, inclusions: DateList) -> Self {
        self.inclusions = Some(inclusions);
        self
    }

    /// ## Summary
    /// Projects a host record into rule fields through `mapping`.
    ///
    /// Attributes the mapping does not name are ignored; `null` values are
    /// treated as absent.
    ///
    /// ## Errors
    /// Returns an error if the mapping is invalid or a mapped attribute has a
    /// shape no rule field accepts.
    pub fn from_record(
        record: &Map<String, Value>,
        mapping: &FieldMapping,
    ) -> RecurrenceResult<Self> {
        mapping.validate()?;

        let projected: Map<String, Value> = mapping
            .pairs()
            .into_iter()
            .filter_map(|(canonical, attribute)| {
                record
                    .get(attribute)
                    .filter(|value| !value.is_null())
                    .map(|value| (canonical.to_string(), value.clone()))
            })
            .collect();

        serde_json::from_value(Value::Object(projected))
            .map_err(|e| RecurrenceError::InvalidRule(format!("Invalid rule fields: {e}")))
    }
}
