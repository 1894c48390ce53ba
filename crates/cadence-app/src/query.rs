//! Command-line queries over a single rule.

use std::path::Path;

use anyhow::{Context, Result, bail};
use cadence_rfc::rfc::recur::ScheduleView;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use serde_json::{Map, Value};

/// Which occurrences to print.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Query {
    First,
    Last,
    Next,
    Current,
    #[default]
    All,
}

/// ## Summary
/// Reads a host record: one JSON object keyed by storage attribute names.
///
/// ## Errors
/// Returns an error if the file cannot be read, is not JSON, or is not an object.
pub fn load_record(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read record {}", path.display()))?;
    parse_record(&text).with_context(|| format!("Invalid record {}", path.display()))
}

/// ## Errors
/// Returns an error if `text` is not a JSON object.
pub fn parse_record(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(text)? {
        Value::Object(record) => Ok(record),
        other => bail!("expected a JSON object, got {other}"),
    }
}

/// ## Errors
/// Returns an error if `text` is not an RFC 3339 timestamp.
pub fn parse_instant(text: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim())
        .with_context(|| format!("'{text}' is not an RFC 3339 timestamp"))
}

/// Optional reference instants taken from `--from` and `--to`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bounds {
    pub from: Option<DateTime<FixedOffset>>,
    pub to: Option<DateTime<FixedOffset>>,
}

/// ## Summary
/// Runs `query` against `view`.
///
/// `all` expands the window when both bounds are given, else the whole
/// series. `next` and `current` are taken relative to `from`, defaulting to
/// now. `first` and `last` ignore the bounds.
///
/// ## Errors
/// Returns an error if only one bound is given for `all`, or if the
/// expansion fails.
pub fn run(view: &ScheduleView<'_>, query: Query, bounds: Bounds) -> Result<Vec<DateTime<Tz>>> {
    let reference = bounds
        .from
        .map_or_else(Utc::now, |from| from.with_timezone(&Utc));

    let occurrences = match query {
        Query::First => view.first()?.into_iter().collect(),
        Query::Last => view.last()?.into_iter().collect(),
        Query::Next => view.next_after(&reference)?.into_iter().collect(),
        Query::Current => view.current_at(&reference)?.into_iter().collect(),
        Query::All => match (bounds.from, bounds.to) {
            (Some(from), Some(to)) => view.between(&from, &to)?,
            (None, None) => view.all()?.to_vec(),
            _ => bail!("--from and --to must be given together for `all`"),
        },
    };

    tracing::debug!(?query, occurrences = occurrences.len(), "Query complete");
    Ok(occurrences)
}

/// One RFC 3339 occurrence per line, or `none`.
#[must_use]
pub fn render(occurrences: &[DateTime<Tz>]) -> String {
    if occurrences.is_empty() {
        return "none".to_string();
    }
    occurrences
        .iter()
        .map(DateTime::to_rfc3339)
        .collect::<Vec<_>>()
        .join("\n")
}
