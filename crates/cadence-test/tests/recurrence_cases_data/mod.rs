use cadence_test::fixtures::{rfc3339, spec_from_record};
use cadence_test::component::recur::OccurrenceEngine;
use chrono::DateTime;

pub struct RecurrenceCase {
    pub name: &'static str,
    /// JSON record keyed by the default storage attribute names
    pub record: &'static str,
    pub expected: &'static [&'static str],
    pub window: Option<(&'static str, &'static str)>,
}

#[expect(clippy::too_many_lines)]
pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "daily_basic",
            record: r#"{"start_at": "2024-01-01T09:00:00Z", "frequency": "DAILY", "count": 3}"#,
            expected: &[
                "2024-01-01T09:00:00+00:00",
                "2024-01-02T09:00:00+00:00",
                "2024-01-03T09:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "monthly_last_day_clamp",
            record: r#"{"start_at": "2024-01-31", "frequency": "MONTHLY", "count": 4}"#,
            expected: &[
                "2024-01-31T00:00:00+00:00",
                "2024-02-29T00:00:00+00:00",
                "2024-03-31T00:00:00+00:00",
                "2024-04-30T00:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "monthly_30th_through_february_common_year",
            record: r#"{"start_at": "2023-01-30 12:00", "frequency": "monthly", "interval": "1", "count": 3}"#,
            expected: &[
                "2023-01-30T12:00:00+00:00",
                "2023-02-28T12:00:00+00:00",
                "2023-03-30T12:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "yearly_leap_day",
            record: r#"{"start_at": "2024-02-29 10:00", "timezone": "America/New_York", "frequency": "YEARLY", "count": 3}"#,
            expected: &[
                "2024-02-29T10:00:00-05:00",
                "2025-02-28T10:00:00-05:00",
                "2026-02-28T10:00:00-05:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "weekly_by_day_mo_we",
            record: r#"{"start_at": "2024-01-01", "frequency": "WEEKLY", "by_day": "MO,WE", "count": 4}"#,
            expected: &[
                "2024-01-01T00:00:00+00:00",
                "2024-01-03T00:00:00+00:00",
                "2024-01-08T00:00:00+00:00",
                "2024-01-10T00:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "biweekly_by_day_list_until",
            record: r#"{"start_at": "2024-01-02 18:00", "timezone": "Europe/Berlin", "frequency": "weekly", "interval": 2, "by_day": ["TU", "TH"], "until": "2024-01-31"}"#,
            expected: &[
                "2024-01-02T18:00:00+01:00",
                "2024-01-04T18:00:00+01:00",
                "2024-01-16T18:00:00+01:00",
                "2024-01-18T18:00:00+01:00",
                "2024-01-30T18:00:00+01:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "daily_weekdays_filter",
            record: r#"{"start_at": "2024-01-05 08:00", "frequency": "DAILY", "by_day": "MO,TU,WE,TH,FR", "count": 3}"#,
            expected: &[
                "2024-01-05T08:00:00+00:00",
                "2024-01-08T08:00:00+00:00",
                "2024-01-09T08:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "daily_wall_clock_across_dst",
            record: r#"{"start_at": "2024-03-09 09:00", "timezone": "America/New_York", "frequency": "DAILY", "count": 3}"#,
            expected: &[
                "2024-03-09T09:00:00-05:00",
                "2024-03-10T09:00:00-04:00",
                "2024-03-11T09:00:00-04:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "daily_dst_gap_shifts_forward",
            record: r#"{"start_at": "2024-03-30 02:30", "timezone": "Europe/Berlin", "frequency": "DAILY", "count": 3}"#,
            expected: &[
                "2024-03-30T02:30:00+01:00",
                "2024-03-31T03:30:00+02:00",
                "2024-04-01T02:30:00+02:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "hourly_interval_end_date",
            record: r#"{"start_at": "2024-01-01T00:00:00Z", "end_at": "2024-01-01T10:00:00Z", "frequency": "HOURLY", "interval": 4}"#,
            expected: &[
                "2024-01-01T00:00:00+00:00",
                "2024-01-01T04:00:00+00:00",
                "2024-01-01T08:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "minutely_count",
            record: r#"{"start_at": "20240101T235800Z", "frequency": "MINUTELY", "interval": 1, "count": 3}"#,
            expected: &[
                "2024-01-01T23:58:00+00:00",
                "2024-01-01T23:59:00+00:00",
                "2024-01-02T00:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "secondly_window",
            record: r#"{"start_at": "2024-01-01T00:00:00Z", "frequency": "SECONDLY", "interval": 20}"#,
            expected: &[
                "2024-01-01T01:00:00+00:00",
                "2024-01-01T01:00:20+00:00",
                "2024-01-01T01:00:40+00:00",
            ],
            window: Some(("2024-01-01T01:00:00Z", "2024-01-01T01:00:59Z")),
        },
        RecurrenceCase {
            name: "exceptions_consume_count",
            record: r#"{"start_at": "2024-01-01 10:00", "frequency": "DAILY", "count": 5, "exceptions": [{"date": "2024-01-02 10:00"}, "2024-01-04"]}"#,
            expected: &[
                "2024-01-01T10:00:00+00:00",
                "2024-01-03T10:00:00+00:00",
                "2024-01-05T10:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "inclusions_merge_sorted",
            record: r#"{"start_at": "2024-01-10 10:00", "frequency": "WEEKLY", "count": 2, "inclusions": "2024-01-01 08:00, 2024-01-12"}"#,
            expected: &[
                "2024-01-01T08:00:00+00:00",
                "2024-01-10T10:00:00+00:00",
                "2024-01-12T10:00:00+00:00",
                "2024-01-17T10:00:00+00:00",
            ],
            window: None,
        },
        RecurrenceCase {
            name: "inclusion_beats_exception",
            record: r#"{"start_at": "2024-01-01 10:00", "frequency": "DAILY", "count": 2, "exceptions": "2024-01-02 10:00", "inclusions": "2024-01-02 10:00"}"#,
            expected: &["2024-01-01T10:00:00+00:00", "2024-01-02T10:00:00+00:00"],
            window: None,
        },
        RecurrenceCase {
            name: "window_keeps_phase",
            record: r#"{"start_at": "2024-01-01 07:00", "frequency": "DAILY", "interval": 10}"#,
            expected: &["2024-02-10T07:00:00+00:00", "2024-02-20T07:00:00+00:00"],
            window: Some(("2024-02-01T00:00:00Z", "2024-02-28T00:00:00Z")),
        },
        RecurrenceCase {
            name: "window_consumes_count_before_start",
            record: r#"{"start_at": "2024-01-01 07:00", "frequency": "DAILY", "count": 5}"#,
            expected: &["2024-01-04T07:00:00+00:00", "2024-01-05T07:00:00+00:00"],
            window: Some(("2024-01-04T00:00:00Z", "2024-12-31T00:00:00Z")),
        },
        RecurrenceCase {
            name: "until_before_start",
            record: r#"{"start_at": "2024-01-01", "frequency": "DAILY", "until": "2023-12-31T00:00:00Z"}"#,
            expected: &[],
            window: None,
        },
        RecurrenceCase {
            name: "earlier_of_until_and_end_date",
            record: r#"{"start_at": "2024-01-01 10:00", "frequency": "DAILY", "until": "2024-01-02", "end_at": "2024-01-09"}"#,
            expected: &["2024-01-01T10:00:00+00:00", "2024-01-02T10:00:00+00:00"],
            window: None,
        },
    ]
}

pub fn assert_case(case: &RecurrenceCase) {
    let record = serde_json::from_str(case.record)
        .unwrap_or_else(|err| panic!("Case {} has invalid JSON: {err}", case.name));
    let spec = spec_from_record(record)
        .unwrap_or_else(|err| panic!("Failed to compile {}: {err:#}", case.name));

    let engine = OccurrenceEngine::default();
    let occurrences = match case.window {
        Some((start, end)) => {
            engine.expand_between(&spec, &parse_rfc3339(start), &parse_rfc3339(end))
        }
        None => engine.expand(&spec, None),
    }
    .unwrap_or_else(|err| panic!("Failed to expand {}: {err}", case.name));

    assert_eq!(
        rfc3339(&occurrences),
        case.expected,
        "Case {} did not match",
        case.name
    );
}

fn parse_rfc3339(value: &str) -> DateTime<chrono::FixedOffset> {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("invalid RFC3339 {value}: {err}"))
}
