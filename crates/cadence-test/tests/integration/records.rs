use cadence_test::component::config::{FieldMapping, Settings};
use cadence_test::component::error::RecurrenceError;
use cadence_test::component::query::{self, Bounds, Query};
use cadence_test::component::recur::{
    ExpansionOptions, OccurrenceEngine, RuleCompiler, RuleFields, ScheduleView,
};
use cadence_test::fixtures::{rfc3339, spec_from_map, spec_from_record};
use serde_json::json;

#[test]
fn custom_mapping_from_settings_projects_record() {
    let settings = Settings::from_toml_str(
        r#"
        [recurrence]
        default_timezone = "Europe/Berlin"

        [fields]
        start_date = "starts"
        frequency = "repeat"
        count = "times"
        exceptions = "skip"
        "#,
    )
    .unwrap();

    let record = query::parse_record(
        r#"{
            "starts": "2024-05-01 07:30",
            "repeat": "Daily",
            "times": "4",
            "skip": [{"date": "2024-05-02"}],
            "start_at": "1999-01-01"
        }"#,
    )
    .unwrap();

    let fields = RuleFields::from_record(&record, &settings.fields).unwrap();
    let spec = RuleCompiler::from_config(&settings.recurrence)
        .unwrap()
        .compile(&fields)
        .unwrap();
    let occurrences = OccurrenceEngine::new(ExpansionOptions::from_config(&settings.recurrence))
        .expand(&spec, None)
        .unwrap();

    assert_eq!(
        rfc3339(&occurrences),
        [
            "2024-05-01T07:30:00+02:00",
            "2024-05-03T07:30:00+02:00",
            "2024-05-04T07:30:00+02:00",
        ]
    );
}

#[test]
fn identity_mapping_accepts_canonical_records() {
    let record = json!({
        "start_date": "2024-01-01T09:00:00Z",
        "frequency": "WEEKLY",
        "by_day": "FR",
        "count": 2,
    });
    let spec = spec_from_map(
        record.as_object().expect("object literal"),
        &FieldMapping::identity(),
    )
    .unwrap();
    assert_eq!(
        rfc3339(&OccurrenceEngine::default().expand(&spec, None).unwrap()),
        ["2024-01-05T09:00:00+00:00", "2024-01-12T09:00:00+00:00"]
    );
}

#[test]
fn invalid_records_surface_invalid_rule() {
    for record in [
        json!({ "start_at": "2024-01-01", "frequency": "FORTNIGHTLY" }),
        json!({ "frequency": "DAILY" }),
        json!({ "start_at": "2024-01-01", "frequency": "DAILY", "count": 0 }),
        json!({ "start_at": "2024-01-01", "frequency": "DAILY", "interval": "-1" }),
        json!({ "start_at": "2024-01-01", "frequency": "DAILY", "by_day": ["MO", "XX"] }),
        json!({ "start_at": "2024-01-01", "frequency": "DAILY", "timezone": "Atlantis/Capital" }),
    ] {
        let err = spec_from_record(record.clone()).unwrap_err();
        assert!(
            matches!(
                err.downcast_ref::<RecurrenceError>(),
                Some(RecurrenceError::InvalidRule(_))
            ),
            "{record}: {err:#}"
        );
    }
}

#[test]
fn cli_queries_over_a_record() {
    let spec = spec_from_record(json!({
        "start_at": "2024-01-01 09:00",
        "end_at": "2024-01-05",
        "frequency": "DAILY",
    }))
    .unwrap();
    let view = ScheduleView::new(&spec);
    let from = Some(query::parse_instant("2024-01-03T09:00:00Z").unwrap());

    let render = |kind, bounds| query::render(&query::run(&view, kind, bounds).unwrap());

    assert_eq!(render(Query::First, Bounds::default()), "2024-01-01T09:00:00+00:00");
    assert_eq!(render(Query::Last, Bounds::default()), "2024-01-05T09:00:00+00:00");
    assert_eq!(render(Query::Next, Bounds { from, to: None }), "2024-01-04T09:00:00+00:00");
    assert_eq!(render(Query::Current, Bounds { from, to: None }), "2024-01-03T09:00:00+00:00");
    assert_eq!(render(Query::All, Bounds::default()).lines().count(), 5);
}
