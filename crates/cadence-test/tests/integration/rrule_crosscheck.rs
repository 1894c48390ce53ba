//! Cross-checks the expansion engine against the `rrule` crate for rules
//! where clamping cannot occur, so both semantics must agree.

use cadence_test::component::recur::{OccurrenceEngine, RuleCompiler, RuleFields};
use cadence_test::fixtures::expand_fields;

fn agreeing_rules() -> Vec<RuleFields> {
    vec![
        RuleFields::new("DAILY", "2024-01-15 09:30").with_count(40u32),
        RuleFields::new("DAILY", "2024-03-20 06:00")
            .with_timezone("Europe/Berlin")
            .with_interval(3u32)
            .with_until("2024-06-01"),
        RuleFields::new("WEEKLY", "2024-02-05 17:00")
            .with_timezone("America/New_York")
            .with_by_day("MO,TH,SA")
            .with_count(25u32),
        RuleFields::new("WEEKLY", "2024-01-10 12:00")
            .with_interval(2u32)
            .with_until("2024-12-31"),
        RuleFields::new("MONTHLY", "2024-01-28 08:00")
            .with_timezone("Asia/Tokyo")
            .with_count(18u32),
        RuleFields::new("YEARLY", "2020-06-15 00:00").with_count(6u32),
        RuleFields::new("HOURLY", "2024-10-26T20:00:00Z")
            .with_interval(7u32)
            .with_count(20u32),
        RuleFields::new("DAILY", "2024-04-01 10:00")
            .with_count(10u32)
            .with_exceptions(["2024-04-03 10:00", "2024-04-06"].into_iter().collect())
            .with_inclusions(["2024-04-20 15:00"].into_iter().collect()),
    ]
}

#[test_log::test]
fn engine_agrees_with_rrule_crate() {
    for fields in agreeing_rules() {
        let ours: Vec<i64> = expand_fields(&fields)
            .unwrap()
            .iter()
            .map(chrono::DateTime::timestamp)
            .collect();

        let spec = RuleCompiler::default().compile(&fields).unwrap();
        let theirs: Vec<i64> = spec
            .to_rrule_set()
            .unwrap_or_else(|err| panic!("rrule rejected {spec}: {err}"))
            .all(1_000)
            .dates
            .iter()
            .map(chrono::DateTime::timestamp)
            .collect();

        assert_eq!(ours, theirs, "divergence for {fields:?}");
    }
}

#[test]
fn interop_skips_where_engine_clamps() {
    let fields = RuleFields::new("MONTHLY", "2024-01-31 09:00").with_count(4u32);
    let spec = RuleCompiler::default().compile(&fields).unwrap();

    let ours = OccurrenceEngine::default().expand(&spec, None).unwrap();
    let theirs = spec.to_rrule_set().unwrap().all(100).dates;

    let ours: Vec<_> = ours.iter().map(|dt| dt.format("%m-%d").to_string()).collect();
    let theirs: Vec<_> = theirs.iter().map(|dt| dt.format("%m-%d").to_string()).collect();
    assert_eq!(ours, ["01-31", "02-29", "03-31", "04-30"]);
    assert_eq!(theirs, ["01-31", "03-31", "05-31", "07-31"]);
}
