include!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/recurrence_cases_data/mod.rs"
));

/// ## Summary
/// Runs the shared recurrence table end to end: record, compile, expand.
#[test_log::test]
fn recurrence_cases_integration() {
    for case in recurrence_cases() {
        assert_case(&case);
    }
}

#[test]
fn case_names_are_unique() {
    let cases = recurrence_cases();
    let mut names: Vec<_> = cases.iter().map(|case| case.name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), cases.len());
}
