use cadence_test::component::config::Settings;
use cadence_test::component::recur::{ExpansionOptions, RuleCompiler};

#[test]
fn defaults_feed_compiler_and_engine() {
    let settings = Settings::from_toml_str("").unwrap();

    assert_eq!(
        RuleCompiler::from_config(&settings.recurrence)
            .unwrap()
            .default_timezone(),
        chrono_tz::UTC
    );
    assert_eq!(
        ExpansionOptions::from_config(&settings.recurrence),
        ExpansionOptions::default()
    );
}

#[test]
fn unknown_default_timezone_is_rejected_by_the_compiler() {
    let settings = Settings::from_toml_str(
        r#"
        [recurrence]
        default_timezone = "Nowhere/Land"
        "#,
    )
    .unwrap();
    assert!(RuleCompiler::from_config(&settings.recurrence).is_err());
}

#[test]
fn windows_zone_names_normalize() {
    let settings = Settings::from_toml_str(
        r#"
        [recurrence]
        default_timezone = "W. Europe Standard Time"
        "#,
    )
    .unwrap();
    let compiler = RuleCompiler::from_config(&settings.recurrence).unwrap();
    assert_eq!(compiler.default_timezone(), chrono_tz::Europe::Berlin);
}
