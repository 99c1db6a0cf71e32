use chrono::{TimeDelta, Weekday};
use due_date_tool::{Calendar, CalendarConfig, CalendarError};
use std::fs;
use tempfile::NamedTempFile;

#[test]
fn json_config_with_all_fields() {
    let json = r#"{
        "first_workday": "Sun",
        "workdays_in_week": 5,
        "work_begins": "08:30",
        "work_ends": "16:45:30",
        "time_format": "%Y-%m-%d %H:%M"
    }"#;
    let config: CalendarConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.first_workday, Weekday::Sun);
    assert_eq!(config.work_begins, TimeDelta::minutes(8 * 60 + 30));
    assert_eq!(
        config.work_ends,
        TimeDelta::seconds(16 * 3600 + 45 * 60 + 30)
    );

    let calendar = Calendar::new(config).unwrap();
    assert_eq!(calendar.config().last_workday(), Weekday::Thu);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let config: CalendarConfig = serde_json::from_str(r#"{ "work_ends": "18:00" }"#).unwrap();
    assert_eq!(
        config,
        CalendarConfig {
            work_ends: TimeDelta::hours(18),
            ..CalendarConfig::default()
        }
    );
}

#[test]
fn unknown_fields_and_bad_offsets_are_rejected() {
    assert!(serde_json::from_str::<CalendarConfig>(r#"{ "holidays": [] }"#).is_err());
    assert!(serde_json::from_str::<CalendarConfig>(r#"{ "work_begins": "9am" }"#).is_err());
    assert!(serde_json::from_str::<CalendarConfig>(r#"{ "first_workday": "Someday" }"#).is_err());
}

#[test]
fn out_of_range_values_parse_but_fail_validation() {
    let config: CalendarConfig =
        serde_json::from_str(r#"{ "work_begins": "-09:00", "work_ends": "25:00" }"#).unwrap();
    assert!(matches!(
        Calendar::new(config),
        Err(CalendarError::InvalidWorkTime { .. })
    ));
}

#[test]
fn config_survives_file_round_trip() {
    let calendar = Calendar::new(CalendarConfig {
        first_workday: Weekday::Tue,
        workdays_in_week: 4,
        work_begins: TimeDelta::hours(7),
        work_ends: TimeDelta::hours(24),
        ..CalendarConfig::default()
    })
    .unwrap();

    let tmp = NamedTempFile::new().expect("create temp file");
    let json = serde_json::to_string_pretty(&calendar.config().to_config()).unwrap();
    assert!(json.contains(r#""work_ends": "24:00""#), "{json}");
    fs::write(tmp.path(), json).unwrap();

    let contents = fs::read_to_string(tmp.path()).unwrap();
    let loaded = Calendar::new(serde_json::from_str(&contents).unwrap()).unwrap();
    assert_eq!(loaded, calendar);
}
