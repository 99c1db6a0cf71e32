use chrono::{TimeDelta, Weekday};
use due_date_tool::{Calendar, CalendarConfig, CalendarError};

fn config(first_workday: Weekday, workdays_in_week: i32, begins: i64, ends: i64) -> CalendarConfig {
    CalendarConfig {
        first_workday,
        workdays_in_week,
        work_begins: TimeDelta::hours(begins),
        work_ends: TimeDelta::hours(ends),
        ..CalendarConfig::default()
    }
}

#[test]
fn default_config_builds() {
    let calendar = Calendar::new(CalendarConfig::default()).unwrap();
    let schedule = calendar.config();
    assert_eq!(schedule.first_workday(), Weekday::Mon);
    assert_eq!(schedule.last_workday(), Weekday::Fri);
    assert_eq!(schedule.workdays_in_week(), 5);
    assert_eq!(schedule.daily_work_duration(), TimeDelta::hours(8));
    assert_eq!(schedule.week_work_duration(), TimeDelta::hours(40));
    assert_eq!(schedule.to_config(), CalendarConfig::default());
}

#[test]
fn six_day_week_is_the_maximum_from_monday() {
    assert!(Calendar::new(config(Weekday::Mon, 6, 9, 17)).is_ok());

    let err = Calendar::new(config(Weekday::Mon, 7, 9, 17)).unwrap_err();
    assert!(matches!(err, CalendarError::InvalidWorkdays { workdays_in_week: 7, .. }));
    assert_eq!(err.to_string(), "invalid workdays: Mon + 7");
}

#[test]
fn zero_or_negative_workdays_are_rejected() {
    for workdays in [0, -5] {
        let err = Calendar::new(config(Weekday::Mon, workdays, 9, 17)).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidWorkdays { .. }), "{workdays}");
        assert!(err.is_config_error());
    }
}

#[test]
fn work_week_may_not_wrap_past_saturday() {
    assert!(Calendar::new(config(Weekday::Sat, 1, 9, 17)).is_ok());
    assert!(Calendar::new(config(Weekday::Sun, 7, 9, 17)).is_ok());

    let err = Calendar::new(config(Weekday::Sat, 2, 9, 17)).unwrap_err();
    assert!(matches!(err, CalendarError::InvalidWorkdays { .. }));
}

#[test]
fn inconsistent_work_times_are_rejected() {
    let cases = [
        ("negative work begins", -9, 17),
        ("negative work ends", 9, -17),
        ("equal work times", 9, 9),
        ("begins after ends", 17, 9),
        ("begins at midnight of next day", 24, 24),
        ("ends after midnight", 9, 25),
    ];
    for (name, begins, ends) in cases {
        let err = Calendar::new(config(Weekday::Mon, 5, begins, ends)).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidWorkTime { .. }), "{name}");
    }

    let err = Calendar::new(config(Weekday::Mon, 5, 17, 9)).unwrap_err();
    assert_eq!(err.to_string(), "invalid work datetime: 17:00 - 09:00");
}

#[test]
fn full_day_window_is_allowed() {
    let calendar = Calendar::new(config(Weekday::Mon, 5, 0, 24)).unwrap();
    assert_eq!(calendar.config().daily_work_duration(), TimeDelta::hours(24));
}

#[test]
fn empty_or_broken_time_format_is_rejected() {
    for format in ["", "%Y-%m-%d %Q"] {
        let err = Calendar::new(CalendarConfig {
            time_format: format.to_string(),
            ..CalendarConfig::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            CalendarError::InvalidTimeFormat {
                format: format.to_string()
            }
        );
    }
}

#[test]
fn workday_count_is_checked_before_work_time() {
    let err = Calendar::new(config(Weekday::Mon, 0, 17, 9)).unwrap_err();
    assert!(matches!(err, CalendarError::InvalidWorkdays { .. }));
}
