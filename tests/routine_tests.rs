use chrono::{NaiveDate, Weekday};
use study_planner::{RoutineConfig, StudyRoutine};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn uniform_routine_sets_only_listed_days() {
    let routine = StudyRoutine::uniform([Weekday::Mon, Weekday::Wed], 90).unwrap();
    assert_eq!(routine.minutes_for(Weekday::Mon), 90);
    assert_eq!(routine.minutes_for(Weekday::Tue), 0);
    assert_eq!(routine.weekly_minutes(), 180);
    assert_eq!(routine.max_daily_minutes(), 90);
    assert!(routine.has_study_time());
}

#[test]
fn rest_days_remove_capacity() {
    let mut routine = StudyRoutine::uniform([Weekday::Mon], 60).unwrap();
    assert!(routine.is_study_day(d(2025, 1, 6)));
    routine.add_rest_day(d(2025, 1, 6));
    assert!(routine.is_rest_day(d(2025, 1, 6)));
    assert_eq!(routine.available_minutes(d(2025, 1, 6)), 0);
    assert_eq!(routine.available_minutes(d(2025, 1, 13)), 60);
}

#[test]
fn next_study_day_is_strictly_after_and_bounded() {
    let routine = StudyRoutine::uniform([Weekday::Mon], 60).unwrap();
    assert_eq!(routine.next_study_day(d(2025, 1, 6), 30), Some(d(2025, 1, 13)));
    assert_eq!(routine.next_study_day(d(2025, 1, 6), 3), None);
    assert_eq!(StudyRoutine::default().next_study_day(d(2025, 1, 6), 100), None);
}

#[test]
fn capacity_over_a_range() {
    let mut routine = StudyRoutine::uniform([Weekday::Mon, Weekday::Tue], 45).unwrap();
    routine.add_rest_day(d(2025, 1, 14));
    let days = routine.study_days_in_range(d(2025, 1, 5), d(2025, 1, 18));
    assert_eq!(days, vec![d(2025, 1, 6), d(2025, 1, 7), d(2025, 1, 13)]);
    assert_eq!(routine.capacity_in_range(d(2025, 1, 5), d(2025, 1, 18)), 135);
}

#[test]
fn config_uses_sunday_based_keys() {
    let mut config = RoutineConfig::default();
    config.days.insert(0, 30);
    config.days.insert(6, 120);
    config.rest_days.push(d(2025, 1, 11));
    let routine = StudyRoutine::from_config(&config).unwrap();
    assert_eq!(routine.minutes_for(Weekday::Sun), 30);
    assert_eq!(routine.minutes_for(Weekday::Sat), 120);
    assert!(routine.is_rest_day(d(2025, 1, 11)));
    assert_eq!(routine.to_config(), config);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = RoutineConfig::default();
    config.days.insert(9, 30);
    let err = StudyRoutine::from_config(&config).unwrap_err();
    assert!(err.message().contains("out of range"));

    let mut config = RoutineConfig::default();
    config.days.insert(1, -10);
    assert!(StudyRoutine::from_config(&config).is_err());
}

#[test]
fn zero_minute_days_are_dropped_from_config() {
    let routine = StudyRoutine::uniform([Weekday::Mon], 0).unwrap();
    assert!(routine.to_config().days.is_empty());
    assert!(!routine.has_study_time());
}

#[test]
fn config_deserializes_from_json() {
    let config: RoutineConfig =
        serde_json::from_str(r#"{"days": {"1": 60, "3": 90}, "rest_days": ["2025-01-08"]}"#).unwrap();
    let routine = StudyRoutine::from_config(&config).unwrap();
    assert_eq!(routine.minutes_for(Weekday::Mon), 60);
    assert_eq!(routine.minutes_for(Weekday::Wed), 90);
    assert_eq!(routine.available_minutes(d(2025, 1, 8)), 0);
}

#[test]
fn minutes_beyond_a_full_day_are_rejected() {
    assert!(StudyRoutine::uniform([Weekday::Mon], 24 * 60).is_ok());
    let err = StudyRoutine::uniform([Weekday::Mon], 24 * 60 + 1).unwrap_err();
    assert!(err.message().contains("1441"));

    let mut config = RoutineConfig::default();
    config.days.insert(2, i64::MAX);
    assert!(StudyRoutine::from_config(&config).is_err());
}

#[test]
fn range_queries_stop_at_the_end_of_the_calendar() {
    let every_day = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];
    let routine = StudyRoutine::uniform(every_day, 10).unwrap();
    assert_eq!(routine.next_study_day(NaiveDate::MAX, 5), None);
    assert_eq!(
        routine.study_days_in_range(NaiveDate::MAX, NaiveDate::MAX),
        vec![NaiveDate::MAX]
    );
}
