use chrono::NaiveDate;
use polars::prelude::*;
use study_planner::curriculum::GoalKind;
use study_planner::{Schedule, ScheduleEntry, ScheduledItem};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn goal_item(id: &str, date: NaiveDate, minutes: i64) -> ScheduledItem {
    ScheduledItem {
        date,
        discipline: "Administrative Law".into(),
        subject: "Acts".into(),
        duration_minutes: minutes,
        entry: ScheduleEntry::Goal {
            goal_id: id.into(),
            kind: GoalKind::QuestionSet,
            title: format!("Goal {id}"),
        },
    }
}

fn part_item(goal: &str, part: &str, date: NaiveDate, minutes: i64) -> ScheduledItem {
    ScheduledItem {
        date,
        discipline: "Administrative Law".into(),
        subject: "Acts".into(),
        duration_minutes: minutes,
        entry: ScheduleEntry::Part {
            goal_id: goal.into(),
            part_id: part.into(),
            lesson_title: "Acts lesson".into(),
            title: format!("Part {part}"),
        },
    }
}

fn revision_item(goal: &str, index: usize, date: NaiveDate) -> ScheduledItem {
    ScheduledItem {
        date,
        discipline: "Administrative Law".into(),
        subject: "Acts".into(),
        duration_minutes: 20,
        entry: ScheduleEntry::Revision {
            revision_id: format!("rev-{goal}-{index}"),
            source_goal_id: goal.into(),
            source_kind: GoalKind::QuestionSet,
            interval_index: index,
            interval_days: 1,
            title: format!("Goal {goal}"),
        },
    }
}

fn sample() -> Schedule {
    let regular = vec![
        part_item("g1", "p1", d(2025, 1, 6), 45),
        goal_item("g2", d(2025, 1, 6), 15),
        goal_item("g3", d(2025, 1, 13), 60),
        goal_item("g4", d(2025, 2, 3), 30),
    ];
    let revisions = vec![
        revision_item("g0", 1, d(2025, 1, 13)),
        revision_item("g0", 0, d(2025, 1, 5)),
    ];
    Schedule::assemble(regular, revisions)
}

#[test]
fn assemble_orders_by_date_and_keeps_regular_first_on_ties() {
    let schedule = sample();
    let dates: Vec<NaiveDate> = schedule.items().iter().map(|i| i.date).collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    let on_13th = schedule.on_day(d(2025, 1, 13));
    assert_eq!(on_13th.len(), 2);
    assert!(!on_13th.items()[0].is_revision());
    assert!(on_13th.items()[1].is_revision());
}

#[test]
fn serialized_entries_carry_explicit_type() {
    let schedule = sample();
    let value = serde_json::to_value(&schedule).unwrap();
    let types: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["entry"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec!["REVISION", "PART", "GOAL", "GOAL", "REVISION", "GOAL"]
    );
    let back: Schedule = serde_json::from_value(value).unwrap();
    assert_eq!(back, schedule);
}

#[test]
fn views_filter_by_calendar_period() {
    let schedule = sample();
    assert_eq!(schedule.on_day(d(2025, 1, 6)).len(), 2);
    assert!(schedule.on_day(d(2025, 1, 7)).is_empty());
    assert_eq!(schedule.between(d(2025, 1, 5), d(2025, 1, 13)).len(), 5);

    // Sunday 2025-01-05 through Saturday 2025-01-11
    let week = schedule.week_of(d(2025, 1, 8));
    assert_eq!(week.len(), 3);
    assert_eq!(week.first_date(), Some(d(2025, 1, 5)));
    assert_eq!(week.last_date(), Some(d(2025, 1, 6)));

    let february = schedule.month_of(2025, 2);
    assert_eq!(february.len(), 1);
    assert_eq!(february.items()[0].goal_id(), "g4");
}

#[test]
fn day_load_includes_revisions() {
    let schedule = sample();
    assert_eq!(schedule.day_load(d(2025, 1, 6)), 60);
    assert_eq!(schedule.day_load(d(2025, 1, 13)), 80);
    assert_eq!(schedule.day_load(d(2025, 1, 14)), 0);
}

#[test]
fn summary_counts_entry_types() {
    let summary = sample().summary();
    assert_eq!(summary.item_count, 6);
    assert_eq!(summary.goal_count, 3);
    assert_eq!(summary.part_count, 1);
    assert_eq!(summary.revision_count, 2);
    assert_eq!(summary.total_minutes, 190);
    assert_eq!(summary.study_days, 4);
    assert_eq!(summary.first_date, Some(d(2025, 1, 5)));
    assert_eq!(summary.last_date, Some(d(2025, 2, 3)));
    let text = summary.to_cli_summary();
    assert!(text.contains("items=6"));
    assert!(text.contains("revisions=2"));
    assert!(text.contains("span=2025-01-05..2025-02-03"));
}

#[test]
fn item_accessors_report_learner_facing_kind() {
    let part = part_item("g1", "p1", d(2025, 1, 6), 45);
    assert_eq!(part.kind(), GoalKind::Lesson);
    assert_eq!(part.part_id(), Some("p1"));
    let revision = revision_item("g9", 0, d(2025, 1, 6));
    assert_eq!(revision.kind(), GoalKind::Review);
    assert_eq!(revision.goal_id(), "g9");
    assert_eq!(revision.part_id(), None);
}

#[test]
fn dataframe_has_one_row_per_item() {
    let schedule = sample();
    let df = schedule.to_dataframe().unwrap();
    assert_eq!(df.height(), 6);
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "date",
            "type",
            "kind",
            "goal_id",
            "part_id",
            "title",
            "discipline",
            "subject",
            "duration_minutes"
        ]
    );
    assert_eq!(df.column("date").unwrap().dtype(), &DataType::Date);
    let minutes: i64 = df
        .column("duration_minutes")
        .unwrap()
        .as_materialized_series()
        .i64()
        .unwrap()
        .into_iter()
        .flatten()
        .sum();
    assert_eq!(minutes, 190);
}

#[test]
fn empty_schedule_has_empty_summary() {
    let schedule = Schedule::default();
    let summary = schedule.summary();
    assert_eq!(summary.item_count, 0);
    assert_eq!(summary.first_date, None);
    assert_eq!(schedule.to_dataframe().unwrap().height(), 0);
}
