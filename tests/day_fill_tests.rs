use chrono::{Datelike, NaiveDate, Weekday};
use study_planner::curriculum::{Discipline, Goal, GoalKind, Part, Plan, ProficiencyLevel, Subject};
use study_planner::{
    DayFill, PlannerConfig, ProgressIndex, ScheduleEntry, ScheduleError, ScheduledItem,
    StudyRoutine, resolve_backlog,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Summary goals whose minutes are given directly.
fn plan_of_minutes(minutes: &[i64]) -> Plan {
    let mut subject = Subject::new("s1", "Subject", 1);
    for (idx, m) in minutes.iter().enumerate() {
        subject = subject.with_goal(
            Goal::new(format!("g{}", idx + 1), GoalKind::Summary, format!("Item {}", idx + 1), idx as i32 + 1)
                .with_pages(*m),
        );
    }
    Plan::new("p", "Plan").with_discipline(Discipline::new("d1", "Discipline", 1).with_subject(subject))
}

fn fill(plan: &Plan, routine: &StudyRoutine, start: NaiveDate) -> Result<Vec<ScheduledItem>, ScheduleError> {
    let config = PlannerConfig::default();
    let index = ProgressIndex::build(&[]);
    let backlog = resolve_backlog(plan, &index);
    DayFill::new(routine, ProficiencyLevel::Beginner, &config).execute(&backlog, start)
}

#[test]
fn item_that_does_not_fit_moves_to_next_study_day() {
    let routine = StudyRoutine::uniform([Weekday::Mon], 60).unwrap();
    let plan = plan_of_minutes(&[40, 30]);
    // 2025-01-02 is a Thursday
    let items = fill(&plan, &routine, d(2025, 1, 2)).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].date, d(2025, 1, 6));
    assert_eq!(items[0].goal_id(), "g1");
    assert_eq!(items[1].date, d(2025, 1, 13));
    assert_eq!(items[1].goal_id(), "g2");
    assert!(items.iter().all(|item| item.date.weekday() == Weekday::Mon));
}

#[test]
fn first_item_that_does_not_fit_ends_the_day_without_reordering() {
    let routine = StudyRoutine::uniform([Weekday::Mon, Weekday::Tue], 60).unwrap();
    // 40 fits; 30 does not fit the remaining 20, so the 10 behind it waits too.
    let plan = plan_of_minutes(&[40, 30, 10]);
    let items = fill(&plan, &routine, d(2025, 1, 6)).unwrap();

    let placed: Vec<(&str, NaiveDate)> = items.iter().map(|i| (i.goal_id(), i.date)).collect();
    assert_eq!(
        placed,
        vec![
            ("g1", d(2025, 1, 6)),
            ("g2", d(2025, 1, 7)),
            ("g3", d(2025, 1, 7)),
        ]
    );
}

#[test]
fn exact_fit_fills_the_day() {
    let routine = StudyRoutine::uniform([Weekday::Mon], 60).unwrap();
    let plan = plan_of_minutes(&[30, 30, 30]);
    let items = fill(&plan, &routine, d(2025, 1, 6)).unwrap();
    assert_eq!(items[0].date, d(2025, 1, 6));
    assert_eq!(items[1].date, d(2025, 1, 6));
    assert_eq!(items[2].date, d(2025, 1, 13));
}

#[test]
fn lesson_parts_are_placed_individually_and_never_split() {
    let lesson = Goal::lesson(
        "g1",
        "Acts lesson",
        1,
        vec![
            Part::new("p1", "Concept", 45),
            Part::new("p2", "Attributes", 75),
        ],
    );
    let plan = Plan::new("p", "Plan").with_discipline(
        Discipline::new("d1", "Administrative Law", 1)
            .with_subject(Subject::new("s1", "Acts", 1).with_goal(lesson)),
    );
    let routine = StudyRoutine::uniform(
        [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
        90,
    )
    .unwrap();
    let items = fill(&plan, &routine, d(2025, 1, 6)).unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].date, d(2025, 1, 6));
    assert_eq!(items[0].duration_minutes, 45);
    assert_eq!(items[1].date, d(2025, 1, 7));
    assert_eq!(items[1].duration_minutes, 75);
    match &items[1].entry {
        ScheduleEntry::Part {
            goal_id,
            part_id,
            lesson_title,
            ..
        } => {
            assert_eq!(goal_id, "g1");
            assert_eq!(part_id, "p2");
            assert_eq!(lesson_title, "Acts lesson");
        }
        other => panic!("expected part entry, got {other:?}"),
    }
}

#[test]
fn rest_days_are_skipped() {
    let mut routine = StudyRoutine::uniform([Weekday::Mon], 60).unwrap();
    routine.add_rest_day(d(2025, 1, 6));
    let plan = plan_of_minutes(&[10]);
    let items = fill(&plan, &routine, d(2025, 1, 6)).unwrap();
    assert_eq!(items[0].date, d(2025, 1, 13));
}

#[test]
fn empty_routine_schedules_nothing() {
    let routine = StudyRoutine::default();
    let plan = plan_of_minutes(&[10, 20]);
    assert!(fill(&plan, &routine, d(2025, 1, 6)).unwrap().is_empty());
}

#[test]
fn oversized_item_is_reported_instead_of_looping() {
    let routine = StudyRoutine::uniform([Weekday::Mon, Weekday::Wed], 60).unwrap();
    let plan = plan_of_minutes(&[30, 90, 10]);
    let err = fill(&plan, &routine, d(2025, 1, 6)).unwrap_err();
    assert_eq!(
        err,
        ScheduleError::Unschedulable {
            item: "g2".to_string(),
            duration_minutes: 90,
            max_daily_minutes: 60,
        }
    );
}

#[test]
fn scan_cap_stops_the_cursor() {
    let routine = StudyRoutine::uniform([Weekday::Mon], 60).unwrap();
    let plan = plan_of_minutes(&[60, 60, 60]);
    let mut config = PlannerConfig::default();
    config.max_scan_days = 10;
    let index = ProgressIndex::build(&[]);
    let backlog = resolve_backlog(&plan, &index);

    let err = DayFill::new(&routine, ProficiencyLevel::Beginner, &config)
        .execute(&backlog, d(2025, 1, 6))
        .unwrap_err();
    match err {
        ScheduleError::ScanLimitExceeded {
            item,
            scanned_days,
            remaining,
        } => {
            assert_eq!(item, "g3");
            assert_eq!(scanned_days, 10);
            assert_eq!(remaining, 1);
        }
        other => panic!("expected scan limit error, got {other:?}"),
    }
}

#[test]
fn level_changes_page_based_durations() {
    let plan = Plan::new("p", "Plan").with_discipline(
        Discipline::new("d1", "D", 1).with_subject(
            Subject::new("s1", "S", 1)
                .with_goal(Goal::new("q1", GoalKind::QuestionSet, "Q1", 1).with_pages(10))
                .with_goal(Goal::new("q2", GoalKind::QuestionSet, "Q2", 2).with_pages(10)),
        ),
    );
    let routine = StudyRoutine::uniform([Weekday::Mon], 100).unwrap();
    let config = PlannerConfig::default();
    let index = ProgressIndex::build(&[]);
    let backlog = resolve_backlog(&plan, &index);

    let beginner = DayFill::new(&routine, ProficiencyLevel::Beginner, &config)
        .execute(&backlog, d(2025, 1, 6))
        .unwrap();
    assert_eq!(beginner[1].date, d(2025, 1, 13));

    let advanced = DayFill::new(&routine, ProficiencyLevel::Advanced, &config)
        .execute(&backlog, d(2025, 1, 6))
        .unwrap();
    assert_eq!(advanced[0].date, d(2025, 1, 6));
    assert_eq!(advanced[1].date, d(2025, 1, 6));
    assert_eq!(advanced[1].duration_minutes, 20);
}
