use chrono::{NaiveDate, NaiveTime};
use study_planner::curriculum::{Discipline, Goal, GoalKind, Part, Plan, Subject};
use study_planner::export::calendar_event;
use study_planner::{PlannerConfig, Schedule, ScheduleEntry, ScheduledItem, calendar_events};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn plan() -> Plan {
    let mut part = Part::new("p1", "Concept", 45);
    part.link = Some("https://example.org/acts/concept".into());
    let mut lesson = Goal::lesson("g1", "Acts lesson", 1, vec![part, Part::new("p2", "Attributes", 30)]);
    lesson.link = Some("https://example.org/acts".into());
    lesson.observations = Some("Take notes".into());

    Plan::new("plan", "Plan").with_discipline(
        Discipline::new("d1", "Administrative Law", 1).with_subject(
            Subject::new("s1", "Acts", 1)
                .with_goal(lesson)
                .with_goal(Goal::new("g2", GoalKind::QuestionSet, "Acts questions", 2).with_pages(3)),
        ),
    )
}

fn part_item(part_id: &str, title: &str, minutes: i64) -> ScheduledItem {
    ScheduledItem {
        date: d(2025, 1, 6),
        discipline: "Administrative Law".into(),
        subject: "Acts".into(),
        duration_minutes: minutes,
        entry: ScheduleEntry::Part {
            goal_id: "g1".into(),
            part_id: part_id.into(),
            lesson_title: "Acts lesson".into(),
            title: title.into(),
        },
    }
}

#[test]
fn part_event_uses_lesson_and_part_titles() {
    let plan = plan();
    let event = calendar_event(&part_item("p1", "Concept", 45), &plan, &PlannerConfig::default());

    assert_eq!(event.summary, "Lesson: Acts lesson - Concept");
    assert_eq!(event.start, d(2025, 1, 6).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(event.end, d(2025, 1, 6).and_hms_opt(0, 45, 0).unwrap());
    assert_eq!(event.uid, "g1.p1@2025-01-06");
    assert_eq!(
        event.description,
        "Discipline: Administrative Law\nSubject: Acts\nObservations: Take notes\nLink: https://example.org/acts/concept"
    );
}

#[test]
fn part_without_link_falls_back_to_goal_link() {
    let plan = plan();
    let event = calendar_event(&part_item("p2", "Attributes", 30), &plan, &PlannerConfig::default());
    assert!(event.description.ends_with("Link: https://example.org/acts"));
}

#[test]
fn day_start_shifts_event_times() {
    let plan = plan();
    let mut config = PlannerConfig::default();
    config.export_day_start = NaiveTime::from_hms_opt(19, 30, 0).unwrap();
    let event = calendar_event(&part_item("p1", "Concept", 45), &plan, &config);
    assert_eq!(event.start, d(2025, 1, 6).and_hms_opt(19, 30, 0).unwrap());
    assert_eq!(event.end, d(2025, 1, 6).and_hms_opt(20, 15, 0).unwrap());
}

#[test]
fn revision_and_goal_events() {
    let plan = plan();
    let goal = ScheduledItem {
        date: d(2025, 1, 7),
        discipline: "Administrative Law".into(),
        subject: "Acts".into(),
        duration_minutes: 30,
        entry: ScheduleEntry::Goal {
            goal_id: "g2".into(),
            kind: GoalKind::QuestionSet,
            title: "Acts questions".into(),
        },
    };
    let revision = ScheduledItem {
        date: d(2025, 1, 8),
        discipline: "Administrative Law".into(),
        subject: "Acts".into(),
        duration_minutes: 20,
        entry: ScheduleEntry::Revision {
            revision_id: "rev-g2-0".into(),
            source_goal_id: "g2".into(),
            source_kind: GoalKind::QuestionSet,
            interval_index: 0,
            interval_days: 1,
            title: "Acts questions".into(),
        },
    };
    let schedule = Schedule::assemble(vec![goal], vec![revision]);
    let events = calendar_events(&schedule, &plan, &PlannerConfig::default());

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].summary, "Questions: Acts questions");
    assert_eq!(events[0].description, "Discipline: Administrative Law\nSubject: Acts");
    assert_eq!(events[1].summary, "Review: Acts questions");
    assert_eq!(events[1].uid, "rev-g2-0@2025-01-08");
}

#[test]
fn event_end_is_clamped_instead_of_overflowing() {
    let plan = plan();
    let item = part_item("p1", "Concept", i64::MAX);
    let event = calendar_event(&item, &plan, &PlannerConfig::default());
    assert_eq!(event.start, d(2025, 1, 6).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(event.end, chrono::NaiveDateTime::MAX);
}
