//! Mapping from scheduled items to calendar events.
//!
//! Writing these into an iCalendar file is left to the consumer; this module
//! only decides what each event says and when it starts and ends.

use crate::config::PlannerConfig;
use crate::curriculum::Plan;
use crate::schedule::{Schedule, ScheduleEntry, ScheduledItem};
use chrono::{Duration, NaiveDateTime};
use tracing::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Stable per item: the same schedule always yields the same uids.
    pub uid: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub summary: String,
    pub description: String,
}

fn event_uid(item: &ScheduledItem) -> String {
    match &item.entry {
        ScheduleEntry::Goal { goal_id, .. } => format!("{goal_id}@{}", item.date),
        ScheduleEntry::Part {
            goal_id, part_id, ..
        } => format!("{goal_id}.{part_id}@{}", item.date),
        ScheduleEntry::Revision { revision_id, .. } => format!("{revision_id}@{}", item.date),
    }
}

fn event_title(item: &ScheduledItem) -> String {
    match &item.entry {
        ScheduleEntry::Part {
            lesson_title,
            title,
            ..
        } => format!("{lesson_title} - {title}"),
        _ => item.title().to_string(),
    }
}

pub fn calendar_event(item: &ScheduledItem, plan: &Plan, config: &PlannerConfig) -> CalendarEvent {
    let start = item.date.and_time(config.export_day_start);
    let end = Duration::try_minutes(item.duration_minutes)
        .and_then(|length| start.checked_add_signed(length))
        .unwrap_or_else(|| {
            debug!(
                date = %item.date,
                minutes = item.duration_minutes,
                "event end outside the calendar range; clamping"
            );
            NaiveDateTime::MAX
        });

    let mut lines = vec![
        format!("Discipline: {}", item.discipline),
        format!("Subject: {}", item.subject),
    ];
    if let Some(context) = plan.find_goal(item.goal_id()) {
        if let Some(observations) = context.goal.observations.as_deref() {
            lines.push(format!("Observations: {observations}"));
        }
        let link = item
            .part_id()
            .and_then(|part_id| context.goal.find_part(part_id))
            .and_then(|part| part.link.as_deref())
            .or(context.goal.link.as_deref());
        if let Some(link) = link {
            lines.push(format!("Link: {link}"));
        }
    }

    CalendarEvent {
        uid: event_uid(item),
        start,
        end,
        summary: format!("{}: {}", item.kind().label(), event_title(item)),
        description: lines.join("\n"),
    }
}

/// One event per scheduled item, in schedule order.
pub fn calendar_events(
    schedule: &Schedule,
    plan: &Plan,
    config: &PlannerConfig,
) -> Vec<CalendarEvent> {
    schedule
        .items()
        .iter()
        .map(|item| calendar_event(item, plan, config))
        .collect()
}
