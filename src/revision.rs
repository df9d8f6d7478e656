use crate::config::PlannerConfig;
use crate::curriculum::{Goal, GoalKind, Plan};
use crate::duration;
use crate::progress::ProgressIndex;
use crate::schedule::{ScheduleEntry, ScheduledItem};
use chrono::{Days, NaiveDate};
use tracing::debug;

/// Parses a comma separated list of day offsets. Tokens that are not
/// non-negative integers are skipped.
pub fn parse_intervals(raw: &str) -> Vec<i64> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<u32>() {
            Ok(days) => Some(days as i64),
            Err(_) => {
                debug!(token, "skipping unparsable revision interval");
                None
            }
        })
        .collect()
}

/// Stable identity of the `index`-th revision of a goal.
pub fn revision_id(goal_id: &str, index: usize) -> String {
    format!("rev-{goal_id}-{index}")
}

fn revision_minutes(goal: &Goal, config: &PlannerConfig) -> i64 {
    if goal.kind == GoalKind::Summary {
        duration::stated_minutes(goal)
    } else {
        config.revision_minutes
    }
}

/// Offsets to use for a goal: the configured list, then multiples of the last
/// offset (when repetition is enabled) until `limit` is passed.
fn offsets_for(goal: &Goal, completed_on: NaiveDate, limit: NaiveDate) -> Vec<i64> {
    let Some(raw) = goal.revision_intervals.as_deref() else {
        return Vec::new();
    };
    let mut offsets = parse_intervals(raw);
    if !goal.repeat_last_interval {
        return offsets;
    }
    let Some(&step) = offsets.last() else {
        return offsets;
    };
    if step == 0 {
        return offsets;
    }
    let mut next = step * 2;
    while due_date(completed_on, next).is_some_and(|due| due <= limit) {
        offsets.push(next);
        next += step;
    }
    offsets
}

/// `None` when the offset runs past the last representable date.
fn due_date(completed_on: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = u64::try_from(offset).ok()?;
    completed_on.checked_add_days(Days::new(days))
}

/// Spaced-repetition entries for every completed goal that has revisions enabled.
///
/// Each goal is anchored on its earliest whole-goal completion, so duplicated
/// records do not duplicate revisions. Entries dated before `horizon_start`
/// are dropped; they are not rescheduled.
pub fn generate_revisions(
    plan: &Plan,
    progress: &ProgressIndex,
    horizon_start: NaiveDate,
    config: &PlannerConfig,
) -> Vec<ScheduledItem> {
    let repeat_limit = due_date(horizon_start, config.revision_repeat_horizon_days)
        .unwrap_or(NaiveDate::MAX);
    let mut revisions = Vec::new();

    for context in plan.goals_in_order() {
        let goal = context.goal;
        if goal.is_lesson() || !goal.revision_enabled {
            continue;
        }
        let Some(completed_at) = progress.first_completion(&goal.id) else {
            continue;
        };
        let completed_on = completed_at.date_naive();
        let minutes = revision_minutes(goal, config);

        for (index, offset) in offsets_for(goal, completed_on, repeat_limit)
            .into_iter()
            .enumerate()
        {
            let Some(due) = due_date(completed_on, offset) else {
                debug!(goal_id = %goal.id, offset, "skipping revision past the calendar range");
                continue;
            };
            if due < horizon_start {
                continue;
            }
            revisions.push(ScheduledItem {
                date: due,
                discipline: context.discipline.name.clone(),
                subject: context.subject.title.clone(),
                duration_minutes: minutes,
                entry: ScheduleEntry::Revision {
                    revision_id: revision_id(&goal.id, index),
                    source_goal_id: goal.id.clone(),
                    source_kind: goal.kind,
                    interval_index: index,
                    interval_days: offset,
                    title: goal.title.clone(),
                },
            });
        }
    }

    for goal_id in progress.completed_goal_ids() {
        if plan.find_goal(goal_id).is_none() {
            debug!(goal_id, "completion references a goal missing from the plan");
        }
    }

    revisions
}
