use crate::curriculum::{Goal, GoalKind, ProficiencyLevel};

/// Minutes assumed for goals without a usable estimate.
pub const DEFAULT_GOAL_MINUTES: i64 = 30;

fn question_factor(level: ProficiencyLevel) -> i64 {
    match level {
        ProficiencyLevel::Beginner => 10,
        ProficiencyLevel::Intermediate => 6,
        ProficiencyLevel::Advanced => 2,
    }
}

fn statute_factor(level: ProficiencyLevel) -> i64 {
    match level {
        ProficiencyLevel::Beginner => 5,
        ProficiencyLevel::Intermediate => 3,
        ProficiencyLevel::Advanced => 1,
    }
}

/// Minutes a summary or review goal takes: its `pages` field holds minutes directly.
pub fn stated_minutes(goal: &Goal) -> i64 {
    match goal.pages {
        Some(minutes) if minutes > 0 => minutes,
        _ => DEFAULT_GOAL_MINUTES,
    }
}

/// Estimated study time for a whole goal at the given proficiency level.
///
/// Lesson goals are the sum of their parts regardless of level. Page based
/// kinds scale by a per-level factor; statute readings are additionally
/// multiplied by the goal's multiplier (missing or zero counts as 1).
///
/// Returns `None` when the estimate does not fit in an `i64`.
pub fn checked_goal_minutes(goal: &Goal, level: ProficiencyLevel) -> Option<i64> {
    match goal.kind {
        GoalKind::Lesson => goal
            .parts
            .iter()
            .try_fold(0i64, |total, part| total.checked_add(part.duration_minutes)),
        GoalKind::QuestionSet => goal.pages.unwrap_or(0).checked_mul(question_factor(level)),
        GoalKind::StatuteReading => {
            let multiplier = match goal.multiplier {
                Some(value) if value > 0 => value,
                _ => 1,
            };
            goal.pages
                .unwrap_or(0)
                .checked_mul(statute_factor(level))?
                .checked_mul(multiplier)
        }
        GoalKind::Summary | GoalKind::Review => Some(stated_minutes(goal)),
        GoalKind::Material | GoalKind::Other => Some(DEFAULT_GOAL_MINUTES),
    }
}

/// Like [`checked_goal_minutes`], saturating at `i64::MAX`. A saturated
/// estimate never fits a day, so the day filler reports it as unschedulable.
pub fn goal_minutes(goal: &Goal, level: ProficiencyLevel) -> i64 {
    checked_goal_minutes(goal, level).unwrap_or(i64::MAX)
}
