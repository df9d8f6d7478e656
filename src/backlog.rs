use crate::curriculum::{GoalContext, GoalKind, Part, Plan, ProficiencyLevel};
use crate::duration;
use crate::progress::ProgressIndex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A pending unit of work, borrowed from the plan it was resolved from.
#[derive(Debug, Clone, Copy)]
pub enum BacklogEntry<'a> {
    /// A whole non-lesson goal.
    Goal { context: GoalContext<'a> },
    /// One part of a lesson goal.
    Part {
        context: GoalContext<'a>,
        part: &'a Part,
    },
}

impl<'a> BacklogEntry<'a> {
    pub fn context(&self) -> GoalContext<'a> {
        match self {
            BacklogEntry::Goal { context } | BacklogEntry::Part { context, .. } => *context,
        }
    }

    pub fn goal_id(&self) -> &'a str {
        &self.context().goal.id
    }

    pub fn part_id(&self) -> Option<&'a str> {
        match self {
            BacklogEntry::Goal { .. } => None,
            BacklogEntry::Part { part, .. } => Some(&part.id),
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            BacklogEntry::Goal { context } => &context.goal.title,
            BacklogEntry::Part { part, .. } => &part.title,
        }
    }

    /// Parts keep their fixed duration; whole goals go through the estimator.
    pub fn duration(&self, level: ProficiencyLevel) -> i64 {
        match self {
            BacklogEntry::Goal { context } => duration::goal_minutes(context.goal, level),
            BacklogEntry::Part { part, .. } => part.duration_minutes,
        }
    }

    /// `goal` or `goal/part`, for log and error messages.
    pub fn reference(&self) -> String {
        match self.part_id() {
            Some(part_id) => format!("{}/{}", self.goal_id(), part_id),
            None => self.goal_id().to_string(),
        }
    }

    pub fn to_row(&self, level: ProficiencyLevel) -> BacklogRow {
        let context = self.context();
        BacklogRow {
            goal_id: context.goal.id.clone(),
            part_id: self.part_id().map(ToOwned::to_owned),
            kind: context.goal.kind,
            title: self.title().to_string(),
            discipline: context.discipline.name.clone(),
            subject: context.subject.title.clone(),
            duration_minutes: self.duration(level),
        }
    }
}

/// Owned, serializable rendering of a backlog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacklogRow {
    pub goal_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    pub kind: GoalKind,
    pub title: String,
    pub discipline: String,
    pub subject: String,
    pub duration_minutes: i64,
}

/// Flattens the plan into its ordered backlog of unfinished work.
///
/// Lesson goals expand into their parts, in list order and contiguously.
/// Anything with a matching progress record is dropped.
pub fn resolve_backlog<'a>(plan: &'a Plan, progress: &ProgressIndex) -> Vec<BacklogEntry<'a>> {
    let mut backlog = Vec::new();
    for context in plan.goals_in_order() {
        let goal = context.goal;
        if goal.is_lesson() {
            for part in &goal.parts {
                if progress.is_part_complete(&goal.id, &part.id) {
                    continue;
                }
                backlog.push(BacklogEntry::Part { context, part });
            }
        } else if !progress.is_goal_complete(&goal.id) {
            backlog.push(BacklogEntry::Goal { context });
        }
    }
    debug!(
        plan = %plan.id,
        pending = backlog.len(),
        "resolved backlog"
    );
    backlog
}
