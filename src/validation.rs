use crate::curriculum::{Goal, Plan, ProficiencyLevel};
use crate::duration;
use crate::progress::ProgressRecord;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn require_id(kind: &str, id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::new(format!("{kind} has an empty id")));
    }
    Ok(())
}

fn require_unique_orders<I>(scope: &str, orders: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (i32, String)>,
{
    let mut seen = HashSet::new();
    for (order, id) in orders {
        if !seen.insert(order) {
            return Err(ValidationError::new(format!(
                "{scope} contains duplicate order {order} (at '{id}')"
            )));
        }
    }
    Ok(())
}

pub fn validate_goal(goal: &Goal) -> Result<(), ValidationError> {
    require_id("goal", &goal.id)?;

    if let Some(pages) = goal.pages {
        if pages < 0 {
            return Err(ValidationError::new(format!(
                "goal {} has negative pages {}",
                goal.id, pages
            )));
        }
    }

    if let Some(multiplier) = goal.multiplier {
        if multiplier < 0 {
            return Err(ValidationError::new(format!(
                "goal {} has negative multiplier {}",
                goal.id, multiplier
            )));
        }
    }

    let mut part_ids = HashSet::with_capacity(goal.parts.len());
    for part in &goal.parts {
        if part.id.trim().is_empty() {
            return Err(ValidationError::new(format!(
                "goal {} has a part with an empty id",
                goal.id
            )));
        }
        if !part_ids.insert(part.id.as_str()) {
            return Err(ValidationError::new(format!(
                "goal {} has duplicate part id {}",
                goal.id, part.id
            )));
        }
        if part.duration_minutes < 0 {
            return Err(ValidationError::new(format!(
                "part {} of goal {} has negative duration {}",
                part.id, goal.id, part.duration_minutes
            )));
        }
    }

    for level in [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
    ] {
        if duration::checked_goal_minutes(goal, level).is_none() {
            return Err(ValidationError::new(format!(
                "goal {} has a duration estimate too large to represent at level {}",
                goal.id, level
            )));
        }
    }

    Ok(())
}

/// Structural checks on a plan: ids present and unique, sibling orders strictly
/// increasing once sorted, and no negative quantities.
pub fn validate_plan(plan: &Plan) -> Result<(), ValidationError> {
    require_unique_orders(
        &format!("plan {}", plan.id),
        plan.disciplines.iter().map(|d| (d.order, d.id.clone())),
    )?;

    let mut goal_ids = HashSet::with_capacity(plan.goal_count());
    for discipline in &plan.disciplines {
        require_id("discipline", &discipline.id)?;
        require_unique_orders(
            &format!("discipline {}", discipline.id),
            discipline.subjects.iter().map(|s| (s.order, s.id.clone())),
        )?;

        for subject in &discipline.subjects {
            require_id("subject", &subject.id)?;
            require_unique_orders(
                &format!("subject {}", subject.id),
                subject.goals.iter().map(|g| (g.order, g.id.clone())),
            )?;

            for goal in &subject.goals {
                validate_goal(goal)?;
                if !goal_ids.insert(goal.id.as_str()) {
                    return Err(ValidationError::new(format!(
                        "duplicate goal id {}",
                        goal.id
                    )));
                }
            }
        }
    }
    Ok(())
}

pub fn validate_progress(records: &[ProgressRecord]) -> Result<(), ValidationError> {
    for (idx, record) in records.iter().enumerate() {
        if record.goal_id.trim().is_empty() {
            return Err(ValidationError::new(format!(
                "progress record #{idx} has an empty goal id"
            )));
        }
        if let Some(part_id) = &record.part_id {
            if part_id.trim().is_empty() {
                return Err(ValidationError::new(format!(
                    "progress record #{idx} for goal {} has an empty part id",
                    record.goal_id
                )));
            }
        }
        if let Some(minutes) = record.minutes_spent {
            if minutes < 0 {
                return Err(ValidationError::new(format!(
                    "progress record #{idx} for goal {} has negative minutes_spent {}",
                    record.goal_id, minutes
                )));
            }
        }
    }
    Ok(())
}
