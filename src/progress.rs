use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One completion recorded by the learner.
///
/// A record carrying a `part_id` completes that lesson part; a record without
/// one completes a whole non-lesson goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub goal_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_id: Option<String>,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minutes_spent: Option<i64>,
}

impl ProgressRecord {
    pub fn goal(goal_id: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            goal_id: goal_id.into(),
            part_id: None,
            completed_at,
            minutes_spent: None,
        }
    }

    pub fn part(
        goal_id: impl Into<String>,
        part_id: impl Into<String>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            goal_id: goal_id.into(),
            part_id: Some(part_id.into()),
            completed_at,
            minutes_spent: None,
        }
    }

    pub fn with_minutes_spent(mut self, minutes: i64) -> Self {
        self.minutes_spent = Some(minutes);
        self
    }
}

/// Totals over everything the learner has recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudyStats {
    pub completed_goals: usize,
    pub completed_parts: usize,
    pub total_minutes_spent: i64,
}

/// Lookup index over a progress snapshot.
#[derive(Debug, Clone, Default)]
pub struct ProgressIndex {
    completed_goals: HashSet<String>,
    completed_parts: HashSet<(String, String)>,
    first_completion: BTreeMap<String, DateTime<Utc>>,
    minutes_spent: i64,
}

impl ProgressIndex {
    pub fn build(records: &[ProgressRecord]) -> Self {
        let mut index = Self::default();
        for record in records {
            index.minutes_spent = index
                .minutes_spent
                .saturating_add(record.minutes_spent.unwrap_or(0));
            match &record.part_id {
                Some(part_id) => {
                    index
                        .completed_parts
                        .insert((record.goal_id.clone(), part_id.clone()));
                }
                None => {
                    index.completed_goals.insert(record.goal_id.clone());
                    index
                        .first_completion
                        .entry(record.goal_id.clone())
                        .and_modify(|at| {
                            if record.completed_at < *at {
                                *at = record.completed_at;
                            }
                        })
                        .or_insert(record.completed_at);
                }
            }
        }
        index
    }

    pub fn is_goal_complete(&self, goal_id: &str) -> bool {
        self.completed_goals.contains(goal_id)
    }

    pub fn is_part_complete(&self, goal_id: &str, part_id: &str) -> bool {
        self.completed_parts
            .contains(&(goal_id.to_string(), part_id.to_string()))
    }

    /// Earliest whole-goal completion, used to anchor revision dates.
    pub fn first_completion(&self, goal_id: &str) -> Option<DateTime<Utc>> {
        self.first_completion.get(goal_id).copied()
    }

    pub fn completed_goal_ids(&self) -> impl Iterator<Item = &str> {
        self.first_completion.keys().map(String::as_str)
    }

    pub fn stats(&self) -> StudyStats {
        StudyStats {
            completed_goals: self.completed_goals.len(),
            completed_parts: self.completed_parts.len(),
            total_minutes_spent: self.minutes_spent,
        }
    }
}
