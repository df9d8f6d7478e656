use crate::backlog::BacklogEntry;
use crate::config::PlannerConfig;
use crate::curriculum::ProficiencyLevel;
use crate::routine::StudyRoutine;
use crate::schedule::{ScheduleEntry, ScheduledItem};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The item is longer than any day the routine offers, so it can never be placed.
    #[error("item {item} needs {duration_minutes} min, routine max is {max_daily_minutes} per day")]
    Unschedulable {
        item: String,
        duration_minutes: i64,
        max_daily_minutes: i64,
    },
    /// The cursor reached the scan cap before the backlog was placed.
    #[error("scanned {scanned_days} days with item {item} unplaced ({remaining} remaining)")]
    ScanLimitExceeded {
        item: String,
        scanned_days: i64,
        remaining: usize,
    },
}

/// Greedy, order-preserving assignment of backlog entries to study days.
///
/// Within a day entries are taken in backlog order while they fit. The first
/// entry that does not fit closes the day, even when a later, smaller entry
/// would; entries are never split or reordered.
pub struct DayFill<'a> {
    routine: &'a StudyRoutine,
    level: ProficiencyLevel,
    config: &'a PlannerConfig,
}

impl<'a> DayFill<'a> {
    pub fn new(
        routine: &'a StudyRoutine,
        level: ProficiencyLevel,
        config: &'a PlannerConfig,
    ) -> Self {
        Self {
            routine,
            level,
            config,
        }
    }

    pub fn execute(
        &self,
        backlog: &[BacklogEntry<'_>],
        start: NaiveDate,
    ) -> Result<Vec<ScheduledItem>, ScheduleError> {
        if backlog.is_empty() {
            return Ok(Vec::new());
        }
        if !self.routine.has_study_time() {
            warn!(
                pending = backlog.len(),
                "routine has no study time; nothing scheduled"
            );
            return Ok(Vec::new());
        }

        let durations: Vec<i64> = backlog
            .iter()
            .map(|entry| entry.duration(self.level))
            .collect();
        self.check_capacity(backlog, &durations)?;

        let mut scheduled = Vec::with_capacity(backlog.len());
        let mut cursor = start;
        let mut scanned_days: i64 = 0;
        let mut pointer = 0;

        while pointer < backlog.len() {
            if scanned_days >= self.config.max_scan_days {
                return Err(ScheduleError::ScanLimitExceeded {
                    item: backlog[pointer].reference(),
                    scanned_days,
                    remaining: backlog.len() - pointer,
                });
            }

            let mut remaining = self.routine.available_minutes(cursor);
            if remaining > 0 {
                while pointer < backlog.len() && durations[pointer] <= remaining {
                    scheduled.push(to_scheduled(&backlog[pointer], cursor, durations[pointer]));
                    remaining -= durations[pointer];
                    pointer += 1;
                }
            }

            scanned_days += 1;
            if pointer < backlog.len() {
                cursor = cursor.succ_opt().ok_or_else(|| ScheduleError::ScanLimitExceeded {
                    item: backlog[pointer].reference(),
                    scanned_days,
                    remaining: backlog.len() - pointer,
                })?;
            }
        }

        debug!(placed = scheduled.len(), scanned_days, "day fill complete");
        Ok(scheduled)
    }

    fn check_capacity(
        &self,
        backlog: &[BacklogEntry<'_>],
        durations: &[i64],
    ) -> Result<(), ScheduleError> {
        let max_daily_minutes = self.routine.max_daily_minutes();
        for (entry, &duration_minutes) in backlog.iter().zip(durations) {
            if duration_minutes > max_daily_minutes {
                return Err(ScheduleError::Unschedulable {
                    item: entry.reference(),
                    duration_minutes,
                    max_daily_minutes,
                });
            }
        }
        Ok(())
    }
}

fn to_scheduled(entry: &BacklogEntry<'_>, date: NaiveDate, duration_minutes: i64) -> ScheduledItem {
    let context = entry.context();
    let entry = match entry {
        BacklogEntry::Goal { context } => ScheduleEntry::Goal {
            goal_id: context.goal.id.clone(),
            kind: context.goal.kind,
            title: context.goal.title.clone(),
        },
        BacklogEntry::Part { context, part } => ScheduleEntry::Part {
            goal_id: context.goal.id.clone(),
            part_id: part.id.clone(),
            lesson_title: context.goal.title.clone(),
            title: part.title.clone(),
        },
    };
    ScheduledItem {
        date,
        discipline: context.discipline.name.clone(),
        subject: context.subject.title.clone(),
        duration_minutes,
        entry,
    }
}
