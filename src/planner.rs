use crate::backlog::{self, BacklogRow};
use crate::calculations::{DayFill, ScheduleError};
use crate::config::PlannerConfig;
use crate::curriculum::{Plan, ProficiencyLevel};
use crate::progress::{ProgressIndex, ProgressRecord, StudyStats};
use crate::revision;
use crate::routine::{RoutineConfig, StudyRoutine};
use crate::schedule::Schedule;
use crate::validation::{self, ValidationError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Runs the whole pipeline on one consistent snapshot of the inputs.
///
/// backlog resolution → day filling, revision generation → aggregation.
/// Nothing is cached between calls; identical inputs give identical output.
pub fn build_schedule(
    plan: &Plan,
    routine: &StudyRoutine,
    level: ProficiencyLevel,
    progress: &[ProgressRecord],
    start: NaiveDate,
    config: &PlannerConfig,
) -> Result<Schedule, PlanError> {
    validation::validate_plan(plan)?;
    validation::validate_progress(progress)?;

    let index = ProgressIndex::build(progress);
    let backlog = backlog::resolve_backlog(plan, &index);
    let regular = DayFill::new(routine, level, config).execute(&backlog, start)?;
    let revisions = revision::generate_revisions(plan, &index, start, config);
    let schedule = Schedule::assemble(regular, revisions);

    info!(
        plan = %plan.id,
        %level,
        %start,
        summary = %schedule.summary().to_cli_summary(),
        "schedule built"
    );
    Ok(schedule)
}

/// Serializable bundle of every planner input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub plan: Plan,
    #[serde(default)]
    pub routine: RoutineConfig,
    #[serde(default)]
    pub level: ProficiencyLevel,
    #[serde(default)]
    pub progress: Vec<ProgressRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<PlannerConfig>,
}

/// A learner's planning inputs held together, recomputed on demand.
#[derive(Debug, Clone)]
pub struct Planner {
    plan: Plan,
    routine: StudyRoutine,
    level: ProficiencyLevel,
    progress: Vec<ProgressRecord>,
    start_date: Option<NaiveDate>,
    config: PlannerConfig,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(Plan::default())
    }
}

impl Planner {
    pub fn new(plan: Plan) -> Self {
        Self {
            plan,
            routine: StudyRoutine::default(),
            level: ProficiencyLevel::default(),
            progress: Vec::new(),
            start_date: None,
            config: PlannerConfig::default(),
        }
    }

    pub fn from_snapshot(snapshot: PlanningSnapshot) -> Result<Self, ValidationError> {
        validation::validate_plan(&snapshot.plan)?;
        validation::validate_progress(&snapshot.progress)?;
        let routine = StudyRoutine::from_config(&snapshot.routine)?;
        Ok(Self {
            plan: snapshot.plan,
            routine,
            level: snapshot.level,
            progress: snapshot.progress,
            start_date: snapshot.start_date,
            config: snapshot.config.unwrap_or_default(),
        })
    }

    pub fn to_snapshot(&self) -> PlanningSnapshot {
        PlanningSnapshot {
            plan: self.plan.clone(),
            routine: self.routine.to_config(),
            level: self.level,
            progress: self.progress.clone(),
            start_date: self.start_date,
            config: Some(self.config.clone()),
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn routine(&self) -> &StudyRoutine {
        &self.routine
    }

    pub fn level(&self) -> ProficiencyLevel {
        self.level
    }

    pub fn progress(&self) -> &[ProgressRecord] {
        &self.progress
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn set_plan(&mut self, plan: Plan) -> Result<(), ValidationError> {
        validation::validate_plan(&plan)?;
        self.plan = plan;
        Ok(())
    }

    pub fn set_routine(&mut self, routine: StudyRoutine) {
        self.routine = routine;
    }

    pub fn set_routine_config(&mut self, config: &RoutineConfig) -> Result<(), ValidationError> {
        self.routine = StudyRoutine::from_config(config)?;
        Ok(())
    }

    pub fn set_level(&mut self, level: ProficiencyLevel) {
        self.level = level;
    }

    pub fn set_start_date(&mut self, start: Option<NaiveDate>) {
        self.start_date = start;
    }

    pub fn set_config(&mut self, config: PlannerConfig) {
        self.config = config;
    }

    pub fn record_progress(&mut self, record: ProgressRecord) -> Result<(), ValidationError> {
        validation::validate_progress(std::slice::from_ref(&record))?;
        self.progress.push(record);
        Ok(())
    }

    /// Explicit start date, or today in local time.
    pub fn effective_start(&self) -> NaiveDate {
        self.start_date.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn backlog(&self) -> Vec<BacklogRow> {
        let index = ProgressIndex::build(&self.progress);
        backlog::resolve_backlog(&self.plan, &index)
            .iter()
            .map(|entry| entry.to_row(self.level))
            .collect()
    }

    /// Completion counts and minutes spent, summed over the recorded progress.
    pub fn stats(&self) -> StudyStats {
        ProgressIndex::build(&self.progress).stats()
    }

    pub fn compute(&self) -> Result<Schedule, PlanError> {
        self.compute_from(self.effective_start())
    }

    pub fn compute_from(&self, start: NaiveDate) -> Result<Schedule, PlanError> {
        build_schedule(
            &self.plan,
            &self.routine,
            self.level,
            &self.progress,
            start,
            &self.config,
        )
    }
}
