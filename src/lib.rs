pub mod backlog;
pub mod calculations;
pub mod config;
pub mod curriculum;
pub mod duration;
pub mod export;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod persistence;
pub mod planner;
pub mod progress;
pub mod revision;
pub mod routine;
pub mod schedule;
pub mod validation;

pub use backlog::{BacklogEntry, BacklogRow, resolve_backlog};
pub use calculations::{DayFill, ScheduleError};
pub use config::{ConfigError, PlannerConfig};
pub use curriculum::{Discipline, Goal, GoalKind, Part, Plan, ProficiencyLevel, Subject};
pub use duration::goal_minutes;
pub use export::{CalendarEvent, calendar_events};
pub use persistence::{
    PersistenceError, load_progress_from_csv, load_snapshot_from_json, save_progress_to_csv,
    save_schedule_to_csv, save_schedule_to_json, save_snapshot_to_json,
};
pub use planner::{PlanError, Planner, PlanningSnapshot, build_schedule};
pub use progress::{ProgressIndex, ProgressRecord, StudyStats};
pub use revision::generate_revisions;
pub use routine::{RoutineConfig, StudyRoutine};
pub use schedule::{Schedule, ScheduleEntry, ScheduleSummary, ScheduledItem};
pub use validation::ValidationError;
