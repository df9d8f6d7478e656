pub mod day_fill;

pub use day_fill::{DayFill, ScheduleError};
