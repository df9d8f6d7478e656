use crate::validation::ValidationError;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Weekly study availability: minutes per weekday plus specific rest days.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyRoutine {
    /// Indexed by days from Sunday (0 = Sunday .. 6 = Saturday).
    minutes: [i64; 7],
    rest_days: HashSet<NaiveDate>,
}

/// Serialized form of a [`StudyRoutine`]. Weekday keys follow the
/// `0 = Sunday .. 6 = Saturday` convention.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoutineConfig {
    #[serde(default)]
    pub days: BTreeMap<u8, i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rest_days: Vec<NaiveDate>,
}

impl Default for StudyRoutine {
    fn default() -> Self {
        Self {
            minutes: [0; 7],
            rest_days: HashSet::new(),
        }
    }
}

impl StudyRoutine {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    /// Same number of minutes on each listed weekday.
    pub fn uniform<I>(days: I, minutes: i64) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut routine = Self::default();
        for day in days {
            routine.set_minutes(day, minutes)?;
        }
        Ok(routine)
    }

    pub fn from_config(config: &RoutineConfig) -> Result<Self, ValidationError> {
        let mut routine = Self::default();
        for (&key, &minutes) in &config.days {
            let weekday = Self::weekday_from_index(key).ok_or_else(|| {
                ValidationError::new(format!(
                    "routine weekday {key} is out of range (expected 0 = Sunday .. 6 = Saturday)"
                ))
            })?;
            routine.set_minutes(weekday, minutes)?;
        }
        routine.rest_days = config.rest_days.iter().copied().collect();
        Ok(routine)
    }

    pub fn to_config(&self) -> RoutineConfig {
        RoutineConfig::from(self)
    }

    pub fn weekday_from_index(index: u8) -> Option<Weekday> {
        Self::ALL_WEEKDAYS.get(index as usize).copied()
    }

    pub fn set_minutes(&mut self, weekday: Weekday, minutes: i64) -> Result<(), ValidationError> {
        if !(0..=MINUTES_PER_DAY).contains(&minutes) {
            return Err(ValidationError::new(format!(
                "routine minutes for {weekday} must be within 0..={MINUTES_PER_DAY} (got {minutes})"
            )));
        }
        self.minutes[weekday.num_days_from_sunday() as usize] = minutes;
        Ok(())
    }

    pub fn minutes_for(&self, weekday: Weekday) -> i64 {
        self.minutes[weekday.num_days_from_sunday() as usize]
    }

    pub fn add_rest_day(&mut self, date: NaiveDate) {
        self.rest_days.insert(date);
    }

    pub fn is_rest_day(&self, date: NaiveDate) -> bool {
        self.rest_days.contains(&date)
    }

    /// Minutes available on a concrete date; rest days have none.
    pub fn available_minutes(&self, date: NaiveDate) -> i64 {
        if self.is_rest_day(date) {
            0
        } else {
            self.minutes_for(date.weekday())
        }
    }

    pub fn is_study_day(&self, date: NaiveDate) -> bool {
        self.available_minutes(date) > 0
    }

    /// Largest capacity of any weekday. Nothing longer can ever be placed.
    pub fn max_daily_minutes(&self) -> i64 {
        self.minutes.iter().copied().max().unwrap_or(0)
    }

    pub fn weekly_minutes(&self) -> i64 {
        self.minutes.iter().sum()
    }

    pub fn has_study_time(&self) -> bool {
        self.max_daily_minutes() > 0
    }

    /// First study day strictly after `from`, if one exists within `max_days`.
    pub fn next_study_day(&self, from: NaiveDate, max_days: i64) -> Option<NaiveDate> {
        let mut current = from;
        for _ in 0..max_days {
            current = current.succ_opt()?;
            if self.is_study_day(current) {
                return Some(current);
            }
        }
        None
    }

    pub fn study_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            if self.is_study_day(current) {
                days.push(current);
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        days
    }

    /// Total study minutes offered by the routine over an inclusive date range.
    pub fn capacity_in_range(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        self.study_days_in_range(start, end)
            .into_iter()
            .map(|date| self.available_minutes(date))
            .sum()
    }
}

impl From<&StudyRoutine> for RoutineConfig {
    fn from(routine: &StudyRoutine) -> Self {
        let days = StudyRoutine::ALL_WEEKDAYS
            .iter()
            .enumerate()
            .filter(|(_, weekday)| routine.minutes_for(**weekday) > 0)
            .map(|(idx, weekday)| (idx as u8, routine.minutes_for(*weekday)))
            .collect();

        let mut rest_days: Vec<NaiveDate> = routine.rest_days.iter().copied().collect();
        rest_days.sort();

        Self { days, rest_days }
    }
}
