use crate::curriculum::GoalKind;
use chrono::{Datelike, Days, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Days between 0001-01-01 and 1970-01-01; polars dates count from the latter.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// What a scheduled slot holds. The discriminant is explicit so consumers match
/// on it rather than probing optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleEntry {
    Goal {
        goal_id: String,
        kind: GoalKind,
        title: String,
    },
    Part {
        goal_id: String,
        part_id: String,
        lesson_title: String,
        title: String,
    },
    Revision {
        revision_id: String,
        source_goal_id: String,
        source_kind: GoalKind,
        interval_index: usize,
        interval_days: i64,
        title: String,
    },
}

impl ScheduleEntry {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScheduleEntry::Goal { .. } => "GOAL",
            ScheduleEntry::Part { .. } => "PART",
            ScheduleEntry::Revision { .. } => "REVISION",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledItem {
    pub date: NaiveDate,
    pub discipline: String,
    pub subject: String,
    pub duration_minutes: i64,
    pub entry: ScheduleEntry,
}

impl ScheduledItem {
    /// Goal the slot belongs to; for revisions, the goal being revised.
    pub fn goal_id(&self) -> &str {
        match &self.entry {
            ScheduleEntry::Goal { goal_id, .. } | ScheduleEntry::Part { goal_id, .. } => goal_id,
            ScheduleEntry::Revision { source_goal_id, .. } => source_goal_id,
        }
    }

    pub fn part_id(&self) -> Option<&str> {
        match &self.entry {
            ScheduleEntry::Part { part_id, .. } => Some(part_id),
            _ => None,
        }
    }

    pub fn title(&self) -> &str {
        match &self.entry {
            ScheduleEntry::Goal { title, .. }
            | ScheduleEntry::Part { title, .. }
            | ScheduleEntry::Revision { title, .. } => title,
        }
    }

    /// Kind shown to the learner. Parts are lessons, revisions are reviews.
    pub fn kind(&self) -> GoalKind {
        match &self.entry {
            ScheduleEntry::Goal { kind, .. } => *kind,
            ScheduleEntry::Part { .. } => GoalKind::Lesson,
            ScheduleEntry::Revision { .. } => GoalKind::Review,
        }
    }

    pub fn is_revision(&self) -> bool {
        matches!(self.entry, ScheduleEntry::Revision { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub item_count: usize,
    pub goal_count: usize,
    pub part_count: usize,
    pub revision_count: usize,
    pub total_minutes: i64,
    pub study_days: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("items={}", self.item_count));
        if self.goal_count > 0 {
            parts.push(format!("goals={}", self.goal_count));
        }
        if self.part_count > 0 {
            parts.push(format!("parts={}", self.part_count));
        }
        if self.revision_count > 0 {
            parts.push(format!("revisions={}", self.revision_count));
        }
        parts.push(format!("minutes={}", self.total_minutes));
        parts.push(format!("days={}", self.study_days));
        if let (Some(first), Some(last)) = (self.first_date, self.last_date) {
            parts.push(format!("span={first}..{last}"));
        }
        parts.join(", ")
    }
}

/// Chronologically ordered study schedule.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    items: Vec<ScheduledItem>,
}

impl Schedule {
    /// Merges day-filled entries with revision entries. The sort is stable, so
    /// entries on the same date keep their generation order (regular first).
    pub fn assemble(regular: Vec<ScheduledItem>, revisions: Vec<ScheduledItem>) -> Self {
        let mut items = regular;
        items.extend(revisions);
        items.sort_by_key(|item| item.date);
        Self { items }
    }

    pub fn items(&self) -> &[ScheduledItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn filtered<F>(&self, predicate: F) -> Schedule
    where
        F: Fn(&ScheduledItem) -> bool,
    {
        Schedule {
            items: self
                .items
                .iter()
                .filter(|item| predicate(item))
                .cloned()
                .collect(),
        }
    }

    /// Entries on exactly this calendar day ("today's goals").
    pub fn on_day(&self, date: NaiveDate) -> Schedule {
        self.filtered(|item| item.date == date)
    }

    /// Entries within an inclusive date range.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Schedule {
        self.filtered(|item| item.date >= from && item.date <= to)
    }

    /// Sunday-to-Saturday week containing `date`.
    pub fn week_of(&self, date: NaiveDate) -> Schedule {
        let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
        let start = date.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        self.between(start, end)
    }

    pub fn month_of(&self, year: i32, month: u32) -> Schedule {
        self.filtered(|item| item.date.year() == year && item.date.month() == month)
    }

    /// Planned minutes on a date, revisions included.
    pub fn day_load(&self, date: NaiveDate) -> i64 {
        self.items
            .iter()
            .filter(|item| item.date == date)
            .map(|item| item.duration_minutes)
            .sum()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.items.first().map(|item| item.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.items.last().map(|item| item.date)
    }

    pub fn summary(&self) -> ScheduleSummary {
        let mut goal_count = 0;
        let mut part_count = 0;
        let mut revision_count = 0;
        let mut days = BTreeSet::new();
        for item in &self.items {
            match item.entry {
                ScheduleEntry::Goal { .. } => goal_count += 1,
                ScheduleEntry::Part { .. } => part_count += 1,
                ScheduleEntry::Revision { .. } => revision_count += 1,
            }
            days.insert(item.date);
        }
        ScheduleSummary {
            item_count: self.items.len(),
            goal_count,
            part_count,
            revision_count,
            total_minutes: self.items.iter().map(|item| item.duration_minutes).sum(),
            study_days: days.len(),
            first_date: self.first_date(),
            last_date: self.last_date(),
        }
    }

    /// Tabular view used for text rendering and analysis.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<i32> = self
            .items
            .iter()
            .map(|item| item.date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
            .collect();
        let types: Vec<&str> = self.items.iter().map(|i| i.entry.type_name()).collect();
        let kinds: Vec<&str> = self.items.iter().map(|i| i.kind().as_str()).collect();
        let goal_ids: Vec<&str> = self.items.iter().map(|i| i.goal_id()).collect();
        let part_ids: Vec<Option<&str>> = self.items.iter().map(|i| i.part_id()).collect();
        let titles: Vec<&str> = self.items.iter().map(|i| i.title()).collect();
        let disciplines: Vec<&str> = self.items.iter().map(|i| i.discipline.as_str()).collect();
        let subjects: Vec<&str> = self.items.iter().map(|i| i.subject.as_str()).collect();
        let durations: Vec<i64> = self.items.iter().map(|i| i.duration_minutes).collect();

        let columns = vec![
            Series::new(PlSmallStr::from_static("date"), dates)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("type"), types).into_column(),
            Series::new(PlSmallStr::from_static("kind"), kinds).into_column(),
            Series::new(PlSmallStr::from_static("goal_id"), goal_ids).into_column(),
            Series::new(PlSmallStr::from_static("part_id"), part_ids).into_column(),
            Series::new(PlSmallStr::from_static("title"), titles).into_column(),
            Series::new(PlSmallStr::from_static("discipline"), disciplines).into_column(),
            Series::new(PlSmallStr::from_static("subject"), subjects).into_column(),
            Series::new(PlSmallStr::from_static("duration_minutes"), durations).into_column(),
        ];
        DataFrame::new(columns)
    }
}
