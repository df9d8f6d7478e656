use super::{PersistenceError, PersistenceResult};
use crate::planner::{Planner, PlanningSnapshot};
use crate::progress::ProgressRecord;
use crate::schedule::{Schedule, ScheduleEntry, ScheduledItem};
use crate::validation;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

pub fn save_snapshot_to_json<P: AsRef<Path>>(planner: &Planner, path: P) -> PersistenceResult<()> {
    let snapshot = planner.to_snapshot();
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_snapshot_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Planner> {
    let file = File::open(path)?;
    let snapshot: PlanningSnapshot = serde_json::from_reader(file)?;
    if let Some(config) = &snapshot.config {
        config
            .validate()
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
    }
    Ok(Planner::from_snapshot(snapshot)?)
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

#[derive(Default, Serialize, Deserialize)]
struct ScheduledItemCsvRecord {
    date: String,
    entry_type: String,
    kind: String,
    goal_id: String,
    part_id: String,
    revision_id: String,
    title: String,
    discipline: String,
    subject: String,
    duration_minutes: i64,
}

impl From<&ScheduledItem> for ScheduledItemCsvRecord {
    fn from(item: &ScheduledItem) -> Self {
        let mut record = ScheduledItemCsvRecord::default();
        record.date = format_date(item.date);
        record.entry_type = item.entry.type_name().to_string();
        record.kind = item.kind().as_str().to_string();
        record.goal_id = item.goal_id().to_string();
        record.part_id = item.part_id().unwrap_or_default().to_string();
        if let ScheduleEntry::Revision { revision_id, .. } = &item.entry {
            record.revision_id = revision_id.clone();
        }
        record.title = item.title().to_string();
        record.discipline = item.discipline.clone();
        record.subject = item.subject.clone();
        record.duration_minutes = item.duration_minutes;
        record
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(schedule: &Schedule, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for item in schedule.items() {
        writer.serialize(ScheduledItemCsvRecord::from(item))?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Default, Serialize, Deserialize)]
struct ProgressCsvRecord {
    goal_id: String,
    #[serde(default)]
    part_id: String,
    completed_at: String,
    #[serde(default)]
    minutes_spent: String,
}

impl From<&ProgressRecord> for ProgressCsvRecord {
    fn from(record: &ProgressRecord) -> Self {
        Self {
            goal_id: record.goal_id.clone(),
            part_id: record.part_id.clone().unwrap_or_default(),
            completed_at: record.completed_at.to_rfc3339(),
            minutes_spent: record
                .minutes_spent
                .map(|m| m.to_string())
                .unwrap_or_default(),
        }
    }
}

impl ProgressCsvRecord {
    fn into_record(self) -> PersistenceResult<ProgressRecord> {
        Ok(ProgressRecord {
            goal_id: self.goal_id.trim().to_string(),
            part_id: parse_string_option(self.part_id),
            completed_at: parse_timestamp(&self.completed_at)?,
            minutes_spent: parse_i64(&self.minutes_spent)?,
        })
    }
}

pub fn save_progress_to_csv<P: AsRef<Path>>(
    records: &[ProgressRecord],
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(ProgressCsvRecord::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_progress_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<ProgressRecord>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<ProgressCsvRecord>() {
        records.push(row?.into_record()?);
    }
    validation::validate_progress(&records)?;
    Ok(records)
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_timestamp(input: &str) -> PersistenceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| PersistenceError::InvalidData(format!("invalid timestamp '{input}': {e}")))
}

fn parse_i64(input: &str) -> PersistenceResult<Option<i64>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    input
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|e| PersistenceError::InvalidData(format!("invalid integer '{input}': {e}")))
}

fn parse_string_option(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.trim().to_string())
    }
}
