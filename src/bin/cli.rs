use chrono::{NaiveDate, Utc};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use study_planner::{
    ConfigError, Planner, PlannerConfig, ProficiencyLevel, ProgressRecord, Schedule,
    calendar_events, load_progress_from_csv, load_snapshot_from_json, routine::StudyRoutine,
    save_progress_to_csv, save_schedule_to_csv, save_schedule_to_json, save_snapshot_to_json,
};
use tracing_subscriber::EnvFilter;

const EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Date(days) => NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE)
            .map(|d| d.to_string())
            .unwrap_or_default(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, value) in row.iter().enumerate() {
            if value.len() > widths[ci] {
                widths[ci] = value.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_schedule(schedule: &Schedule) {
    match schedule.to_dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Render error: {}", e),
    }
    println!("({})", schedule.summary().to_cli_summary());
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <json_path>                   Load a planning snapshot\n  save <json_path>                   Save the current planning snapshot\n  config <json_path>                 Load planner settings from JSON\n  level <beginner|intermediate|advanced>\n                                     Set proficiency level\n  routine show                       Show weekly study minutes\n  routine <weekday 0-6> <minutes>    Set minutes for a weekday (0 = Sunday)\n  rest <YYYY-MM-DD>                  Mark a date as a rest day\n  start <YYYY-MM-DD|today>           Set the scheduling start date\n  done <goal_id> [part_id]           Record a completion now\n  progress import <csv_path>         Append progress records from CSV\n  progress export <csv_path>         Write progress records to CSV\n  backlog                            List pending goals and parts\n  stats                              Show completion totals and minutes spent\n  show                               Compute and show the full schedule\n  day <YYYY-MM-DD>                   Show one day\n  week <YYYY-MM-DD>                  Show the week containing a date\n  month <YYYY> <MM>                  Show one month\n  range <from> <to>                  Show an inclusive date range\n  events                             List calendar events\n  export <json|csv> <path>           Write the schedule to disk\n  quit|exit                          Exit"
    );
}

fn print_routine(routine: &StudyRoutine) {
    let config = routine.to_config();
    let names = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    for (idx, name) in names.iter().enumerate() {
        let minutes = config.days.get(&(idx as u8)).copied().unwrap_or(0);
        println!("  {idx} {name}: {minutes} min");
    }
    if !config.rest_days.is_empty() {
        let rest = config
            .rest_days
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  rest days: {rest}");
    }
}

/// Layers the `STUDY_PLANNER_*` overrides on `config` and installs it if it still validates.
fn apply_config(planner: &mut Planner, config: PlannerConfig) -> Result<(), ConfigError> {
    let config = config.with_env_overrides();
    config.validate()?;
    planner.set_config(config);
    Ok(())
}

fn compute(planner: &Planner) -> Option<Schedule> {
    match planner.compute() {
        Ok(schedule) => Some(schedule),
        Err(e) => {
            println!("Schedule error: {}", e);
            None
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("study_planner=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut planner = Planner::default();
    if let Err(e) = apply_config(&mut planner, PlannerConfig::default()) {
        println!("Config error: {} (using defaults)", e);
    }

    println!("Study Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "load" => match parts.next() {
                Some(path) => match load_snapshot_from_json(path) {
                    Ok(loaded) => {
                        planner = loaded;
                        let config = planner.config().clone();
                        if let Err(e) = apply_config(&mut planner, config) {
                            println!("Config error: {} (keeping snapshot settings)", e);
                        }
                        println!(
                            "Snapshot loaded from {} (plan '{}', {} goals).",
                            path,
                            planner.plan().name,
                            planner.plan().goal_count()
                        );
                    }
                    Err(e) => println!("Load error: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "save" => match parts.next() {
                Some(path) => match save_snapshot_to_json(&planner, path) {
                    Ok(()) => println!("Snapshot saved to {}.", path),
                    Err(e) => println!("Save error: {}", e),
                },
                None => println!("Usage: save <json_path>"),
            },
            "config" => match parts.next() {
                Some(path) => match PlannerConfig::from_json_file(path) {
                    Ok(config) => match apply_config(&mut planner, config) {
                        Ok(()) => println!("Settings loaded from {}.", path),
                        Err(e) => println!("Config error: {}", e),
                    },
                    Err(e) => println!("Config error: {}", e),
                },
                None => println!("Usage: config <json_path>"),
            },
            "level" => match parts.next().and_then(ProficiencyLevel::from_str) {
                Some(level) => {
                    planner.set_level(level);
                    println!("Level set to {}.", level);
                }
                None => println!("Usage: level <beginner|intermediate|advanced>"),
            },
            "routine" => {
                let day_s = parts.next();
                let minutes_s = parts.next();
                match (day_s, minutes_s) {
                    (Some("show"), _) | (None, _) => print_routine(planner.routine()),
                    (Some(day_s), Some(minutes_s)) => {
                        let weekday = day_s
                            .parse::<u8>()
                            .ok()
                            .and_then(StudyRoutine::weekday_from_index);
                        let minutes = minutes_s.parse::<i64>().ok();
                        match (weekday, minutes) {
                            (Some(weekday), Some(minutes)) => {
                                let mut routine = planner.routine().clone();
                                match routine.set_minutes(weekday, minutes) {
                                    Ok(()) => {
                                        planner.set_routine(routine);
                                        println!("{} set to {} minutes.", weekday, minutes);
                                    }
                                    Err(e) => println!("Error: {}", e),
                                }
                            }
                            _ => println!("Usage: routine <weekday 0-6> <minutes>"),
                        }
                    }
                    _ => println!("Usage: routine <weekday 0-6> <minutes>"),
                }
            }
            "rest" => match parts.next().and_then(parse_date) {
                Some(date) => {
                    let mut routine = planner.routine().clone();
                    routine.add_rest_day(date);
                    planner.set_routine(routine);
                    println!("{} marked as rest day.", date);
                }
                None => println!("Usage: rest <YYYY-MM-DD>"),
            },
            "start" => match parts.next() {
                Some("today") => {
                    planner.set_start_date(None);
                    println!("Start date follows today.");
                }
                Some(date_s) => match parse_date(date_s) {
                    Some(date) => {
                        planner.set_start_date(Some(date));
                        println!("Start date set to {}.", date);
                    }
                    None => println!("Invalid date (YYYY-MM-DD)"),
                },
                None => println!("Usage: start <YYYY-MM-DD|today>"),
            },
            "done" => match parts.next() {
                Some(goal_id) => {
                    let record = match parts.next() {
                        Some(part_id) => ProgressRecord::part(goal_id, part_id, Utc::now()),
                        None => ProgressRecord::goal(goal_id, Utc::now()),
                    };
                    match planner.record_progress(record) {
                        Ok(()) => println!("Completion recorded."),
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("Usage: done <goal_id> [part_id]"),
            },
            "progress" => match (parts.next(), parts.next()) {
                (Some("import"), Some(path)) => match load_progress_from_csv(path) {
                    Ok(records) => {
                        let count = records.len();
                        let mut failed = false;
                        for record in records {
                            if let Err(e) = planner.record_progress(record) {
                                println!("Error: {}", e);
                                failed = true;
                                break;
                            }
                        }
                        if !failed {
                            println!("Imported {} progress records.", count);
                        }
                    }
                    Err(e) => println!("Import error: {}", e),
                },
                (Some("export"), Some(path)) => {
                    match save_progress_to_csv(planner.progress(), path) {
                        Ok(()) => println!("Progress saved to {}.", path),
                        Err(e) => println!("Export error: {}", e),
                    }
                }
                _ => println!("Usage: progress <import|export> <csv_path>"),
            },
            "backlog" => {
                let rows = planner.backlog();
                if rows.is_empty() {
                    println!("Backlog is empty.");
                }
                for (idx, row) in rows.iter().enumerate() {
                    let reference = match &row.part_id {
                        Some(part_id) => format!("{}/{}", row.goal_id, part_id),
                        None => row.goal_id.clone(),
                    };
                    println!(
                        "{:>3}. [{}] {} - {} ({} min) {} / {}",
                        idx + 1,
                        row.kind,
                        reference,
                        row.title,
                        row.duration_minutes,
                        row.discipline,
                        row.subject
                    );
                }
            }
            "stats" => {
                let stats = planner.stats();
                println!(
                    "Completed goals: {}\nCompleted parts: {}\nMinutes spent: {}",
                    stats.completed_goals, stats.completed_parts, stats.total_minutes_spent
                );
            }
            "show" => {
                if let Some(schedule) = compute(&planner) {
                    print_schedule(&schedule);
                }
            }
            "day" | "week" => match parts.next().and_then(parse_date) {
                Some(date) => {
                    if let Some(schedule) = compute(&planner) {
                        let view = if cmd == "day" {
                            schedule.on_day(date)
                        } else {
                            schedule.week_of(date)
                        };
                        print_schedule(&view);
                    }
                }
                None => println!("Usage: {} <YYYY-MM-DD>", cmd),
            },
            "month" => {
                let year = parts.next().and_then(|s| s.parse::<i32>().ok());
                let month = parts.next().and_then(|s| s.parse::<u32>().ok());
                match (year, month) {
                    (Some(year), Some(month)) if (1..=12).contains(&month) => {
                        if let Some(schedule) = compute(&planner) {
                            print_schedule(&schedule.month_of(year, month));
                        }
                    }
                    _ => println!("Usage: month <YYYY> <MM>"),
                }
            }
            "range" => {
                let from = parts.next().and_then(parse_date);
                let to = parts.next().and_then(parse_date);
                match (from, to) {
                    (Some(from), Some(to)) if from <= to => {
                        if let Some(schedule) = compute(&planner) {
                            print_schedule(&schedule.between(from, to));
                        }
                    }
                    _ => println!("Usage: range <from> <to> (YYYY-MM-DD, from <= to)"),
                }
            }
            "events" => {
                if let Some(schedule) = compute(&planner) {
                    for event in calendar_events(&schedule, planner.plan(), planner.config()) {
                        println!("{} -> {}  {}", event.start, event.end, event.summary);
                    }
                }
            }
            "export" => {
                let fmt = parts.next();
                let path = parts.next();
                match (fmt, path) {
                    (Some(fmt), Some(path)) => {
                        let Some(schedule) = compute(&planner) else {
                            continue;
                        };
                        let result = match fmt {
                            "json" => save_schedule_to_json(&schedule, path),
                            "csv" => save_schedule_to_csv(&schedule, path),
                            _ => {
                                println!("Unknown format '{}'. Use json or csv.", fmt);
                                continue;
                            }
                        };
                        match result {
                            Ok(()) => println!("Schedule exported to {}.", path),
                            Err(e) => println!("Export error: {}", e),
                        }
                    }
                    _ => println!("Usage: export <json|csv> <path>"),
                }
            }
            _ => println!("Unknown command. Type 'help' for a list of commands."),
        }
    }
}
