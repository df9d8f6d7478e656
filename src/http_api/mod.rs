use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    BacklogRow, CalendarEvent, PlanError, Planner, PlanningSnapshot, ProficiencyLevel,
    ProgressRecord, RoutineConfig, Schedule, StudyStats, ValidationError, calendar_events,
};

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(RwLock::new(planner)),
        }
    }

    fn planner(&self) -> Arc<RwLock<Planner>> {
        self.planner.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Invalid(String),
    Unschedulable(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<PlanError> for ApiError {
    fn from(value: PlanError) -> Self {
        match value {
            PlanError::Validation(err) => ApiError::Invalid(err.to_string()),
            PlanError::Schedule(err) => ApiError::Unschedulable(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Unschedulable(message) => {
                let body = Json(ErrorBody {
                    error: "unschedulable",
                    message,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct LevelPayload {
    level: String,
}

#[derive(Debug, Deserialize)]
struct StartQuery {
    start: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    from: NaiveDate,
    to: NaiveDate,
    start: Option<NaiveDate>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/snapshot", get(get_snapshot).put(replace_snapshot))
        .route("/routine", put(update_routine))
        .route("/level", put(update_level))
        .route("/progress", post(record_progress))
        .route("/backlog", get(list_backlog))
        .route("/stats", get(get_stats))
        .route("/schedule", get(get_schedule))
        .route("/schedule/day/:date", get(get_day))
        .route("/schedule/range", get(get_range))
        .route("/events", get(list_events))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, planner: Planner) -> std::io::Result<()> {
    let state = AppState::new(planner);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

fn compute(state: &AppState, start: Option<NaiveDate>) -> Result<Schedule, ApiError> {
    let planner = state.planner();
    let guard = planner.read();
    let start = start.unwrap_or_else(|| guard.effective_start());
    Ok(guard.compute_from(start)?)
}

async fn get_snapshot(State(state): State<AppState>) -> Json<PlanningSnapshot> {
    let planner = state.planner();
    let snapshot = {
        let guard = planner.read();
        guard.to_snapshot()
    };
    Json(snapshot)
}

async fn replace_snapshot(
    State(state): State<AppState>,
    Json(snapshot): Json<PlanningSnapshot>,
) -> Result<Json<PlanningSnapshot>, ApiError> {
    if let Some(config) = &snapshot.config {
        config
            .validate()
            .map_err(|err| ApiError::invalid(err.to_string()))?;
    }
    let replacement = Planner::from_snapshot(snapshot)?;
    let planner = state.planner();
    let current = {
        let mut guard = planner.write();
        *guard = replacement;
        guard.to_snapshot()
    };
    info!(plan = %current.plan.id, "snapshot replaced");
    Ok(Json(current))
}

async fn update_routine(
    State(state): State<AppState>,
    Json(config): Json<RoutineConfig>,
) -> Result<Json<RoutineConfig>, ApiError> {
    let planner = state.planner();
    let current = {
        let mut guard = planner.write();
        guard.set_routine_config(&config)?;
        guard.routine().to_config()
    };
    Ok(Json(current))
}

async fn update_level(
    State(state): State<AppState>,
    Json(payload): Json<LevelPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let level = ProficiencyLevel::from_str(&payload.level)
        .ok_or_else(|| ApiError::invalid(format!("unknown level '{}'", payload.level)))?;
    let planner = state.planner();
    {
        let mut guard = planner.write();
        guard.set_level(level);
    }
    Ok(Json(json!({ "level": level })))
}

async fn record_progress(
    State(state): State<AppState>,
    Json(record): Json<ProgressRecord>,
) -> Result<(StatusCode, Json<ProgressRecord>), ApiError> {
    let planner = state.planner();
    {
        let mut guard = planner.write();
        guard.record_progress(record.clone())?;
    }
    info!(goal_id = %record.goal_id, part_id = ?record.part_id, "progress recorded");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_backlog(State(state): State<AppState>) -> Json<Vec<BacklogRow>> {
    let planner = state.planner();
    let rows = {
        let guard = planner.read();
        guard.backlog()
    };
    Json(rows)
}

async fn get_stats(State(state): State<AppState>) -> Json<StudyStats> {
    let planner = state.planner();
    let stats = {
        let guard = planner.read();
        guard.stats()
    };
    Json(stats)
}

async fn get_schedule(
    State(state): State<AppState>,
    Query(query): Query<StartQuery>,
) -> Result<Json<Schedule>, ApiError> {
    Ok(Json(compute(&state, query.start)?))
}

async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Query(query): Query<StartQuery>,
) -> Result<Json<Schedule>, ApiError> {
    let schedule = compute(&state, query.start)?;
    Ok(Json(schedule.on_day(date)))
}

async fn get_range(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Schedule>, ApiError> {
    if query.from > query.to {
        return Err(ApiError::invalid(format!(
            "range start {} is after range end {}",
            query.from, query.to
        )));
    }
    let schedule = compute(&state, query.start)?;
    Ok(Json(schedule.between(query.from, query.to)))
}

async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<StartQuery>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
    let schedule = compute(&state, query.start)?;
    let planner = state.planner();
    let events = {
        let guard = planner.read();
        calendar_events(&schedule, guard.plan(), guard.config())
    };
    Ok(Json(events))
}
