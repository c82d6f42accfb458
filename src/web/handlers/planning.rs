use crate::assignments::{hour_options, HourOption};
use crate::auth::JwtAuth;
use crate::matching::{
    employees_missing_from_roster, match_employees, planning_dashboard, MatchedEmployee,
    PlanningDashboard,
};
use crate::models::{
    PlanningFilters, PlanningSnapshot, RideType, Section, WeeklySchedule, Weekday,
};
use crate::web::{ApiResult, AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    #[serde(rename = "lignes")]
    pub rows: usize,
    /// Planning names with no employee record
    #[serde(rename = "manquants")]
    pub missing: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(rename = "jour")]
    pub day: Option<Weekday>,
    #[serde(rename = "typeTransport")]
    pub ride_type: Option<RideType>,
}

#[derive(Debug, Deserialize)]
pub struct FilterEmployeesRequest {
    #[serde(rename = "jour")]
    pub day: Weekday,
    #[serde(rename = "typeTransport")]
    pub ride_type: RideType,
    /// Names already picked in the booking form
    #[serde(rename = "agentsSelectionnes", default)]
    pub already_selected: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FilterEmployeesResponse {
    pub agents: Vec<MatchedEmployee>,
    #[serde(rename = "heures")]
    pub hours: Vec<HourOption>,
}

async fn planning_rows(state: &AppState) -> ApiResult<Vec<WeeklySchedule>> {
    Ok(state
        .planning
        .load()
        .await?
        .map(|snapshot| snapshot.rows)
        .unwrap_or_default())
}

pub async fn get_planning(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<Json<Option<PlanningSnapshot>>> {
    auth.require(Section::Dashboard)?;
    Ok(Json(state.planning.load().await?))
}

/// Replace the planning with freshly imported rows
pub async fn import_planning(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Json(rows): Json<Vec<WeeklySchedule>>,
) -> ApiResult<Json<ImportSummary>> {
    auth.require(Section::Dashboard)?;

    let snapshot = PlanningSnapshot::new(rows);
    state.planning.save(&snapshot).await?;

    let employees = state.employees.list().await?;
    let missing = employees_missing_from_roster(&snapshot.rows, &employees);
    info!(
        "Planning imported: {} rows, {} without employee record",
        snapshot.rows.len(),
        missing.len()
    );

    Ok(Json(ImportSummary {
        rows: snapshot.rows.len(),
        missing,
    }))
}

pub async fn clear_planning(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<StatusCode> {
    auth.require(Section::Dashboard)?;
    state.planning.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_filters(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<Json<PlanningFilters>> {
    auth.require(Section::Dashboard)?;
    Ok(Json(state.planning.load_filters().await?))
}

pub async fn save_filters(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Json(filters): Json<PlanningFilters>,
) -> ApiResult<Json<PlanningFilters>> {
    auth.require(Section::Dashboard)?;
    state.planning.save_filters(&filters).await?;
    Ok(Json(filters))
}

/// Dashboard for a day and ride type. Missing query values fall back to the
/// last filters used, and the filters in effect are remembered.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<PlanningDashboard>> {
    auth.require(Section::Dashboard)?;

    let stored = state.planning.load_filters().await?;
    let filters = PlanningFilters {
        day: query.day.unwrap_or(stored.day),
        ride_type: query.ride_type.unwrap_or(stored.ride_type),
    };
    if filters != stored {
        state.planning.save_filters(&filters).await?;
    }

    let rows = planning_rows(&state).await?;
    let employees = state.employees.list().await?;
    Ok(Json(planning_dashboard(
        &rows,
        &employees,
        filters.day,
        filters.ride_type,
    )))
}

pub async fn missing_employees(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<Json<Vec<String>>> {
    auth.require(Section::Dashboard)?;
    let rows = planning_rows(&state).await?;
    let employees = state.employees.list().await?;
    Ok(Json(employees_missing_from_roster(&rows, &employees)))
}

/// Employees to offer in the booking form for a day and ride type
pub async fn filter_employees(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Json(request): Json<FilterEmployeesRequest>,
) -> ApiResult<Json<FilterEmployeesResponse>> {
    auth.require(Section::Assignments)?;

    let rows = planning_rows(&state).await?;
    let employees = state.employees.list().await?;
    let already_selected: HashSet<String> = request.already_selected.into_iter().collect();

    let agents = match_employees(
        &employees,
        &rows,
        request.day,
        request.ride_type,
        &already_selected,
    );
    Ok(Json(FilterEmployeesResponse {
        agents,
        hours: hour_options(request.ride_type),
    }))
}
