//! CRUD handlers shared by employees, drivers and companies.

use crate::auth::JwtAuth;
use crate::error::{validation_error, AppResult};
use crate::models::{Company, Driver, Employee, Section};
use crate::store::{Record, Repository};
use crate::web::{ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

/// A record type exposed through the generic CRUD routes
pub trait Resource: Record + 'static {
    /// Section a role needs to read or change these records
    const SECTION: Section;

    fn repository(state: &AppState) -> &Repository<Self>;

    fn validate(&self) -> AppResult<()>;

    /// Fill server-side fields of a new record
    fn prepare_new(&mut self) {}
}

fn require_name(name: &str, kind: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(validation_error(&format!("A {} needs a name", kind)));
    }
    Ok(())
}

impl Resource for Employee {
    const SECTION: Section = Section::Employees;

    fn repository(state: &AppState) -> &Repository<Self> {
        &state.employees
    }

    fn validate(&self) -> AppResult<()> {
        require_name(&self.name, Self::KIND)
    }

    fn prepare_new(&mut self) {
        self.created_at = Some(Utc::now());
    }
}

impl Resource for Driver {
    const SECTION: Section = Section::Drivers;

    fn repository(state: &AppState) -> &Repository<Self> {
        &state.drivers
    }

    fn validate(&self) -> AppResult<()> {
        require_name(&self.name, Self::KIND)
    }

    fn prepare_new(&mut self) {
        self.created_at = Some(Utc::now());
    }
}

impl Resource for Company {
    const SECTION: Section = Section::Employees;

    fn repository(state: &AppState) -> &Repository<Self> {
        &state.companies
    }

    fn validate(&self) -> AppResult<()> {
        require_name(&self.name, Self::KIND)
    }
}

pub async fn list_records<T: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<Json<Vec<T>>> {
    auth.require(T::SECTION)?;
    Ok(Json(T::repository(&state).list().await?))
}

pub async fn create_record<T: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Json(mut record): Json<T>,
) -> ApiResult<(StatusCode, Json<T>)> {
    auth.require(T::SECTION)?;
    record.validate()?;
    record.prepare_new();
    let record = T::repository(&state).insert(record).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_record<T: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
    Json(record): Json<T>,
) -> ApiResult<Json<T>> {
    auth.require(T::SECTION)?;
    record.validate()?;
    Ok(Json(T::repository(&state).update(&id, record).await?))
}

pub async fn delete_record<T: Resource>(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require(T::SECTION)?;
    T::repository(&state).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
