use crate::assignments::{self, hour_options, CompanyShare, HourOption};
use crate::auth::JwtAuth;
use crate::error::{not_found, validation_error};
use crate::models::{Affectation, AffectationDraft, PaymentStatus, RideType, Section};
use crate::reporting::{
    ride_recap, set_payment_status, validation_view, Recap, RecapFilter, ValidationFilter,
    ValidationView,
};
use crate::web::{ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::cmp::Reverse;

#[derive(Debug, Deserialize)]
pub struct PaymentUpdate {
    #[serde(rename = "statutPaiement")]
    pub status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
pub struct HoursQuery {
    #[serde(rename = "typeTransport")]
    pub ride_type: RideType,
}

/// All assignments, most recently created first
pub async fn list_affectations(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<Json<Vec<Affectation>>> {
    auth.require(Section::Assignments)?;
    let mut affectations = state.affectations.list().await?;
    affectations.sort_by_key(|a| Reverse(a.created_at));
    Ok(Json(affectations))
}

pub async fn create_affectation(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Json(draft): Json<AffectationDraft>,
) -> ApiResult<(StatusCode, Json<Affectation>)> {
    auth.require(Section::Assignments)?;

    let pricing = state.config.read().await.pricing;
    let default_fare = assignments::default_fare(&draft, &pricing);
    let affectation = assignments::new_affectation(draft, default_fare)?;
    let affectation = state.affectations.insert(affectation).await?;
    Ok((StatusCode::CREATED, Json(affectation)))
}

/// Update the form fields of an assignment. Payment status, booking date and
/// creation time stay as stored.
pub async fn update_affectation(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
    Json(changes): Json<Affectation>,
) -> ApiResult<Json<Affectation>> {
    auth.require(Section::Assignments)?;
    if changes.driver.trim().is_empty() {
        return Err(validation_error("A driver is required").into());
    }
    if changes.agents.is_empty() {
        return Err(validation_error("At least one employee must be selected").into());
    }

    let stored = state
        .affectations
        .get(&id)
        .await?
        .ok_or_else(|| not_found("assignment", &id))?;
    let affectation = Affectation {
        id: stored.id,
        date_added: stored.date_added,
        payment_status: stored.payment_status,
        created_at: stored.created_at,
        ..changes
    };
    Ok(Json(state.affectations.update(&id, affectation).await?))
}

pub async fn delete_affectation(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require(Section::Assignments)?;
    state.affectations.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// How the fare of one assignment is shared between companies
pub async fn company_split(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<CompanyShare>>> {
    auth.require(Section::Assignments)?;
    let affectation = state
        .affectations
        .get(&id)
        .await?
        .ok_or_else(|| not_found("assignment", &id))?;
    Ok(Json(assignments::company_split(
        &affectation.agents,
        affectation.fare,
    )))
}

pub async fn hours(
    Extension(auth): Extension<JwtAuth>,
    Query(query): Query<HoursQuery>,
) -> ApiResult<Json<Vec<HourOption>>> {
    auth.require(Section::Assignments)?;
    Ok(Json(hour_options(query.ride_type)))
}

pub async fn recap(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Query(filter): Query<RecapFilter>,
) -> ApiResult<Json<Recap>> {
    auth.require(Section::Assignments)?;
    let affectations = state.affectations.list().await?;
    Ok(Json(ride_recap(&affectations, &filter)))
}

pub async fn validation(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Query(filter): Query<ValidationFilter>,
) -> ApiResult<Json<ValidationView>> {
    auth.require(Section::Validation)?;
    let affectations = state.affectations.list().await?;
    Ok(Json(validation_view(affectations, &filter)))
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
    Json(update): Json<PaymentUpdate>,
) -> ApiResult<Json<Affectation>> {
    auth.require(Section::Validation)?;
    Ok(Json(
        set_payment_status(&state.affectations, &id, update.status).await?,
    ))
}
