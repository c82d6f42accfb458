use crate::auth::JwtAuth;
use crate::config::Pricing;
use crate::models::Section;
use crate::reporting::{financial_report, FinancialReport, ReportFilter};
use crate::web::{ApiResult, AppState};
use axum::{
    extract::{Query, State},
    Extension, Json,
};
use tracing::info;

pub async fn financial(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Query(filter): Query<ReportFilter>,
) -> ApiResult<Json<FinancialReport>> {
    auth.require(Section::Reports)?;
    let affectations = state.affectations.list().await?;
    let companies = state.companies.list().await?;
    Ok(Json(financial_report(&affectations, &companies, &filter)))
}

pub async fn get_pricing(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
) -> ApiResult<Json<Pricing>> {
    auth.require(Section::Reports)?;
    Ok(Json(state.config.read().await.pricing))
}

pub async fn update_pricing(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Json(pricing): Json<Pricing>,
) -> ApiResult<Json<Pricing>> {
    auth.require(Section::Users)?;
    state.config.write().await.set_pricing(pricing)?;
    info!(
        "Fares updated: driver {}, taxi {}",
        pricing.driver_fare, pricing.taxi_fare
    );
    Ok(Json(pricing))
}
