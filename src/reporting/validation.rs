use crate::error::{not_found, AppResult};
use crate::models::{Affectation, PaymentStatus, RideType};
use crate::store::Repository;
use crate::utils::time::cmp_french_dates_desc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Optional filters of the payment validation screen
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ValidationFilter {
    /// Exact ride date, DD/MM/YYYY
    #[serde(rename = "date", default)]
    pub date: Option<String>,
    #[serde(rename = "typeTransport", default)]
    pub ride_type: Option<RideType>,
    #[serde(rename = "statut", default)]
    pub status: Option<PaymentStatus>,
}

impl ValidationFilter {
    fn matches(&self, affectation: &Affectation) -> bool {
        if let Some(date) = self.date.as_deref().filter(|d| !d.is_empty()) {
            if affectation.actual_date != date {
                return false;
            }
        }
        if self.ride_type.is_some_and(|t| t != affectation.ride_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != affectation.payment_status) {
            return false;
        }
        true
    }
}

/// Counts and amounts over all assignments, regardless of filters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentSummary {
    #[serde(rename = "totalAffectations")]
    pub total: usize,
    #[serde(rename = "totalNonPaye")]
    pub unpaid: usize,
    #[serde(rename = "totalPaye")]
    pub paid: usize,
    #[serde(rename = "montantTotal")]
    pub total_amount: f64,
    #[serde(rename = "montantPaye")]
    pub paid_amount: f64,
    #[serde(rename = "montantNonPaye")]
    pub unpaid_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationView {
    pub affectations: Vec<Affectation>,
    /// Distinct ride dates, newest first
    #[serde(rename = "datesDisponibles")]
    pub available_dates: Vec<String>,
    #[serde(rename = "resume")]
    pub summary: PaymentSummary,
}

/// Unpaid before paid, then newest ride date first
pub fn sort_for_validation(affectations: &mut [Affectation]) {
    affectations.sort_by(|a, b| {
        status_rank(a.payment_status)
            .cmp(&status_rank(b.payment_status))
            .then_with(|| cmp_french_dates_desc(&a.actual_date, &b.actual_date))
    });
}

fn status_rank(status: PaymentStatus) -> u8 {
    match status {
        PaymentStatus::Unpaid => 0,
        PaymentStatus::Paid => 1,
    }
}

pub fn payment_summary(affectations: &[Affectation]) -> PaymentSummary {
    affectations
        .iter()
        .fold(PaymentSummary::default(), |mut summary, affectation| {
            summary.total += 1;
            summary.total_amount += affectation.fare;
            match affectation.payment_status {
                PaymentStatus::Paid => {
                    summary.paid += 1;
                    summary.paid_amount += affectation.fare;
                }
                PaymentStatus::Unpaid => {
                    summary.unpaid += 1;
                    summary.unpaid_amount += affectation.fare;
                }
            }
            summary
        })
}

/// Build the payment validation screen
pub fn validation_view(
    mut affectations: Vec<Affectation>,
    filter: &ValidationFilter,
) -> ValidationView {
    let summary = payment_summary(&affectations);

    let mut available_dates: Vec<String> = affectations
        .iter()
        .map(|a| a.actual_date.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    available_dates.sort_by(|a, b| cmp_french_dates_desc(a, b));

    sort_for_validation(&mut affectations);
    affectations.retain(|a| filter.matches(a));

    ValidationView {
        affectations,
        available_dates,
        summary,
    }
}

/// Mark an assignment paid or unpaid
pub async fn set_payment_status(
    repository: &Repository<Affectation>,
    id: &str,
    status: PaymentStatus,
) -> AppResult<Affectation> {
    let mut affectation = repository
        .get(id)
        .await?
        .ok_or_else(|| not_found("assignment", id))?;

    affectation.payment_status = status;
    let affectation = repository.update(id, affectation).await?;
    info!("Assignment {} marked {:?}", id, status);
    Ok(affectation)
}
