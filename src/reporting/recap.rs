use crate::models::{Affectation, RideType};
use crate::utils::time::cmp_french_dates_desc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecapFilter {
    /// Part of a DD/MM/YYYY date, e.g. "03/2025"
    #[serde(rename = "date", default)]
    pub date: Option<String>,
    #[serde(rename = "typeTransport", default)]
    pub ride_type: Option<RideType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecapTotals {
    #[serde(rename = "affectations")]
    pub assignments: usize,
    #[serde(rename = "agents")]
    pub employees: usize,
    #[serde(rename = "ramassages")]
    pub pickups: usize,
    #[serde(rename = "departs")]
    pub drop_offs: usize,
    #[serde(rename = "prixTotal")]
    pub total_fare: f64,
    #[serde(rename = "prixMoyen")]
    pub average_fare: f64,
}

impl RecapTotals {
    fn of<'a>(affectations: impl IntoIterator<Item = &'a Affectation>) -> Self {
        let mut totals = affectations
            .into_iter()
            .fold(RecapTotals::default(), |mut totals, a| {
                totals.assignments += 1;
                totals.employees += a.agents.len();
                match a.ride_type {
                    RideType::Pickup => totals.pickups += 1,
                    RideType::DropOff => totals.drop_offs += 1,
                }
                totals.total_fare += a.fare;
                totals
            });
        if totals.assignments > 0 {
            totals.average_fare = totals.total_fare / totals.assignments as f64;
        }
        totals
    }
}

/// Rides of one date, ordered by hour
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecapDay {
    pub date: String,
    pub affectations: Vec<Affectation>,
    pub totals: RecapTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recap {
    #[serde(rename = "jours")]
    pub days: Vec<RecapDay>,
    #[serde(rename = "global")]
    pub overall: RecapTotals,
    #[serde(rename = "filtre")]
    pub filtered: RecapTotals,
}

fn hour_key(hour: &str) -> u32 {
    hour.trim().parse().unwrap_or(u32::MAX)
}

/// Group rides by date, newest first.
///
/// A date is kept when it contains the filter text and, with a ride type
/// filter, when at least one of its rides has that type.
pub fn ride_recap(affectations: &[Affectation], filter: &RecapFilter) -> Recap {
    let overall = RecapTotals::of(affectations);

    let mut by_date: HashMap<&str, Vec<&Affectation>> = HashMap::new();
    for affectation in affectations {
        by_date
            .entry(affectation.actual_date.as_str())
            .or_default()
            .push(affectation);
    }

    let date_filter = filter.date.as_deref().unwrap_or("");
    let mut dates: Vec<&str> = by_date
        .iter()
        .filter(|(date, _)| date.contains(date_filter))
        .filter(|(_, rides)| match filter.ride_type {
            Some(ride_type) => rides.iter().any(|a| a.ride_type == ride_type),
            None => true,
        })
        .map(|(date, _)| *date)
        .collect();
    dates.sort_by(|a, b| cmp_french_dates_desc(a, b).then_with(|| a.cmp(b)));

    let days: Vec<RecapDay> = dates
        .into_iter()
        .map(|date| {
            let mut rides: Vec<Affectation> =
                by_date[date].iter().map(|a| (*a).clone()).collect();
            rides.sort_by_key(|a| hour_key(&a.hour));
            RecapDay {
                date: date.to_string(),
                totals: RecapTotals::of(&rides),
                affectations: rides,
            }
        })
        .collect();

    let filtered = RecapTotals::of(days.iter().flat_map(|day| day.affectations.iter()));

    Recap {
        days,
        overall,
        filtered,
    }
}
