//! Booking rules for assignments: validation of a new ride, taxi detection
//! and the split of a fare between companies.

use crate::config::Pricing;
use crate::error::{validation_error, AppResult};
use crate::matching::format_assignment_hour;
use crate::models::{Affectation, AffectationDraft, AgentAffectation, PaymentStatus, RideType};
use crate::utils::time::{parse_french_date, today_french};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

/// A company's part of one ride
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyShare {
    #[serde(rename = "societe")]
    pub company: String,
    #[serde(rename = "nombreAgents")]
    pub employee_count: usize,
    #[serde(rename = "prix")]
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourOption {
    pub value: String,
    pub label: String,
}

/// Turn a submitted booking into a stored assignment.
///
/// The booking date is today, the ride date defaults to today and the
/// assignment starts unpaid. `default_fare` applies when the form did not
/// carry a fare.
pub fn new_affectation(draft: AffectationDraft, default_fare: f64) -> AppResult<Affectation> {
    if draft.driver.trim().is_empty() {
        return Err(validation_error("A driver is required"));
    }
    if draft.agents.is_empty() {
        return Err(validation_error("At least one employee must be selected"));
    }

    let today = today_french();
    let actual_date = match draft.actual_date {
        Some(date) if !date.trim().is_empty() => {
            if parse_french_date(&date).is_none() {
                return Err(validation_error(&format!(
                    "Invalid ride date {}, expected DD/MM/YYYY",
                    date
                )));
            }
            date
        }
        _ => today.clone(),
    };

    let fare = draft.fare.unwrap_or(default_fare);
    if fare < 0.0 {
        return Err(validation_error("Fare cannot be negative"));
    }

    Ok(Affectation {
        id: None,
        driver: draft.driver,
        hour: draft.hour,
        agents: draft.agents,
        vehicle: draft.vehicle,
        ride_type: draft.ride_type,
        day: draft.day,
        date_added: today,
        actual_date,
        fare,
        payment_status: PaymentStatus::Unpaid,
        created_at: Some(Utc::now()),
    })
}

/// A ride counts as a taxi ride when the driver or vehicle name says so
pub fn is_taxi(affectation: &Affectation) -> bool {
    is_taxi_ride(&affectation.driver, &affectation.vehicle)
}

fn is_taxi_ride(driver: &str, vehicle: &str) -> bool {
    driver.to_lowercase().contains("taxi") || vehicle.to_lowercase().contains("taxi")
}

/// Fare applied to a booking that does not carry one
pub fn default_fare(draft: &AffectationDraft, pricing: &Pricing) -> f64 {
    if is_taxi_ride(&draft.driver, &draft.vehicle) {
        pricing.taxi_fare
    } else {
        pricing.driver_fare
    }
}

/// Hours offered when booking a ride, in priority order
pub fn hour_options(ride_type: RideType) -> Vec<HourOption> {
    ride_type
        .priority_sequence()
        .iter()
        .map(|&hour| HourOption {
            value: hour.to_string(),
            label: format_assignment_hour(&hour.to_string()),
        })
        .collect()
}

/// Split a fare evenly between the distinct companies of the passengers
pub fn company_split(agents: &[AgentAffectation], fare: f64) -> Vec<CompanyShare> {
    if agents.is_empty() || fare == 0.0 {
        return Vec::new();
    }

    let mut per_company: BTreeMap<&str, usize> = BTreeMap::new();
    for agent in agents {
        *per_company.entry(agent.company.as_str()).or_default() += 1;
    }

    let share = fare / per_company.len() as f64;
    per_company
        .into_iter()
        .map(|(company, employee_count)| CompanyShare {
            company: company.to_string(),
            employee_count,
            amount: share,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn agent(name: &str, company: &str) -> AgentAffectation {
        AgentAffectation {
            name: name.to_string(),
            address: "Tunis".to_string(),
            phone: "1".to_string(),
            company: company.to_string(),
        }
    }

    fn draft() -> AffectationDraft {
        AffectationDraft {
            driver: "Samir".to_string(),
            hour: "22".to_string(),
            agents: vec![agent("Ali", "Sotetel")],
            vehicle: "Partner".to_string(),
            ride_type: RideType::Pickup,
            day: Weekday::Monday,
            actual_date: Some("12/03/2025".to_string()),
            fare: None,
        }
    }

    #[test]
    fn test_new_affectation_defaults() {
        let affectation = new_affectation(draft(), 10.0).unwrap();
        assert_eq!(affectation.fare, 10.0);
        assert_eq!(affectation.payment_status, PaymentStatus::Unpaid);
        assert_eq!(affectation.actual_date, "12/03/2025");
        assert_eq!(affectation.date_added, today_french());
        assert!(affectation.id.is_none());
    }

    #[test]
    fn test_new_affectation_defaults_date_to_today() {
        let mut draft = draft();
        draft.actual_date = None;
        let affectation = new_affectation(draft, 10.0).unwrap();
        assert_eq!(affectation.actual_date, today_french());
    }

    #[test]
    fn test_new_affectation_rejects_incomplete_forms() {
        let mut no_driver = draft();
        no_driver.driver = "  ".to_string();
        assert!(new_affectation(no_driver, 10.0).is_err());

        let mut no_agents = draft();
        no_agents.agents.clear();
        assert!(new_affectation(no_agents, 10.0).is_err());

        let mut bad_date = draft();
        bad_date.actual_date = Some("2025-03-12".to_string());
        assert!(new_affectation(bad_date, 10.0).is_err());
    }

    #[test]
    fn test_is_taxi() {
        let mut affectation = new_affectation(draft(), 10.0).unwrap();
        assert!(!is_taxi(&affectation));
        affectation.vehicle = "TAXI 1234".to_string();
        assert!(is_taxi(&affectation));
        affectation.vehicle = "Partner".to_string();
        affectation.driver = "Taxi Hedi".to_string();
        assert!(is_taxi(&affectation));
    }

    #[test]
    fn test_default_fare() {
        let pricing = Pricing {
            driver_fare: 10.0,
            taxi_fare: 18.0,
        };
        let mut draft = draft();
        assert_eq!(default_fare(&draft, &pricing), 10.0);
        draft.vehicle = "Taxi jaune".to_string();
        assert_eq!(default_fare(&draft, &pricing), 18.0);
    }

    #[test]
    fn test_hour_options() {
        let labels: Vec<String> = hour_options(RideType::Pickup)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["22H", "23H", "06H", "07H"]);
        assert_eq!(hour_options(RideType::DropOff)[2].value, "0");
    }

    #[test]
    fn test_company_split() {
        let agents = vec![
            agent("Ali", "Sotetel"),
            agent("Mona", "Orange"),
            agent("Sami", "Sotetel"),
        ];
        let shares = company_split(&agents, 30.0);
        assert_eq!(
            shares,
            vec![
                CompanyShare {
                    company: "Orange".to_string(),
                    employee_count: 1,
                    amount: 15.0,
                },
                CompanyShare {
                    company: "Sotetel".to_string(),
                    employee_count: 2,
                    amount: 15.0,
                },
            ]
        );
        assert!(company_split(&[], 30.0).is_empty());
        assert!(company_split(&agents, 0.0).is_empty());
    }
}
