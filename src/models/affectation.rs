use super::planning::Weekday;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of ride: collection before a shift or drop-off after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RideType {
    #[serde(rename = "Ramassage")]
    Pickup,
    #[serde(rename = "Départ")]
    DropOff,
}

impl RideType {
    pub fn label(self) -> &'static str {
        match self {
            RideType::Pickup => "Ramassage",
            RideType::DropOff => "Départ",
        }
    }
}

impl fmt::Display for RideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RideType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Ramassage" => Ok(RideType::Pickup),
            "Départ" | "Depart" => Ok(RideType::DropOff),
            other => Err(format!("Unknown ride type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "Non payé")]
    Unpaid,
    #[serde(rename = "Payé")]
    Paid,
}

/// Employee as copied into an assignment at booking time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentAffectation {
    #[serde(rename = "agentNom")]
    pub name: String,
    #[serde(rename = "adresse", default)]
    pub address: String,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    #[serde(rename = "societe", default)]
    pub company: String,
}

impl From<&super::Employee> for AgentAffectation {
    fn from(employee: &super::Employee) -> Self {
        Self {
            name: employee.name.clone(),
            address: employee.address.clone(),
            phone: employee.phone.clone(),
            company: employee.company.clone(),
        }
    }
}

/// A scheduled ride: driver, vehicle, passengers, date, fare and payment status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affectation {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "chauffeur")]
    pub driver: String,
    #[serde(rename = "heure")]
    pub hour: String,
    #[serde(default)]
    pub agents: Vec<AgentAffectation>,
    #[serde(rename = "vehicule", default)]
    pub vehicle: String,
    #[serde(rename = "typeTransport")]
    pub ride_type: RideType,
    #[serde(rename = "jour")]
    pub day: Weekday,
    /// Booking date, DD/MM/YYYY
    #[serde(rename = "dateAjout", default)]
    pub date_added: String,
    /// Date the ride actually happens, DD/MM/YYYY
    #[serde(rename = "dateReelle", default)]
    pub actual_date: String,
    #[serde(rename = "prixCourse", default)]
    pub fare: f64,
    #[serde(rename = "statutPaiement", default)]
    pub payment_status: PaymentStatus,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Assignment as submitted by the booking form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectationDraft {
    #[serde(rename = "chauffeur", default)]
    pub driver: String,
    #[serde(rename = "heure")]
    pub hour: String,
    #[serde(default)]
    pub agents: Vec<AgentAffectation>,
    #[serde(rename = "vehicule", default)]
    pub vehicle: String,
    #[serde(rename = "typeTransport")]
    pub ride_type: RideType,
    #[serde(rename = "jour")]
    pub day: Weekday,
    #[serde(rename = "dateReelle", default, skip_serializing_if = "Option::is_none")]
    pub actual_date: Option<String>,
    #[serde(rename = "prixCourse", default, skip_serializing_if = "Option::is_none")]
    pub fare: Option<f64>,
}
