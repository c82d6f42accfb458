use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder the dashboard shows for contact data the roster does not have
pub const MISSING_FIELD: &str = "Non";

/// An employee who may need a ride
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse", default)]
    pub address: String,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    /// Company name or company id
    #[serde(rename = "societe", default)]
    pub company: String,
    #[serde(rename = "voiturePersonnelle", default)]
    pub personal_car: bool,
    #[serde(rename = "chauffeurNom", default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(rename = "vehiculeChauffeur", default, skip_serializing_if = "Option::is_none")]
    pub driver_vehicle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: phone.into(),
            company: company.into(),
            ..Default::default()
        }
    }

    /// Stand-in record for a planning row with no matching employee
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self::new(name, MISSING_FIELD, MISSING_FIELD, MISSING_FIELD)
    }

    /// Whether address, phone or company still has to be filled in
    pub fn needs_completion(&self) -> bool {
        [&self.address, &self.phone, &self.company]
            .iter()
            .any(|field| is_missing(field))
    }
}

fn is_missing(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == MISSING_FIELD
}

/// Employer company, used for cost splitting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "adresse", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telephone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "matriculef", default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
}

/// A driver and the vehicle they use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(default)]
    pub cin: String,
    #[serde(rename = "telephone", default)]
    pub phone: String,
    #[serde(rename = "societe", default)]
    pub company: String,
    #[serde(rename = "voiture", default)]
    pub vehicle: String,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
