use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week as it appears in the imported planning header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    #[serde(rename = "Lundi")]
    Monday,
    #[serde(rename = "Mardi")]
    Tuesday,
    #[serde(rename = "Mercredi")]
    Wednesday,
    #[serde(rename = "Jeudi")]
    Thursday,
    #[serde(rename = "Vendredi")]
    Friday,
    #[serde(rename = "Samedi")]
    Saturday,
    #[serde(rename = "Dimanche")]
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Column label used by the planning spreadsheet
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Monday => "Lundi",
            Weekday::Tuesday => "Mardi",
            Weekday::Wednesday => "Mercredi",
            Weekday::Thursday => "Jeudi",
            Weekday::Friday => "Vendredi",
            Weekday::Saturday => "Samedi",
            Weekday::Sunday => "Dimanche",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .iter()
            .copied()
            .find(|day| day.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown weekday: {}", s))
    }
}

/// One imported planning row: an employee and their shift text for each day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(rename = "Salarie")]
    pub employee_name: String,
    #[serde(rename = "Lundi", default)]
    pub monday: Option<String>,
    #[serde(rename = "Mardi", default)]
    pub tuesday: Option<String>,
    #[serde(rename = "Mercredi", default)]
    pub wednesday: Option<String>,
    #[serde(rename = "Jeudi", default)]
    pub thursday: Option<String>,
    #[serde(rename = "Vendredi", default)]
    pub friday: Option<String>,
    #[serde(rename = "Samedi", default)]
    pub saturday: Option<String>,
    #[serde(rename = "Dimanche", default)]
    pub sunday: Option<String>,
    #[serde(rename = "Qualification", default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
}

impl WeeklySchedule {
    /// Create an empty row for an employee
    pub fn new(employee_name: impl Into<String>) -> Self {
        Self {
            employee_name: employee_name.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for a single day cell
    pub fn with_day(mut self, day: Weekday, text: impl Into<String>) -> Self {
        *self.cell_mut(day) = Some(text.into());
        self
    }

    /// Raw text of a day cell
    pub fn cell(&self, day: Weekday) -> Option<&str> {
        match day {
            Weekday::Monday => self.monday.as_deref(),
            Weekday::Tuesday => self.tuesday.as_deref(),
            Weekday::Wednesday => self.wednesday.as_deref(),
            Weekday::Thursday => self.thursday.as_deref(),
            Weekday::Friday => self.friday.as_deref(),
            Weekday::Saturday => self.saturday.as_deref(),
            Weekday::Sunday => self.sunday.as_deref(),
        }
    }

    fn cell_mut(&mut self, day: Weekday) -> &mut Option<String> {
        match day {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }
}

/// The whole imported planning, replaced wholesale on every import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub rows: Vec<WeeklySchedule>,
    pub imported_at: DateTime<Utc>,
}

impl PlanningSnapshot {
    pub fn new(rows: Vec<WeeklySchedule>) -> Self {
        Self {
            rows,
            imported_at: Utc::now(),
        }
    }
}

/// Last day and ride type picked on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningFilters {
    #[serde(rename = "typeTransport")]
    pub ride_type: super::RideType,
    #[serde(rename = "jour")]
    pub day: Weekday,
}

impl Default for PlanningFilters {
    fn default() -> Self {
        Self {
            ride_type: super::RideType::Pickup,
            day: Weekday::Monday,
        }
    }
}
