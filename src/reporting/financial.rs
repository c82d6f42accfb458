//! Financial report: fares per day and per company over a filtered set of
//! assignments.

use crate::assignments::is_taxi;
use crate::models::{Affectation, Company, RideType};
use crate::utils::time::{cmp_french_dates_desc, parse_french_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Company label used when an employee has no company
pub const UNSPECIFIED_COMPANY: &str = "Non spécifié";

/// Number of best days listed in the general statistics
const TOP_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Taxi,
    #[serde(alias = "autre", alias = "autres")]
    Regular,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportFilter {
    /// Inclusive lower bound on the ride date
    #[serde(rename = "dateDebut", default)]
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on the ride date
    #[serde(rename = "dateFin", default)]
    pub end: Option<NaiveDate>,
    #[serde(rename = "societe", default)]
    pub company: Option<String>,
    #[serde(rename = "typeTransport", default)]
    pub ride_type: Option<RideType>,
    #[serde(rename = "typeChauffeur", default)]
    pub driver_kind: Option<DriverKind>,
}

/// One passenger of a ride, as billed to their company
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BilledEmployee {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "societe")]
    pub company: String,
    #[serde(rename = "adresse")]
    pub address: String,
    #[serde(rename = "telephone")]
    pub phone: String,
    pub date: String,
    #[serde(rename = "affectationId", skip_serializing_if = "Option::is_none")]
    pub affectation_id: Option<String>,
    #[serde(rename = "typeTransport")]
    pub ride_type: RideType,
    #[serde(rename = "heure")]
    pub hour: String,
    #[serde(rename = "estTaxi")]
    pub taxi: bool,
    /// Ride fare divided by the number of passengers
    #[serde(rename = "prixParAgent")]
    pub fare_per_employee: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyDay {
    pub agents: Vec<BilledEmployee>,
    #[serde(rename = "nombreAgents")]
    pub employee_count: usize,
    #[serde(rename = "prixTotal")]
    pub total: f64,
    #[serde(rename = "prixTaxi")]
    pub taxi_total: f64,
    #[serde(rename = "prixAutres")]
    pub other_total: f64,
    #[serde(rename = "affectations")]
    pub assignments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: String,
    #[serde(rename = "totalAffectations")]
    pub assignments: usize,
    #[serde(rename = "ramassages")]
    pub pickups: usize,
    #[serde(rename = "departs")]
    pub drop_offs: usize,
    #[serde(rename = "prixTotal")]
    pub total: f64,
    #[serde(rename = "prixTaxi")]
    pub taxi_total: f64,
    #[serde(rename = "prixAutres")]
    pub other_total: f64,
    #[serde(rename = "societes")]
    pub companies: BTreeMap<String, CompanyDay>,
}

impl DailyReport {
    fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            assignments: 0,
            pickups: 0,
            drop_offs: 0,
            total: 0.0,
            taxi_total: 0.0,
            other_total: 0.0,
            companies: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyTotals {
    #[serde(rename = "societe")]
    pub company: String,
    #[serde(rename = "societeInfo", skip_serializing_if = "Option::is_none")]
    pub info: Option<Company>,
    #[serde(rename = "totalAgents")]
    pub employee_count: usize,
    #[serde(rename = "totalPrix")]
    pub total: f64,
    #[serde(rename = "prixTaxi")]
    pub taxi_total: f64,
    #[serde(rename = "prixAutres")]
    pub other_total: f64,
    #[serde(rename = "nombreAffectations")]
    pub assignments: usize,
    #[serde(rename = "prixMoyenParAgent")]
    pub average_per_employee: f64,
    /// Newest ride first
    pub agents: Vec<BilledEmployee>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralStats {
    #[serde(rename = "totalAffectations")]
    pub assignments: usize,
    #[serde(rename = "totalRamassages")]
    pub pickups: usize,
    #[serde(rename = "totalDeparts")]
    pub drop_offs: usize,
    #[serde(rename = "prixTotalGeneral")]
    pub total: f64,
    #[serde(rename = "prixTaxiTotal")]
    pub taxi_total: f64,
    #[serde(rename = "prixAutresTotal")]
    pub other_total: f64,
    #[serde(rename = "prixMoyenParCourse")]
    pub average_per_assignment: f64,
    /// Highest total first
    #[serde(rename = "societes")]
    pub companies: Vec<CompanyTotals>,
    #[serde(rename = "meilleursDates")]
    pub best_days: Vec<DailyReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialReport {
    #[serde(rename = "rapportsJournaliers")]
    pub days: Vec<DailyReport>,
    #[serde(rename = "statistiques")]
    pub stats: GeneralStats,
    /// Every company seen in any assignment, for the filter list
    #[serde(rename = "societesUniques")]
    pub company_names: Vec<String>,
}

/// Resolves the company reference stored on an employee, which is either a
/// company id or a name
struct CompanyDirectory<'a> {
    companies: &'a [Company],
}

impl<'a> CompanyDirectory<'a> {
    fn find(&self, id_or_name: &str) -> Option<&'a Company> {
        if id_or_name.is_empty() {
            return None;
        }
        self.companies
            .iter()
            .find(|c| c.id.as_deref() == Some(id_or_name))
            .or_else(|| self.companies.iter().find(|c| c.name == id_or_name))
    }

    fn name(&self, id_or_name: &str) -> String {
        if id_or_name.is_empty() {
            return UNSPECIFIED_COMPANY.to_string();
        }
        self.find(id_or_name)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id_or_name.to_string())
    }
}

impl ReportFilter {
    fn matches(&self, affectation: &Affectation, directory: &CompanyDirectory) -> bool {
        if self.start.is_some() || self.end.is_some() {
            let Some(date) = parse_french_date(&affectation.actual_date) else {
                return false;
            };
            if self.start.is_some_and(|start| date < start) {
                return false;
            }
            if self.end.is_some_and(|end| date > end) {
                return false;
            }
        }
        if let Some(company) = self.company_filter() {
            if !affectation
                .agents
                .iter()
                .any(|agent| directory.name(&agent.company) == company)
            {
                return false;
            }
        }
        if self.ride_type.is_some_and(|t| t != affectation.ride_type) {
            return false;
        }
        match self.driver_kind {
            Some(DriverKind::Taxi) => is_taxi(affectation),
            Some(DriverKind::Regular) => !is_taxi(affectation),
            None => true,
        }
    }

    fn company_filter(&self) -> Option<&str> {
        self.company.as_deref().filter(|c| !c.is_empty())
    }
}

fn add_to_day(
    day: &mut DailyReport,
    affectation: &Affectation,
    directory: &CompanyDirectory,
    company_filter: Option<&str>,
) {
    let taxi = is_taxi(affectation);
    let fare = affectation.fare;

    day.assignments += 1;
    day.total += fare;
    if taxi {
        day.taxi_total += fare;
    } else {
        day.other_total += fare;
    }
    match affectation.ride_type {
        RideType::Pickup => day.pickups += 1,
        RideType::DropOff => day.drop_offs += 1,
    }

    let fare_per_employee = fare / affectation.agents.len().max(1) as f64;
    let mut companies_in_ride = BTreeSet::new();

    for agent in &affectation.agents {
        let company = directory.name(&agent.company);
        if company_filter.is_some_and(|filter| filter != company) {
            continue;
        }

        let entry = day.companies.entry(company.clone()).or_default();
        entry.agents.push(BilledEmployee {
            name: agent.name.clone(),
            company: company.clone(),
            address: agent.address.clone(),
            phone: agent.phone.clone(),
            date: affectation.actual_date.clone(),
            affectation_id: affectation.id.clone(),
            ride_type: affectation.ride_type,
            hour: affectation.hour.clone(),
            taxi,
            fare_per_employee,
        });
        entry.employee_count += 1;
        companies_in_ride.insert(company);
    }

    if companies_in_ride.is_empty() {
        return;
    }
    let share = fare / companies_in_ride.len() as f64;
    for company in companies_in_ride {
        if let Some(entry) = day.companies.get_mut(&company) {
            entry.total += share;
            entry.assignments += 1;
            if taxi {
                entry.taxi_total += share;
            } else {
                entry.other_total += share;
            }
        }
    }
}

/// Per-day reports of the assignments matching the filter, newest first
pub fn daily_reports(
    affectations: &[Affectation],
    companies: &[Company],
    filter: &ReportFilter,
) -> Vec<DailyReport> {
    let directory = CompanyDirectory { companies };
    let company_filter = filter.company_filter();

    let mut by_date: HashMap<&str, DailyReport> = HashMap::new();
    for affectation in affectations
        .iter()
        .filter(|a| filter.matches(a, &directory))
    {
        let day = by_date
            .entry(affectation.actual_date.as_str())
            .or_insert_with(|| DailyReport::new(&affectation.actual_date));
        add_to_day(day, affectation, &directory, company_filter);
    }

    let mut days: Vec<DailyReport> = by_date.into_values().collect();
    days.sort_by(|a, b| {
        cmp_french_dates_desc(&a.date, &b.date).then_with(|| a.date.cmp(&b.date))
    });
    days
}

/// Totals across days, per-company aggregation and best days
pub fn general_stats(days: &[DailyReport], companies: &[Company]) -> GeneralStats {
    let directory = CompanyDirectory { companies };

    let assignments: usize = days.iter().map(|d| d.assignments).sum();
    let total: f64 = days.iter().map(|d| d.total).sum();

    let mut per_company: BTreeMap<&str, CompanyTotals> = BTreeMap::new();
    for day in days {
        for (name, data) in &day.companies {
            let totals = per_company.entry(name.as_str()).or_insert_with(|| CompanyTotals {
                company: name.clone(),
                info: directory.find(name).cloned(),
                employee_count: 0,
                total: 0.0,
                taxi_total: 0.0,
                other_total: 0.0,
                assignments: 0,
                average_per_employee: 0.0,
                agents: Vec::new(),
            });
            totals.employee_count += data.employee_count;
            totals.total += data.total;
            totals.taxi_total += data.taxi_total;
            totals.other_total += data.other_total;
            totals.assignments += data.assignments;
            totals.agents.extend(data.agents.iter().cloned());
        }
    }

    let mut companies: Vec<CompanyTotals> = per_company
        .into_values()
        .map(|mut totals| {
            if totals.employee_count > 0 {
                totals.average_per_employee = totals.total / totals.employee_count as f64;
            }
            totals
                .agents
                .sort_by(|a, b| cmp_french_dates_desc(&a.date, &b.date));
            totals
        })
        .collect();
    companies.sort_by(|a, b| b.total.total_cmp(&a.total));

    let mut best_days = days.to_vec();
    best_days.sort_by(|a, b| b.total.total_cmp(&a.total));
    best_days.truncate(TOP_DAYS);

    GeneralStats {
        assignments,
        pickups: days.iter().map(|d| d.pickups).sum(),
        drop_offs: days.iter().map(|d| d.drop_offs).sum(),
        total,
        taxi_total: days.iter().map(|d| d.taxi_total).sum(),
        other_total: days.iter().map(|d| d.other_total).sum(),
        average_per_assignment: if assignments > 0 {
            total / assignments as f64
        } else {
            0.0
        },
        companies,
        best_days,
    }
}

/// Distinct company names across all assignments, sorted
pub fn company_names(affectations: &[Affectation], companies: &[Company]) -> Vec<String> {
    let directory = CompanyDirectory { companies };
    affectations
        .iter()
        .flat_map(|a| a.agents.iter())
        .map(|agent| directory.name(&agent.company))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn financial_report(
    affectations: &[Affectation],
    companies: &[Company],
    filter: &ReportFilter,
) -> FinancialReport {
    let days = daily_reports(affectations, companies, filter);
    let stats = general_stats(&days, companies);
    FinancialReport {
        days,
        stats,
        company_names: company_names(affectations, companies),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgentAffectation, PaymentStatus, Weekday};

    fn agent(name: &str, company: &str) -> AgentAffectation {
        AgentAffectation {
            name: name.to_string(),
            address: "Tunis".to_string(),
            phone: "1".to_string(),
            company: company.to_string(),
        }
    }

    fn ride(
        id: &str,
        date: &str,
        driver: &str,
        ride_type: RideType,
        agents: Vec<AgentAffectation>,
        fare: f64,
    ) -> Affectation {
        Affectation {
            id: Some(id.to_string()),
            driver: driver.to_string(),
            hour: "22".to_string(),
            agents,
            vehicle: "Partner".to_string(),
            ride_type,
            day: Weekday::Monday,
            date_added: date.to_string(),
            actual_date: date.to_string(),
            fare,
            payment_status: PaymentStatus::Unpaid,
            created_at: None,
        }
    }

    fn companies() -> Vec<Company> {
        vec![Company {
            id: Some("s1".to_string()),
            name: "Sotetel".to_string(),
            ..Default::default()
        }]
    }

    fn sample() -> Vec<Affectation> {
        vec![
            ride(
                "r1",
                "10/03/2025",
                "Samir",
                RideType::Pickup,
                vec![agent("Ali", "s1"), agent("Mona", "Orange"), agent("Sami", "s1")],
                30.0,
            ),
            ride(
                "r2",
                "10/03/2025",
                "Taxi Hedi",
                RideType::DropOff,
                vec![agent("Ali", "Sotetel")],
                15.0,
            ),
            ride(
                "r3",
                "12/03/2025",
                "Samir",
                RideType::Pickup,
                vec![agent("Rim", "")],
                10.0,
            ),
        ]
    }

    #[test]
    fn test_daily_reports() {
        let days = daily_reports(&sample(), &companies(), &ReportFilter::default());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "12/03/2025");

        let day = &days[1];
        assert_eq!(day.assignments, 2);
        assert_eq!(day.pickups, 1);
        assert_eq!(day.drop_offs, 1);
        assert_eq!(day.total, 45.0);
        assert_eq!(day.taxi_total, 15.0);
        assert_eq!(day.other_total, 30.0);

        let sotetel = &day.companies["Sotetel"];
        assert_eq!(sotetel.employee_count, 3);
        assert_eq!(sotetel.assignments, 2);
        assert_eq!(sotetel.total, 30.0);
        assert_eq!(sotetel.taxi_total, 15.0);
        assert_eq!(sotetel.agents[0].fare_per_employee, 10.0);

        let orange = &day.companies["Orange"];
        assert_eq!(orange.total, 15.0);
        assert_eq!(orange.employee_count, 1);

        assert!(days[0].companies.contains_key(UNSPECIFIED_COMPANY));
    }

    #[test]
    fn test_company_filter_keeps_only_that_company() {
        let filter = ReportFilter {
            company: Some("Orange".to_string()),
            ..Default::default()
        };
        let days = daily_reports(&sample(), &companies(), &filter);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].assignments, 1);
        assert_eq!(days[0].companies.len(), 1);
        assert_eq!(days[0].companies["Orange"].total, 30.0);
    }

    #[test]
    fn test_date_and_driver_filters() {
        let filter = ReportFilter {
            start: NaiveDate::from_ymd_opt(2025, 3, 11),
            end: NaiveDate::from_ymd_opt(2025, 3, 12),
            ..Default::default()
        };
        let days = daily_reports(&sample(), &companies(), &filter);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, "12/03/2025");

        let taxis = ReportFilter {
            driver_kind: Some(DriverKind::Taxi),
            ..Default::default()
        };
        let days = daily_reports(&sample(), &companies(), &taxis);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].total, 15.0);
    }

    #[test]
    fn test_general_stats() {
        let report = financial_report(&sample(), &companies(), &ReportFilter::default());
        let stats = &report.stats;
        assert_eq!(stats.assignments, 3);
        assert_eq!(stats.total, 55.0);
        assert_eq!(stats.taxi_total, 15.0);
        assert!((stats.average_per_assignment - 55.0 / 3.0).abs() < 1e-9);

        let names: Vec<&str> = stats.companies.iter().map(|c| c.company.as_str()).collect();
        assert_eq!(names, vec!["Sotetel", "Orange", UNSPECIFIED_COMPANY]);
        assert_eq!(stats.companies[0].average_per_employee, 10.0);
        assert_eq!(
            stats.companies[0].info.as_ref().and_then(|c| c.id.as_deref()),
            Some("s1")
        );

        assert_eq!(stats.best_days[0].date, "10/03/2025");
        assert_eq!(
            report.company_names,
            vec!["Non spécifié", "Orange", "Sotetel"]
        );
    }
}
