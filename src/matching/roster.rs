use super::eligibility::{is_eligible, sort_by_priority};
use super::hours::format_hour_label;
use super::shift::parse_shift;
use crate::models::{Employee, RideType, WeeklySchedule, Weekday};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// An employee whose shift on the queried day calls for a ride
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedEmployee {
    #[serde(flatten)]
    pub employee: Employee,
    /// Rank hour, 0–23
    #[serde(rename = "heure")]
    pub hour: u32,
    #[serde(rename = "heureAffichage")]
    pub hour_label: String,
    #[serde(rename = "planning")]
    pub raw_shift_text: String,
}

/// A dashboard line: a matched planning row plus whether the employee
/// record still lacks contact details
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    #[serde(flatten)]
    pub matched: MatchedEmployee,
    #[serde(rename = "aCompleter")]
    pub needs_completion: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Planning rows imported
    #[serde(rename = "totalAgents")]
    pub total_rows: usize,
    /// Rows needing a ride for the selected day and ride type
    #[serde(rename = "agentsFiltres")]
    pub matched: usize,
    #[serde(rename = "agentsAvecInfos")]
    pub complete: usize,
    #[serde(rename = "agentsSansInfos")]
    pub incomplete: usize,
    /// matched / total, rounded to a whole percent
    #[serde(rename = "pourcentage")]
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningDashboard {
    pub day: Weekday,
    pub ride_type: RideType,
    pub rows: Vec<DashboardRow>,
    pub stats: DashboardStats,
}

/// Index schedules by employee name, keeping the first row for a name
fn index_schedules(schedules: &[WeeklySchedule]) -> HashMap<&str, &WeeklySchedule> {
    let mut index = HashMap::with_capacity(schedules.len());
    for schedule in schedules {
        index
            .entry(schedule.employee_name.as_str())
            .or_insert(schedule);
    }
    index
}

fn index_employees(employees: &[Employee]) -> HashMap<&str, &Employee> {
    let mut index = HashMap::with_capacity(employees.len());
    for employee in employees {
        index.entry(employee.name.as_str()).or_insert(employee);
    }
    index
}

/// Rank hour and raw text of a schedule's day cell, if it calls for a ride
fn eligible_cell(
    schedule: &WeeklySchedule,
    day: Weekday,
    ride_type: RideType,
) -> Option<(u32, String)> {
    let text = schedule.cell(day)?;
    let shift = parse_shift(text)?;
    let (eligible, rank_hour) = is_eligible(&shift, ride_type);
    eligible.then(|| (rank_hour, text.to_string()))
}

/// Employees available for a ride on `day`, in priority order.
///
/// Employees already picked for the ride (matched by name), employees with
/// no planning row, and employees whose day cell is a rest marker, unreadable
/// or outside the ride type's hours are left out.
pub fn match_employees(
    employees: &[Employee],
    schedules: &[WeeklySchedule],
    day: Weekday,
    ride_type: RideType,
    already_selected: &HashSet<String>,
) -> Vec<MatchedEmployee> {
    let schedule_index = index_schedules(schedules);

    let mut matched: Vec<MatchedEmployee> = employees
        .iter()
        .filter_map(|employee| {
            if already_selected.contains(&employee.name) {
                debug!("{} already selected", employee.name);
                return None;
            }

            let Some(schedule) = schedule_index.get(employee.name.as_str()) else {
                debug!("No planning row for {}", employee.name);
                return None;
            };

            let Some((hour, raw_shift_text)) = eligible_cell(schedule, day, ride_type) else {
                debug!("{} has no {} ride on {}", employee.name, ride_type, day);
                return None;
            };

            Some(MatchedEmployee {
                employee: employee.clone(),
                hour,
                hour_label: format_hour_label(hour),
                raw_shift_text,
            })
        })
        .collect();

    sort_by_priority(&mut matched, ride_type, |m| m.hour);
    matched
}

/// Planning-driven view of the import dashboard.
///
/// Every planning row whose day cell calls for a ride is listed, joined to
/// the employee record of the same name. Rows without a record get
/// placeholder contact details and are flagged for completion.
pub fn planning_dashboard(
    schedules: &[WeeklySchedule],
    employees: &[Employee],
    day: Weekday,
    ride_type: RideType,
) -> PlanningDashboard {
    let employee_index = index_employees(employees);

    let mut rows: Vec<DashboardRow> = schedules
        .iter()
        .filter_map(|schedule| {
            let (hour, raw_shift_text) = eligible_cell(schedule, day, ride_type)?;
            let employee = employee_index
                .get(schedule.employee_name.as_str())
                .map(|employee| (*employee).clone())
                .unwrap_or_else(|| Employee::placeholder(schedule.employee_name.clone()));
            let needs_completion = employee.needs_completion();

            Some(DashboardRow {
                matched: MatchedEmployee {
                    employee,
                    hour,
                    hour_label: format_hour_label(hour),
                    raw_shift_text,
                },
                needs_completion,
            })
        })
        .collect();

    sort_by_priority(&mut rows, ride_type, |row| row.matched.hour);

    let stats = dashboard_stats(schedules.len(), &rows);
    PlanningDashboard {
        day,
        ride_type,
        rows,
        stats,
    }
}

fn dashboard_stats(total_rows: usize, rows: &[DashboardRow]) -> DashboardStats {
    let matched = rows.len();
    let complete = rows.iter().filter(|row| !row.needs_completion).count();
    let percentage = if total_rows > 0 {
        ((matched as f64 / total_rows as f64) * 100.0).round() as u32
    } else {
        0
    };

    DashboardStats {
        total_rows,
        matched,
        complete,
        incomplete: matched - complete,
        percentage,
    }
}

/// Names present in the planning that have no employee record
pub fn employees_missing_from_roster(
    schedules: &[WeeklySchedule],
    employees: &[Employee],
) -> Vec<String> {
    let known: HashSet<&str> = employees.iter().map(|e| e.name.as_str()).collect();
    let mut seen = HashSet::new();

    schedules
        .iter()
        .map(|s| s.employee_name.as_str())
        .filter(|name| !known.contains(name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MISSING_FIELD;

    fn employee(name: &str) -> Employee {
        Employee::new(name, "Tunis", "20000000", "Sotetel")
    }

    fn schedule(name: &str, monday: &str) -> WeeklySchedule {
        WeeklySchedule::new(name).with_day(Weekday::Monday, monday)
    }

    #[test]
    fn test_match_employees_orders_by_priority() {
        let employees = vec![
            employee("Amine"),
            employee("Badr"),
            employee("Chiraz"),
            employee("Dali"),
        ];
        let schedules = vec![
            schedule("Amine", "6h-14h"),
            schedule("Badr", "22h-6h"),
            schedule("Chiraz", "7h-15h"),
            schedule("Dali", "23h-7h"),
        ];

        let matched = match_employees(
            &employees,
            &schedules,
            Weekday::Monday,
            RideType::Pickup,
            &HashSet::new(),
        );

        let names: Vec<&str> = matched.iter().map(|m| m.employee.name.as_str()).collect();
        assert_eq!(names, vec!["Badr", "Dali", "Amine", "Chiraz"]);
        let hours: Vec<u32> = matched.iter().map(|m| m.hour).collect();
        assert_eq!(hours, vec![22, 23, 6, 7]);
    }

    #[test]
    fn test_match_employees_skips_rest_and_missing_rows() {
        let employees = vec![employee("Amine"), employee("Badr"), employee("Chiraz")];
        let schedules = vec![schedule("Amine", "REPOS"), schedule("Badr", "10h-18h")];

        let matched = match_employees(
            &employees,
            &schedules,
            Weekday::Monday,
            RideType::Pickup,
            &HashSet::new(),
        );
        assert!(matched.is_empty());
    }

    #[test]
    fn test_match_employees_excludes_selected() {
        let employees = vec![employee("Amine"), employee("Badr")];
        let schedules = vec![schedule("Amine", "22h-6h"), schedule("Badr", "22h-6h")];
        let selected: HashSet<String> = ["Amine".to_string()].into_iter().collect();

        let matched = match_employees(
            &employees,
            &schedules,
            Weekday::Monday,
            RideType::Pickup,
            &selected,
        );
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].employee.name, "Badr");
    }

    #[test]
    fn test_match_employees_uses_first_planning_row() {
        let employees = vec![employee("Amine")];
        let schedules = vec![schedule("Amine", "6h-14h"), schedule("Amine", "22h-6h")];

        let matched = match_employees(
            &employees,
            &schedules,
            Weekday::Monday,
            RideType::Pickup,
            &HashSet::new(),
        );
        assert_eq!(matched[0].hour, 6);
        assert_eq!(matched[0].raw_shift_text, "6h-14h");
    }

    #[test]
    fn test_drop_off_labels_are_normalized() {
        let employees = vec![employee("Amine")];
        let schedules = vec![schedule("Amine", "19h-3h")];

        let matched = match_employees(
            &employees,
            &schedules,
            Weekday::Monday,
            RideType::DropOff,
            &HashSet::new(),
        );
        assert_eq!(matched[0].hour, 3);
        assert_eq!(matched[0].hour_label, "3H");
    }

    #[test]
    fn test_dashboard_placeholders_and_stats() {
        let employees = vec![employee("Amine")];
        let schedules = vec![
            schedule("Amine", "22h-6h"),
            schedule("Inconnu", "6h-14h"),
            schedule("Repos", "REPOS"),
            schedule("Jour", "9h-17h"),
        ];

        let dashboard =
            planning_dashboard(&schedules, &employees, Weekday::Monday, RideType::Pickup);

        assert_eq!(dashboard.rows.len(), 2);
        assert_eq!(dashboard.rows[0].matched.employee.name, "Amine");
        assert!(!dashboard.rows[0].needs_completion);

        let unknown = &dashboard.rows[1];
        assert_eq!(unknown.matched.employee.name, "Inconnu");
        assert_eq!(unknown.matched.employee.address, MISSING_FIELD);
        assert!(unknown.needs_completion);

        assert_eq!(
            dashboard.stats,
            DashboardStats {
                total_rows: 4,
                matched: 2,
                complete: 1,
                incomplete: 1,
                percentage: 50,
            }
        );
    }

    #[test]
    fn test_dashboard_empty_planning() {
        let dashboard = planning_dashboard(&[], &[], Weekday::Friday, RideType::DropOff);
        assert!(dashboard.rows.is_empty());
        assert_eq!(dashboard.stats.percentage, 0);
    }

    #[test]
    fn test_employees_missing_from_roster() {
        let employees = vec![employee("Amine")];
        let schedules = vec![
            schedule("Amine", "REPOS"),
            schedule("Badr", "REPOS"),
            schedule("Badr", "6h-14h"),
            schedule("Chiraz", "REPOS"),
        ];
        assert_eq!(
            employees_missing_from_roster(&schedules, &employees),
            vec!["Badr".to_string(), "Chiraz".to_string()]
        );
    }

    #[test]
    fn test_matched_employee_json_shape() {
        let matched = MatchedEmployee {
            employee: employee("Amine"),
            hour: 22,
            hour_label: "22H".to_string(),
            raw_shift_text: "22h-6h".to_string(),
        };
        let value = serde_json::to_value(&matched).unwrap();
        assert_eq!(value["nom"], "Amine");
        assert_eq!(value["heure"], 22);
        assert_eq!(value["heureAffichage"], "22H");
        assert_eq!(value["planning"], "22h-6h");
    }
}
