//! Schedule-to-ride matching.
//!
//! A planning cell is parsed into a [`ParsedShift`], checked against the
//! ride type's hour whitelist and ranked by its priority sequence. Every
//! view that lists employees for a ride goes through this module.

pub mod eligibility;
pub mod hours;
pub mod roster;
pub mod shift;

pub use eligibility::{compare_rank_hours, is_eligible, sort_by_priority};
pub use hours::{format_assignment_hour, format_hour_label, normalize_display_hour};
pub use roster::{
    employees_missing_from_roster, match_employees, planning_dashboard, DashboardRow,
    DashboardStats, MatchedEmployee, PlanningDashboard,
};
pub use shift::{is_rest_marker, parse_shift, ParsedShift, REST_KEYWORDS};
