pub mod affectation;
pub mod agent;
pub mod planning;
pub mod user;

pub use affectation::{Affectation, AffectationDraft, AgentAffectation, PaymentStatus, RideType};
pub use agent::{Company, Driver, Employee, MISSING_FIELD};
pub use planning::{PlanningFilters, PlanningSnapshot, WeeklySchedule, Weekday};
pub use user::{Role, Section, UserAccount, UserSummary};
