//! Read-side views over stored assignments: payment validation, the ride
//! recap and the financial report.

pub mod financial;
pub mod recap;
pub mod validation;

pub use financial::{financial_report, DriverKind, FinancialReport, ReportFilter};
pub use recap::{ride_recap, Recap, RecapFilter};
pub use validation::{set_payment_status, validation_view, ValidationFilter, ValidationView};
