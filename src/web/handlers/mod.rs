pub mod affectations;
pub mod auth;
pub mod planning;
pub mod records;
pub mod reports;
pub mod users;
