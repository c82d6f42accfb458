pub mod assignments;
#[cfg(feature = "web-interface")]
pub mod auth;
pub mod config;
pub mod error;
pub mod matching;
pub mod models;
pub mod reporting;
#[cfg(feature = "web-interface")]
pub mod shutdown;
pub mod startup;
pub mod store;
pub mod utils;
#[cfg(feature = "web-interface")]
pub mod web;
