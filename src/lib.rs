//! HealthCare+ portal
//!
//! Patient and doctor portal built around two behaviours: filterable
//! listings over in-memory collections and guarded form submissions that
//! refuse to run their action until every required field is filled.

pub mod actions;
pub mod auth;
pub mod config;
pub mod errors;
pub mod fixtures;
pub mod geolocation;
pub mod listing;
pub mod models;
pub mod notification;
pub mod portal_tui;
pub mod routes;
pub mod submission;
