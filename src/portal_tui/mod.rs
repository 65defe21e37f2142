//! HealthCare+ terminal user interface
//!
//! Hosts the patient portal sections and the doctor portal pages. Screens
//! report navigation through [`traits::ScreenAction`]; notifications go to the
//! shared [`components::StatusDisplay`].

pub mod app;
pub mod components;
pub mod handlers;
pub mod screens;
pub mod traits;
pub mod ui;

pub use app::{App, Screen};
