//! Mock collections backing every screen
//!
//! The data is opaque input: a JSON document compiled into the binary, or a
//! replacement document named by the configuration. It is loaded once at
//! start-up and never written back.

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::errors::PortalError;
use crate::models::{
    Appointment, DashboardStat, Doctor, Patient, Prescription, ScheduleEntry, Specialty,
};

const BUILTIN_FIXTURES: &str = include_str!("../fixtures/portal.json");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixtures {
    pub appointments: Vec<Appointment>,
    pub patients: Vec<Patient>,
    pub prescriptions: Vec<Prescription>,
    pub doctors: Vec<Doctor>,
    pub specialties: Vec<Specialty>,
    pub time_slots: Vec<String>,
    #[serde(default)]
    pub dashboard_stats: Vec<DashboardStat>,
    #[serde(default)]
    pub today_schedule: Vec<ScheduleEntry>,
    #[serde(default)]
    pub recent_activity: Vec<String>,
}

impl Fixtures {
    pub fn from_json(document: &str) -> Result<Self, PortalError> {
        Ok(serde_json::from_str(document)?)
    }

    /// The fixture document shipped with the binary
    pub fn builtin() -> Result<Self, PortalError> {
        Self::from_json(BUILTIN_FIXTURES)
    }

    pub fn from_file(path: &Path) -> Result<Self, PortalError> {
        let document = std::fs::read_to_string(path)?;
        Self::from_json(&document)
    }

    /// Load the configured document, falling back to the built-in one
    pub fn load(config: &Config) -> Result<Self, PortalError> {
        let fixtures = match config.fixtures_path {
            Some(ref path) => {
                info!("Loading fixtures from {}", path.display());
                Self::from_file(path)?
            }
            None => Self::builtin()?,
        };
        info!(
            "Loaded {} appointments, {} patients, {} prescriptions, {} doctors",
            fixtures.appointments.len(),
            fixtures.patients.len(),
            fixtures.prescriptions.len(),
            fixtures.doctors.len()
        );
        Ok(fixtures)
    }

    /// Doctors bookable for `specialty`, empty for unknown names
    pub fn doctors_for(&self, specialty: &str) -> Vec<String> {
        self.specialties
            .iter()
            .find(|s| s.name == specialty)
            .map(|s| s.doctors.clone())
            .unwrap_or_default()
    }

    pub fn specialty_names(&self) -> Vec<String> {
        self.specialties.iter().map(|s| s.name.clone()).collect()
    }
}
