//! Logical navigation targets handed to the router collaborator

use std::str::FromStr;

use crate::errors::PortalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    PatientPortal,
    DoctorLogin,
    DoctorDashboard,
    DoctorAppointments,
    DoctorPatients,
}

impl Route {
    pub fn as_path(&self) -> &'static str {
        match self {
            Route::PatientPortal => "/",
            Route::DoctorLogin => "/doctor/login",
            Route::DoctorDashboard => "/doctor/dashboard",
            Route::DoctorAppointments => "/doctor/appointments",
            Route::DoctorPatients => "/doctor/patients",
        }
    }
}

impl FromStr for Route {
    type Err = PortalError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        match path.trim_end_matches('/') {
            "" => Ok(Route::PatientPortal),
            "/doctor/login" => Ok(Route::DoctorLogin),
            "/doctor/dashboard" => Ok(Route::DoctorDashboard),
            "/doctor/appointments" => Ok(Route::DoctorAppointments),
            "/doctor/patients" => Ok(Route::DoctorPatients),
            _ => Err(PortalError::UnknownRoute(path.to_string())),
        }
    }
}

/// Router collaborator receiving navigation hand-offs
pub trait Router {
    fn navigate(&mut self, route: Route);
}
