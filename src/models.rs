use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::PortalError;
use crate::listing::{Searchable, WithStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Upcoming,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Upcoming,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::InProgress => "in-progress",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(AppointmentStatus::Upcoming),
            "in-progress" | "in_progress" | "inprogress" => Ok(AppointmentStatus::InProgress),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" | "canceled" => Ok(AppointmentStatus::Cancelled),
            other => Err(PortalError::UnknownStatus {
                value: other.to_string(),
                expected: "all, upcoming, in-progress, completed, cancelled".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsultationKind {
    InPerson,
    Video,
}

impl ConsultationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationKind::InPerson => "In-person",
            ConsultationKind::Video => "Video",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub time: String,
    pub date: NaiveDate,
    pub patient: String,
    pub age: u8,
    pub phone: String,
    pub reason: String,
    pub status: AppointmentStatus,
    #[serde(rename = "type")]
    pub kind: ConsultationKind,
}

impl Searchable for Appointment {
    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.patient.as_str(), self.reason.as_str()]
    }
}

impl WithStatus for Appointment {
    type Status = AppointmentStatus;

    fn status(&self) -> AppointmentStatus {
        self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientStatus {
    Active,
    Recovering,
}

impl PatientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Active => "active",
            PatientStatus::Recovering => "recovering",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub age: u8,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub last_visit: NaiveDate,
    pub condition: String,
    pub status: PatientStatus,
    pub next_appointment: NaiveDate,
    pub notes: String,
    pub medical_history: Vec<String>,
    pub current_medications: Vec<String>,
}

impl Searchable for Patient {
    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.condition.as_str()]
    }
}

impl WithStatus for Patient {
    type Status = PatientStatus;

    fn status(&self) -> PatientStatus {
        self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrescriptionStatus {
    Active,
    Completed,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Active => "active",
            PrescriptionStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    pub id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub status: PrescriptionStatus,
}

impl Searchable for Prescription {
    fn searchable_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = vec![self.doctor_name.as_str(), self.diagnosis.as_str()];
        fields.extend(self.medications.iter().map(|med| med.name.as_str()));
        fields
    }
}

impl WithStatus for Prescription {
    type Status = PrescriptionStatus;

    fn status(&self) -> PrescriptionStatus {
        self.status
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Available,
    Busy,
}

/// Doctor offered for a video consultation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: u32,
    pub name: String,
    pub specialty: String,
    pub rating: f32,
    pub experience: String,
    pub status: Availability,
    pub next_slot: String,
}

impl Doctor {
    pub fn is_available(&self) -> bool {
        self.status == Availability::Available
    }
}

impl Searchable for Doctor {
    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.specialty.as_str()]
    }
}

impl WithStatus for Doctor {
    type Status = Availability;

    fn status(&self) -> Availability {
        self.status
    }
}

/// A bookable specialty and the doctors practising it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialty {
    pub name: String,
    pub doctors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStat {
    pub title: String,
    pub value: String,
}

/// Row of the dashboard's "Today's Appointments" panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub time: String,
    pub patient: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub status: AppointmentStatus,
}
