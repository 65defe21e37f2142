//! Actions offered by the portal screens
//!
//! Each action is a guarded submission or a direct notification. Screens call
//! these with their current draft and a notifier; nothing here holds state.

use std::time::Duration;

use tracing::info;

use crate::errors::PortalError;
use crate::models::{Appointment, AppointmentStatus, ConsultationKind, Doctor};
use crate::notification::{Notification, Notifier};
use crate::routes::Route;
use crate::submission::{self, simulate_round_trip, Completion, FormDefinition, FormDraft, Outcome};

pub mod fields {
    pub const SPECIALTY: &str = "specialty";
    pub const DOCTOR: &str = "doctor";
    pub const DATE: &str = "date";
    pub const TIME: &str = "time";
    pub const REASON: &str = "reason";

    pub const PATIENT_NAME: &str = "patientName";
    pub const PHONE: &str = "phoneNumber";
    pub const LOCATION: &str = "location";
    pub const EMERGENCY_TYPE: &str = "emergencyType";
    pub const DESCRIPTION: &str = "description";

    pub const AGE: &str = "age";
    pub const SYMPTOMS: &str = "symptoms";
    pub const DURATION: &str = "duration";

    pub const NOTE: &str = "note";
}

pub static APPOINTMENT_FORM: FormDefinition = FormDefinition {
    name: "appointment-booking",
    required: &[fields::SPECIALTY, fields::DOCTOR, fields::DATE, fields::TIME],
    instruction: "Please fill in all required fields.",
};

pub static EMERGENCY_FORM: FormDefinition = FormDefinition {
    name: "emergency-request",
    required: &[fields::PATIENT_NAME, fields::PHONE, fields::LOCATION, fields::EMERGENCY_TYPE],
    instruction: "Please fill in all required fields.",
};

/// Intake details for a video consultation; nothing is required
pub static VIDEO_INTAKE_FORM: FormDefinition = FormDefinition {
    name: "video-intake",
    required: &[],
    instruction: "Please fill in all required fields.",
};

pub static PATIENT_NOTE_FORM: FormDefinition = FormDefinition {
    name: "patient-note",
    required: &[fields::NOTE],
    instruction: "Please write a note before saving.",
};

/// Book an appointment; confirmation is immediate
pub fn book_appointment<N: Notifier + ?Sized>(draft: &FormDraft, notifier: &mut N) -> Result<(), PortalError> {
    submission::submit(draft, notifier, |draft, notifier| {
        notifier.notify(booking_confirmation(draft));
        Outcome::Immediate
    })
    .map(|_| ())
}

pub fn booking_confirmation(draft: &FormDraft) -> Notification {
    Notification::new(
        "Appointment Booked!",
        format!(
            "Your appointment with {} on {} at {} has been confirmed.",
            draft.value(fields::DOCTOR),
            draft.value(fields::DATE),
            draft.value(fields::TIME)
        ),
    )
}

/// Send an emergency request; dispatch is confirmed immediately
pub fn request_emergency<N: Notifier + ?Sized>(draft: &FormDraft, notifier: &mut N) -> Result<(), PortalError> {
    submission::submit(draft, notifier, |draft, notifier| {
        info!(
            emergency_type = draft.value(fields::EMERGENCY_TYPE),
            "emergency request dispatched"
        );
        notifier.notify(Notification::new(
            "Emergency Request Sent!",
            "An ambulance has been dispatched to your location. ETA: 8-12 minutes.",
        ));
        Outcome::Immediate
    })
    .map(|_| ())
}

/// Downstream action of a video consultation: notify now, report connected after `delay`
pub fn video_consultation_action<N: Notifier + ?Sized>(
    doctor: &Doctor,
    notifier: &mut N,
    delay: Duration,
) -> Outcome {
    notifier.notify(Notification::new(
        "Connecting to Video Call",
        format!("Preparing secure video consultation with {}...", doctor.name),
    ));
    Outcome::Pending(simulate_round_trip("video-consultation", delay, || {
        Completion::notify(Notification::new(
            "Video Call Connected",
            "You are now connected with your doctor.",
        ))
    }))
}

/// Whether a doctor can be called right now; busy doctors cannot
pub fn can_start_video_consultation(doctor: &Doctor) -> bool {
    doctor.is_available()
}

/// Notification for starting an appointment, or `None` when it is not upcoming
pub fn start_consultation(appointment: &Appointment) -> Option<Notification> {
    if appointment.status != AppointmentStatus::Upcoming {
        return None;
    }
    Some(match appointment.kind {
        ConsultationKind::Video => Notification::new(
            "Starting Video Call",
            format!("Connecting with {}...", appointment.patient),
        ),
        ConsultationKind::InPerson => Notification::new(
            "Patient Ready",
            format!("{} is ready for consultation.", appointment.patient),
        ),
    })
}

/// Notification for completing an in-progress appointment, `None` otherwise
pub fn complete_appointment(appointment: &Appointment) -> Option<Notification> {
    if appointment.status != AppointmentStatus::InProgress {
        return None;
    }
    Some(status_change(&appointment.id, AppointmentStatus::Completed))
}

pub fn status_change(appointment_id: &str, new_status: AppointmentStatus) -> Notification {
    Notification::new(
        "Status Updated",
        format!(
            "Appointment {} status changed to {}.",
            appointment_id,
            new_status.as_str()
        ),
    )
}

/// Add a note to a patient record
pub fn add_patient_note<N: Notifier + ?Sized>(
    patient_id: &str,
    draft: &FormDraft,
    notifier: &mut N,
) -> Result<(), PortalError> {
    submission::submit(draft, notifier, |_, notifier| {
        notifier.notify(Notification::new(
            "Note Added",
            format!("Note added to patient {} record.", patient_id),
        ));
        Outcome::Immediate
    })
    .map(|_| ())
}

pub fn download_prescription(prescription_id: &str) -> Notification {
    Notification::new(
        "Downloading Prescription",
        format!("Prescription {} is being downloaded as PDF.", prescription_id),
    )
}

pub fn order_medicine() -> Notification {
    Notification::new(
        "Redirecting to Pharmacy",
        "Opening pharmacy portal for medicine delivery...",
    )
}

/// Logging out always succeeds and returns to the login page
pub fn logout() -> Completion {
    Completion::notify(Notification::new(
        "Logged Out",
        "You have been successfully logged out.",
    ))
    .and_navigate(Route::DoctorLogin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Fixtures;
    use crate::submission::MISSING_INFORMATION;

    #[test]
    fn test_booking_requires_all_four_fields() {
        let mut notes: Vec<Notification> = Vec::new();
        let draft = FormDraft::new(&APPOINTMENT_FORM)
            .with_value(fields::SPECIALTY, "Cardiology")
            .with_value(fields::DOCTOR, "Dr. Sarah Johnson")
            .with_value(fields::DATE, "2024-02-01");

        assert!(book_appointment(&draft, &mut notes).is_err());
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, MISSING_INFORMATION);

        let draft = draft.with_value(fields::TIME, "10:00 AM");
        book_appointment(&draft, &mut notes).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[1].title, "Appointment Booked!");
        assert_eq!(
            notes[1].description,
            "Your appointment with Dr. Sarah Johnson on 2024-02-01 at 10:00 AM has been confirmed."
        );
    }

    #[test]
    fn test_emergency_description_is_optional() {
        let mut notes: Vec<Notification> = Vec::new();
        let draft = FormDraft::new(&EMERGENCY_FORM)
            .with_value(fields::PATIENT_NAME, "David Brown")
            .with_value(fields::PHONE, "+1-555-0127")
            .with_value(fields::LOCATION, "40.712775, -74.005973")
            .with_value(fields::EMERGENCY_TYPE, "Fall");

        request_emergency(&draft, &mut notes).unwrap();
        assert_eq!(notes[0].title, "Emergency Request Sent!");
    }

    #[test]
    fn test_appointment_actions_follow_status_and_kind() {
        let fixtures = Fixtures::builtin().unwrap();
        let by_id = |id: &str| fixtures.appointments.iter().find(|a| a.id == id).unwrap();

        let in_person = start_consultation(by_id("APT001")).unwrap();
        assert_eq!(in_person.title, "Patient Ready");
        assert_eq!(in_person.description, "John Smith is ready for consultation.");

        let video = start_consultation(by_id("APT004")).unwrap();
        assert_eq!(video.title, "Starting Video Call");
        assert_eq!(video.description, "Connecting with Emily Wilson...");

        assert!(start_consultation(by_id("APT002")).is_none());
        assert!(complete_appointment(by_id("APT001")).is_none());

        let done = complete_appointment(by_id("APT003")).unwrap();
        assert_eq!(done.description, "Appointment APT003 status changed to completed.");
    }

    #[test]
    fn test_patient_note_cannot_be_blank() {
        let mut notes: Vec<Notification> = Vec::new();
        let blank = FormDraft::new(&PATIENT_NOTE_FORM).with_value(fields::NOTE, " ");
        assert!(add_patient_note("P001", &blank, &mut notes).is_err());
        assert_eq!(notes[0].description, "Please write a note before saving.");

        let note = blank.with_value(fields::NOTE, "Reduce dosage");
        add_patient_note("P001", &note, &mut notes).unwrap();
        assert_eq!(notes[1].description, "Note added to patient P001 record.");
    }

    #[tokio::test]
    async fn test_video_consultation_notifies_twice() {
        let fixtures = Fixtures::builtin().unwrap();
        let doctor = &fixtures.doctors[0];
        assert!(can_start_video_consultation(doctor));
        assert!(!can_start_video_consultation(&fixtures.doctors[2]));

        let mut notes: Vec<Notification> = Vec::new();
        let outcome = video_consultation_action(doctor, &mut notes, Duration::from_millis(1));
        assert_eq!(notes[0].title, "Connecting to Video Call");
        assert_eq!(
            notes[0].description,
            "Preparing secure video consultation with Dr. Sarah Johnson..."
        );

        let Outcome::Pending(pending) = outcome else {
            panic!("video consultation settles asynchronously");
        };
        let completion = pending.settle().await.unwrap();
        assert_eq!(completion.notification.title, "Video Call Connected");
    }

    #[test]
    fn test_logout_returns_to_login() {
        let completion = logout();
        assert_eq!(completion.notification.title, "Logged Out");
        assert_eq!(completion.navigate_to, Some(Route::DoctorLogin));
    }
}
