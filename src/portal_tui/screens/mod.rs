//! Screen modules for the portal TUI

pub mod appointments;
pub mod booking;
pub mod dashboard;
pub mod emergency;
pub mod landing;
pub mod login;
pub mod patients;
pub mod prescriptions;
pub mod video;

pub use appointments::AppointmentsScreen;
pub use booking::BookingScreen;
pub use dashboard::DashboardScreen;
pub use emergency::EmergencyScreen;
pub use landing::LandingScreen;
pub use login::LoginScreen;
pub use patients::PatientsScreen;
pub use prescriptions::PrescriptionsScreen;
pub use video::VideoScreen;
