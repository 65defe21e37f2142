use clap::{Parser, Subcommand};

use healthcare_plus::listing::{self, Query, StatusFilter};
use healthcare_plus::models::AppointmentStatus;
use healthcare_plus::routes::Route;

#[derive(Parser)]
#[command(name = "healthcare-plus")]
#[command(about = "Patient and doctor portal: book appointments, video consultations, prescriptions and emergency help")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the terminal UI (default)
    Tui {
        /// Initial route, e.g. / or /doctor/login
        #[arg(long, default_value = "/")]
        start: String,
    },

    /// List appointments matching a search and status filter
    Appointments {
        /// Text matched against patient name and reason
        #[arg(short, long, default_value = "")]
        query: String,

        /// Status filter (all, upcoming, in-progress, completed, cancelled)
        #[arg(short, long, default_value = "all")]
        status: String,
    },

    /// List patients matching a search
    Patients {
        /// Text matched against patient name and condition
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List prescriptions matching a search
    Prescriptions {
        /// Text matched against doctor, diagnosis and medication names
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// List video consultation doctors matching a search
    Doctors {
        /// Text matched against doctor name and specialty
        #[arg(short, long, default_value = "")]
        query: String,
    },

    /// Sign in to the doctor portal without the UI
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

impl Commands {
    pub fn parse_route(path: &str) -> Result<Route, anyhow::Error> {
        Ok(path.parse()?)
    }

    pub fn parse_appointment_query(query: &str, status: &str) -> Result<Query<AppointmentStatus>, anyhow::Error> {
        let status: StatusFilter<AppointmentStatus> = listing::parse_status_filter(status)?;
        Ok(Query::text(query).with_status(status))
    }
}
