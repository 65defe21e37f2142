use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use healthcare_plus::{
    auth,
    config::Config,
    fixtures::Fixtures,
    geolocation::ConfiguredLocator,
    listing,
    notification::Notification,
    portal_tui::{ui::truncate, App},
    routes::Router,
    submission::Outcome,
};

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "healthcare_plus=info");
    }

    let config = Config::from_env()?;
    config.validate()?;

    let command = cli.command.unwrap_or(Commands::Tui {
        start: "/".to_string(),
    });

    match command {
        Commands::Tui { start } => {
            // Log to file only so the terminal is not disturbed
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(file_appender(&config.log_file))
                        .with_ansi(false)
                        .with_filter(EnvFilter::from_default_env()),
                )
                .init();
            run_tui(config, &start).await
        }
        command => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_filter(EnvFilter::from_default_env()),
                )
                .with(
                    fmt::layer()
                        .with_writer(file_appender(&config.log_file))
                        .with_ansi(false)
                        .with_filter(EnvFilter::from_default_env()),
                )
                .init();
            handle_cli_command(command, &config).await
        }
    }
}

fn file_appender(log_file: &Path) -> tracing_appender::rolling::RollingFileAppender {
    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "healthcare_plus.log".into());
    tracing_appender::rolling::never(directory, file_name)
}

async fn run_tui(config: Config, start: &str) -> Result<()> {
    info!("Starting HealthCare+ TUI...");

    let start_route = Commands::parse_route(start)?;
    let fixtures = Fixtures::load(&config).context("Failed to load fixtures")?;
    let locator = Arc::new(ConfiguredLocator::new(&config.geolocation));

    let mut app = App::new(config, fixtures, locator);
    app.navigate(start_route);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(_) => {
            info!("HealthCare+ TUI exited successfully");
        }
        Err(e) => {
            error!("HealthCare+ TUI encountered an error: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Handle CLI mode commands - print output and exit
async fn handle_cli_command(command: Commands, config: &Config) -> Result<()> {
    let fixtures = Fixtures::load(config).context("Failed to load fixtures")?;

    match command {
        Commands::Tui { .. } => anyhow::bail!("the terminal UI is not a listing command"),

        Commands::Appointments { query, status } => {
            let query = Commands::parse_appointment_query(&query, &status)?;
            let appointments = listing::filter(&fixtures.appointments, &query);
            if appointments.is_empty() {
                println!("No appointments found matching your criteria.");
                return Ok(());
            }
            println!("{:<8} {:<10} {:<11} {:<16} {:<12} {:<10} {:<30}", "ID", "Time", "Date", "Patient", "Status", "Type", "Reason");
            println!("{}", "-".repeat(100));
            for a in &appointments {
                println!(
                    "{:<8} {:<10} {:<11} {:<16} {:<12} {:<10} {:<30}",
                    a.id,
                    a.time,
                    a.date.format("%Y-%m-%d").to_string(),
                    truncate(&a.patient, 16),
                    a.status.as_str(),
                    a.kind.as_str(),
                    truncate(&a.reason, 30)
                );
            }
            println!();
            println!("Total: {} appointments", appointments.len());
        }

        Commands::Patients { query } => {
            let patients = listing::search(&fixtures.patients, &query);
            if patients.is_empty() {
                println!("No patients found matching your search criteria.");
                return Ok(());
            }
            println!("{:<6} {:<16} {:<5} {:<8} {:<22} {:<11} {:<12}", "ID", "Name", "Age", "Gender", "Condition", "Status", "Next Visit");
            println!("{}", "-".repeat(85));
            for p in &patients {
                println!(
                    "{:<6} {:<16} {:<5} {:<8} {:<22} {:<11} {:<12}",
                    p.id,
                    truncate(&p.name, 16),
                    p.age,
                    p.gender,
                    truncate(&p.condition, 22),
                    p.status.as_str(),
                    p.next_appointment.format("%Y-%m-%d").to_string()
                );
            }
            println!();
            println!("Total: {} patients", patients.len());
        }

        Commands::Prescriptions { query } => {
            let prescriptions = listing::search(&fixtures.prescriptions, &query);
            if prescriptions.is_empty() {
                println!("No prescriptions found.");
                return Ok(());
            }
            for rx in &prescriptions {
                println!(
                    "{}  {}  {}  [{}]",
                    rx.id,
                    rx.date.format("%Y-%m-%d"),
                    rx.doctor_name,
                    rx.status.as_str()
                );
                println!("    Diagnosis: {}", rx.diagnosis);
                for med in &rx.medications {
                    println!("    - {} {} ({}, {})", med.name, med.dosage, med.frequency, med.duration);
                }
            }
            println!();
            println!("Total: {} prescriptions", prescriptions.len());
        }

        Commands::Doctors { query } => {
            let doctors = listing::search(&fixtures.doctors, &query);
            if doctors.is_empty() {
                println!("No doctors match your search.");
                return Ok(());
            }
            println!("{:<20} {:<18} {:<7} {:<10} {:<22}", "Name", "Specialty", "Rating", "Status", "Next Slot");
            println!("{}", "-".repeat(80));
            for d in &doctors {
                println!(
                    "{:<20} {:<18} {:<7.1} {:<10} {:<22}",
                    truncate(&d.name, 20),
                    truncate(&d.specialty, 18),
                    d.rating,
                    if d.is_available() { "available" } else { "busy" },
                    d.next_slot
                );
            }
        }

        Commands::Login { email, password } => {
            let draft = auth::login_draft(&email, &password);
            let mut notes: Vec<Notification> = Vec::new();

            let outcome = auth::login(&draft, &mut notes, config.login_delay());
            let completion = match outcome {
                Ok(Outcome::Pending(pending)) => Some(pending.settle().await?),
                Ok(Outcome::Immediate) => None,
                Err(e) => {
                    warn!("login rejected: {}", e);
                    None
                }
            };

            for note in &notes {
                println!("{}", note);
            }
            let navigate_to = completion.and_then(|completion| {
                println!("{}", completion.notification);
                completion.navigate_to
            });

            match navigate_to {
                Some(route) => println!("Navigate to: {}", route.as_path()),
                None => std::process::exit(1),
            }
        }
    }

    Ok(())
}
