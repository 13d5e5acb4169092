mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use medcal_core::catalog::LocationCatalog;
use medcal_core::context::RunContext;
use medcal_core::sink::caldav::CaldavSink;
use medcal_core::{appointment, event, ics, resolver, sink};
use owo_colors::OwoColorize;

use crate::config::SyncConfig;

/// Display name of the calendar that receives published events.
const TARGET_CALENDAR: &str = "Medicover";

/// Export Medicover appointments as calendar events.
#[derive(Parser)]
#[command(name = "medcal", version)]
#[command(about = "Convert a Medicover appointment export into an ICS file or a CalDAV calendar")]
pub struct Cli {
    /// Input JSON file with appointments
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output ICS file for the combined calendar
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// CalDAV server URL
    #[arg(long, value_name = "URL", env = "CALDAV_URL")]
    pub caldav: Option<String>,

    /// Name appended to every event summary
    #[arg(short, long, value_name = "NAME")]
    pub person_name: Option<String>,

    /// Clinic-location catalog file
    #[arg(long, value_name = "FILE", default_value = "locations.json")]
    pub locations: PathBuf,

    /// Skip TLS certificate validation on the CalDAV connection
    #[arg(long)]
    pub insecure: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let sync_config = match SyncConfig::resolve(cli) {
        Ok(sync_config) => sync_config,
        Err(e) => {
            eprintln!("{} {e}", "error:".red());
            eprintln!();
            let _ = Cli::command().print_help();
            return ExitCode::from(2);
        }
    };

    if let Err(e) = run(sync_config) {
        eprintln!("{} {e:#}", "error:".red());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(config: SyncConfig) -> Result<()> {
    let catalog = LocationCatalog::load(&config.locations)?;
    let appointments = appointment::load(&config.input)
        .with_context(|| format!("reading {}", config.input.display()))?;

    let ctx = RunContext::new(config.person_name.clone());

    let mut events = Vec::with_capacity(appointments.len());
    for appointment in &appointments {
        let resolved = resolver::resolve(&appointment.clinic_name, &catalog);
        events.push(event::build(appointment, resolved.as_ref(), &ctx)?);
    }

    if let Some(path) = &config.output {
        println!("Writing {}", path.display());
        let combined = ics::combined_calendar(&events);
        sink::file::write(&combined, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if let Some(url) = &config.caldav_url {
        publish(&events, url.clone(), &config)?;
    }

    Ok(())
}

fn publish(events: &[event::CalendarEvent], url: url::Url, config: &SyncConfig) -> Result<()> {
    let caldav = CaldavSink::connect(url, config.tls)?;
    let calendar = caldav.find_calendar(TARGET_CALENDAR)?;
    println!("Publishing to calendar '{}'", calendar.display_name);

    for event in events {
        let document = ics::event_calendar(event);
        if caldav.publish_event(&calendar, &event.uid, &document)? {
            println!("{} {}", "created".green(), event.uid);
        } else {
            println!("{} {} (already on server)", "skipped".yellow(), event.uid);
        }
    }

    Ok(())
}
