use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use healthsync_lib::config;
use healthsync_lib::db::{self, repository};
use healthsync_lib::pipeline::extraction::SimulatedOcr;
use healthsync_lib::pipeline::ingest::{ReportIngestor, UploadRequest};
use healthsync_lib::scheduling::{self, BookingRequest};
use healthsync_lib::trends;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "healthsync", version)]
#[command(about = "Extract and track vital signs from medical reports", long_about = None)]
struct Cli {
    /// SQLite database path (defaults to the HealthSync data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the vitals found in a report text file (stdin when omitted)
    Extract { file: Option<PathBuf> },
    /// Store a report and its vitals
    Ingest {
        #[arg(short, long)]
        user: String,
        file: PathBuf,
        /// Report category, e.g. "Blood Test"
        #[arg(short = 't', long)]
        report_type: Option<String>,
        /// MIME type (guessed from the file extension when omitted)
        #[arg(long)]
        mime: Option<String>,
    },
    /// List a user's reports, newest first
    Reports {
        #[arg(short, long)]
        user: String,
    },
    /// Show a user's vitals trends
    Trends {
        #[arg(short, long)]
        user: String,
    },
    /// Search the doctor directory ("All" matches everything)
    Doctors {
        #[arg(short, long)]
        specialization: Option<String>,
        #[arg(short, long)]
        city: Option<String>,
        /// List the available specializations and cities instead
        #[arg(long)]
        filters: bool,
    },
    /// Book an appointment with a doctor
    Book {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        doctor: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
        /// One of the doctor's slots, e.g. "9:00 AM"
        #[arg(long)]
        slot: String,
        #[arg(short, long)]
        reason: Option<String>,
    },
    /// List a user's appointments (as doctor or patient)
    Appointments {
        #[arg(short, long)]
        user: String,
    },
    /// Post a chat message on an appointment
    Send {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        appointment: Uuid,
        message: String,
    },
    /// Show an appointment's chat, oldest first
    Messages {
        #[arg(short, long)]
        user: String,
        #[arg(short, long)]
        appointment: Uuid,
    },
}

fn main() -> anyhow::Result<()> {
    healthsync_lib::init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Extract { file } => {
            let text = read_text(file.as_deref())?;
            print_json(&healthsync_lib::extract_vitals(&text), cli.pretty)
        }
        Commands::Ingest {
            user,
            file,
            report_type,
            mime,
        } => {
            let conn = open_db(&cli)?;
            let bytes = std::fs::read(file).with_context(|| format!("reading {}", file.display()))?;
            let mime_type = mime.clone().unwrap_or_else(|| {
                mime_guess::from_path(file).first_or_octet_stream().to_string()
            });
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let ingestor = ReportIngestor::new(Box::new(SimulatedOcr::new()));
            let report = ingestor.ingest(
                &conn,
                &UploadRequest {
                    user_id: user,
                    file_name: &file_name,
                    mime_type: &mime_type,
                    report_type: report_type.as_deref(),
                    bytes: &bytes,
                },
            )?;
            print_json(&report, cli.pretty)
        }
        Commands::Reports { user } => {
            let conn = open_db(&cli)?;
            print_json(&repository::list_reports_for_user(&conn, user)?, cli.pretty)
        }
        Commands::Trends { user } => {
            let conn = open_db(&cli)?;
            print_json(&trends::get_vitals_trends(&conn, user)?, cli.pretty)
        }
        Commands::Doctors {
            specialization,
            city,
            filters,
        } => {
            let conn = open_db(&cli)?;
            if *filters {
                print_json(&repository::doctor_filters(&conn)?, cli.pretty)
            } else {
                let doctors =
                    repository::search_doctors(&conn, specialization.as_deref(), city.as_deref())?;
                print_json(&doctors, cli.pretty)
            }
        }
        Commands::Book {
            user,
            doctor,
            date,
            slot,
            reason,
        } => {
            let conn = open_db(&cli)?;
            let appointment = scheduling::book_appointment(
                &conn,
                user,
                &BookingRequest {
                    doctor_id: doctor,
                    date: *date,
                    time_slot: slot,
                    reason: reason.as_deref(),
                },
            )?;
            print_json(&appointment, cli.pretty)
        }
        Commands::Appointments { user } => {
            let conn = open_db(&cli)?;
            print_json(&scheduling::list_appointments(&conn, user)?, cli.pretty)
        }
        Commands::Send {
            user,
            appointment,
            message,
        } => {
            let conn = open_db(&cli)?;
            print_json(&scheduling::send_message(&conn, user, appointment, message)?, cli.pretty)
        }
        Commands::Messages { user, appointment } => {
            let conn = open_db(&cli)?;
            print_json(&scheduling::list_messages(&conn, user, appointment)?, cli.pretty)
        }
    }
}

fn open_db(cli: &Cli) -> anyhow::Result<rusqlite::Connection> {
    let path = cli.db.clone().unwrap_or_else(config::database_path);
    tracing::info!(path = %path.display(), "{} v{}", config::APP_NAME, config::APP_VERSION);
    db::open_database(&path).with_context(|| format!("opening database {}", path.display()))
}

fn read_text(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
            Ok(text)
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
