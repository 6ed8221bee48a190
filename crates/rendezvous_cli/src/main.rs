//! `rendezvous` CLI: create, look up and list meetings in a local database.
//!
//! ```sh
//! rendezvous --db meetings.sqlite3 create --payload meeting.json
//! echo '{"title":"sync",...}' | rendezvous create
//! rendezvous get 5f8d0d55-b54a-4c2f-9e43-8d2b1f0c6a11
//! rendezvous range 2020-10-19T00:00:00Z 2020-10-20T00:00:00Z --page 1
//! rendezvous participant p1@gmail.com
//! ```
//!
//! Results are printed as JSON on stdout. Failures print `{"error": "..."}`
//! on stderr and exit with status 1 (2 for retryable store failures).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::error;
use rendezvous_core::db::open_db;
use rendezvous_core::{
    init_logging, parse_meeting_id, MeetingService, PageRequest, SchedulerConfig,
    SchedulingError, SqliteMeetingStore,
};
use serde_json::json;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "rendezvous", version, about = "Double-booking-safe meeting scheduler")]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "rendezvous.sqlite3")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a meeting from a JSON payload
    Create {
        /// Payload file (reads stdin when omitted or `-`)
        #[arg(short, long)]
        payload: Option<PathBuf>,
    },
    /// Show one meeting by id
    Get { id: String },
    /// List meetings fully inside [start, end]
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        /// 1-based page number; all results when omitted
        #[arg(long)]
        page: Option<String>,
    },
    /// List meetings that include a participant email
    Participant {
        email: String,
        #[arg(long)]
        page: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let outcome = SchedulerConfig::from_env()
        .context("failed to load configuration")
        .and_then(|config| run(cli, &config));
    match outcome {
        Ok(output) => println!("{output}"),
        Err(err) => {
            let (body, code) = render_error(&err);
            error!("event=cli_command module=cli status=error exit_code={code}");
            eprintln!("{body}");
            process::exit(code);
        }
    }
}

/// Renders a failure as `{"error": "<message>"}` plus the process exit code:
/// 2 for retryable store failures, 1 for everything else.
fn render_error(err: &anyhow::Error) -> (String, i32) {
    let (message, code) = match err.downcast_ref::<SchedulingError>() {
        Some(scheduling) if scheduling.is_retryable() => (scheduling.to_string(), 2),
        Some(scheduling) => (scheduling.to_string(), 1),
        None => (format!("{err:#}"), 1),
    };
    (json!({ "error": message }).to_string(), code)
}

fn run(cli: Cli, config: &SchedulerConfig) -> Result<String> {
    init_logging(&config.logging).context("failed to initialize logging")?;

    let conn = open_db(&cli.db, &config.store)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let store = SqliteMeetingStore::try_new(&conn)?;
    let service = MeetingService::new(store, config.page_size);

    let value = match cli.command {
        Commands::Create { payload } => {
            let body = read_payload(payload)?;
            serde_json::to_value(service.create_meeting_from_json(&body)?)?
        }
        Commands::Get { id } => {
            let id = parse_meeting_id(&id)?;
            serde_json::to_value(service.get_meeting(id)?)?
        }
        Commands::Range { start, end, page } => {
            let page = PageRequest::parse(page.as_deref())?;
            serde_json::to_value(service.list_meetings_in_range(start, end, page)?)?
        }
        Commands::Participant { email, page } => {
            let page = PageRequest::parse(page.as_deref())?;
            serde_json::to_value(service.list_meetings_for_participant(&email, page)?)?
        }
    };

    Ok(serde_json::to_string_pretty(&value)?)
}

fn read_payload(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read payload `{}`", path.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read payload from stdin")?;
            Ok(buf)
        }
    }
}
