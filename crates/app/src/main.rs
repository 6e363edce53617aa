use std::fmt;
use std::sync::Arc;

use codeblue_core::model::TrialId;
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, ClientConfig, Clock};
use storage::repository::{ProgressRepository, Storage};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingTrialId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingTrialId => write!(f, "progress requires a trial id"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui       [--db <sqlite_url>] [--api <base_url>]");
    eprintln!("  cargo run -p app -- progress <trial-id> [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- logout   [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:codeblue.sqlite3");
    eprintln!("  --api http://127.0.0.1:8000/api");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CODEBLUE_DB_URL, CODEBLUE_API_BASE_URL, CODEBLUE_HTTP_TIMEOUT_SECS,");
    eprintln!("  CODEBLUE_SYNC_DEBOUNCE_MS, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ui,
    Progress,
    Logout,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "progress" => Some(Self::Progress),
            "logout" => Some(Self::Logout),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    api_url: Option<String>,
    trial_id: Option<TrialId>,
}

impl Args {
    fn parse(
        cmd: &Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("CODEBLUE_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("codeblue.sqlite3".into()), normalize_sqlite_url);
        let mut api_url = None;
        let mut trial_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--api" => api_url = Some(require_value(args, "--api")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if *cmd == Command::Progress && trial_id.is_none() && !arg.starts_with("--") => {
                    trial_id = Some(TrialId::new(arg));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if *cmd == Command::Progress && trial_id.is_none() {
            return Err(ArgsError::MissingTrialId);
        }

        Ok(Self {
            db_url,
            api_url,
            trial_id,
        })
    }

    fn client_config(&self) -> Result<ClientConfig, Box<dyn std::error::Error>> {
        let config = ClientConfig::from_env()?;
        Ok(match &self.api_url {
            Some(url) => config.with_base_url(url)?,
            None => config,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Ui => {
            let config = parsed.client_config()?;
            let services = AppServices::new_sqlite(&parsed.db_url, config, Clock::system()).await?;
            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Code Blue")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Progress => {
            let Some(trial_id) = parsed.trial_id else {
                return Err(ArgsError::MissingTrialId.into());
            };
            let storage = Storage::sqlite(&parsed.db_url).await?;
            match storage.progress.load_progress(&trial_id).await? {
                Some(snapshot) => {
                    println!("trial {trial_id}: {}% complete", snapshot.overall_rate());
                    for (index, row) in snapshot.task_status.rows().iter().enumerate() {
                        let done = row.iter().filter(|done| **done).count();
                        println!("  stage {}: {done}/{} tasks", index + 1, row.len());
                    }
                }
                None => println!("trial {trial_id}: no progress saved on this device"),
            }
            Ok(())
        }
        Command::Logout => {
            let config = parsed.client_config()?;
            let services = AppServices::new_sqlite(&parsed.db_url, config, Clock::system()).await?;
            services.session().logout().await?;
            println!("signed out");
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "exiting");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
