mod config;
mod shell;

use std::fmt;
use std::io;
use std::path::PathBuf;

use fasttrack_core::model::TaskId;
use services::{AppServices, Clock};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidTaskId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidTaskId { raw } => write!(f, "invalid task id: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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
    eprintln!("  fasttrack [shell]      [--db <sqlite_url>] [--out <dir>]");
    eprintln!("  fasttrack status       [--db <sqlite_url>]");
    eprintln!("  fasttrack toggle <id>  [--db <sqlite_url>]");
    eprintln!("  fasttrack reset        [--db <sqlite_url>]");
    eprintln!("  fasttrack export       [--db <sqlite_url>] [--out <dir>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {}", config::DEFAULT_DB_URL);
    eprintln!("  --out .");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FASTTRACK_DB_URL, FASTTRACK_OUT_DIR, FASTTRACK_LOG, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Shell,
    Status,
    Toggle(TaskId),
    Reset,
    Export,
}

impl Command {
    fn parse(args: &mut impl Iterator<Item = String>, first: &str) -> Result<Self, ArgsError> {
        match first {
            "shell" => Ok(Self::Shell),
            "status" => Ok(Self::Status),
            "toggle" => {
                let raw = require_value(args, "toggle")?;
                raw.parse()
                    .map(Self::Toggle)
                    .map_err(|_| ArgsError::InvalidTaskId { raw })
            }
            "reset" => Ok(Self::Reset),
            "export" => Ok(Self::Export),
            other => Err(ArgsError::UnknownArg(other.to_string())),
        }
    }
}

#[derive(Debug)]
struct Args {
    command: Command,
    db_url: String,
    out_dir: PathBuf,
}

impl Args {
    fn parse(argv: Vec<String>, config: &Config) -> Result<Self, ArgsError> {
        let mut iter = argv.into_iter().peekable();

        // Default behavior: interactive shell when no subcommand is provided.
        let command = match iter.peek() {
            Some(first) if !first.starts_with("--") => {
                let first = first.clone();
                iter.next();
                Command::parse(&mut iter, &first)?
            }
            _ => Command::Shell,
        };

        let mut db_url = normalize_sqlite_url(config.db_url.clone());
        let mut out_dir = config.out_dir.clone();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut iter, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--out" => {
                    out_dir = PathBuf::from(require_value(&mut iter, "--out")?);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            command,
            db_url,
            out_dir,
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
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
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

fn init_tracing(config: &Config) {
    // Logs go to stderr so the shell output on stdout stays clean.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "fasttrack={level},services={level},storage={level}",
                level = config.log_level
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if matches!(argv.first().map(String::as_str), Some("--help" | "-h" | "help")) {
        print_usage();
        return Ok(());
    }

    let config = Config::from_env();
    init_tracing(&config);

    let args = Args::parse(argv, &config).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&args.db_url)?;
    let mut planner = AppServices::new_sqlite(&args.db_url, Clock::system()).await?;
    info!(db = %args.db_url, "storage ready");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Shell => {
            let stdin = io::stdin();
            shell::run(&mut planner, stdin.lock(), &args.out_dir, &mut out).await?;
        }
        Command::Status => shell::render_status(&planner, &mut out)?,
        Command::Toggle(id) => {
            let state = planner.toggle(&id).await?;
            let mark = if state.is_completed(&id) { "done" } else { "not done" };
            println!("{id}: {mark} ({}% completed)", state.percent());
        }
        Command::Reset => {
            planner.reset_progress().await?;
            println!("progress reset");
        }
        Command::Export => {
            let path = planner.write_export(&args.out_dir)?;
            println!("exported to {}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
