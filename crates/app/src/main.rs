use std::fmt;
use std::time::Duration;

use services::AppServices;
use trivia_core::model::{BatchRequest, DEFAULT_BATCH_SIZE, DEFAULT_CATEGORY, Difficulty, RequestError};
use tracing_subscriber::EnvFilter;

mod driver;

/// How long shutdown waits for an in-flight high-score save.
const SAVE_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidDbUrl { raw: String },
    Request(RequestError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::Request(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<RequestError> for ArgsError {
    fn from(err: RequestError) -> Self {
        ArgsError::Request(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(flag: &'static str, raw: String) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

/// `any` lifts the difficulty filter.
fn parse_difficulty(raw: &str) -> Result<Option<Difficulty>, ArgsError> {
    if raw.trim().eq_ignore_ascii_case("any") {
        return Ok(None);
    }
    Ok(Some(raw.parse()?))
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--amount <n>] [--category <id>]");
    eprintln!("                      [--difficulty easy|medium|hard|any] [--seed <u64>] [--verbose]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:trivia.sqlite3");
    eprintln!("  --amount {DEFAULT_BATCH_SIZE}");
    eprintln!("  --category {DEFAULT_CATEGORY}");
    eprintln!("  --difficulty medium");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRIVIA_DB_URL, TRIVIA_AMOUNT, TRIVIA_CATEGORY, TRIVIA_DIFFICULTY,");
    eprintln!("  TRIVIA_API_URL, TRIVIA_HTTP_TIMEOUT_SECS, RUST_LOG");
}

#[derive(Debug)]
struct Args {
    db_url: String,
    request: BatchRequest,
    seed: Option<u64>,
    verbose: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        let mut db_url = env("TRIVIA_DB_URL")
            .map_or_else(|| "sqlite://trivia.sqlite3".into(), normalize_sqlite_url);
        let mut amount = match env("TRIVIA_AMOUNT") {
            Some(raw) => parse_number("TRIVIA_AMOUNT", raw)?,
            None => DEFAULT_BATCH_SIZE,
        };
        let mut category = match env("TRIVIA_CATEGORY") {
            Some(raw) => Some(parse_number("TRIVIA_CATEGORY", raw)?),
            None => Some(DEFAULT_CATEGORY),
        };
        let mut difficulty = match env("TRIVIA_DIFFICULTY") {
            Some(raw) => parse_difficulty(&raw)?,
            None => Some(Difficulty::Medium),
        };
        let mut seed = None;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--amount" => amount = parse_number("--amount", require_value(args, "--amount")?)?,
                "--category" => {
                    let value = require_value(args, "--category")?;
                    category = if value.trim().eq_ignore_ascii_case("any") {
                        None
                    } else {
                        Some(parse_number("--category", value)?)
                    };
                }
                "--difficulty" => difficulty = parse_difficulty(&require_value(args, "--difficulty")?)?,
                "--seed" => seed = Some(parse_number("--seed", require_value(args, "--seed")?)?),
                "--verbose" | "-v" => verbose = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let request = BatchRequest::new(amount)?
            .with_category(category)
            .with_difficulty(difficulty);

        Ok(Some(Self {
            db_url,
            request,
            seed,
            verbose,
        }))
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

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    init_tracing(parsed.verbose);
    tracing::debug!(?parsed, "starting trivia");

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, parsed.request, parsed.seed).await?;

    let navigator = services.navigator().await;
    driver::run(navigator).await?;

    if tokio::time::timeout(SAVE_GRACE, services.ledger().flush())
        .await
        .is_err()
    {
        tracing::warn!("high score save still running at exit; giving up");
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
