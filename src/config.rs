use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

const DATA_DIR: &str = "hoops_stats";
const DB_FILE: &str = "stats.sqlite";
const DEFAULT_LOG_FILTER: &str = "info";

/// Runtime settings resolved from the environment (after `.env` loading).
#[derive(Debug, Clone)]
pub struct StatsConfig {
    pub db_path: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub log_filter: String,
}

impl StatsConfig {
    pub fn from_env() -> Self {
        let db_path = non_empty_env("HOOPS_DB_PATH")
            .map(PathBuf::from)
            .or_else(default_db_path);
        let export_dir = non_empty_env("HOOPS_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let log_filter =
            non_empty_env("HOOPS_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Self {
            db_path,
            export_dir,
            log_filter,
        }
    }

    /// `--db` on the command line wins over the environment.
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(path) = db_path_arg(args) {
            self.db_path = Some(path);
        }
        self
    }
}

/// Load `.env.local` then `.env`; missing files are fine.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn init_tracing(config: &StatsConfig) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn default_db_path() -> Option<PathBuf> {
    // Prefer XDG data dir.
    if let Ok(base) = std::env::var("XDG_DATA_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(DATA_DIR).join(DB_FILE));
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR)
            .join(DB_FILE),
    )
}

/// Value of `--name <v>` or `--name=<v>`.
pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn db_path_arg(args: &[String]) -> Option<PathBuf> {
    flag_value(args, "--db").map(PathBuf::from)
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
