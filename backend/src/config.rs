//! Runtime configuration, read once from the environment at start-up.
//!
//! A `.env` file in the working directory is loaded first when present. Every
//! value has a default except the upstream credentials: a missing
//! `SPREADSHEET_ID` does not stop the server, it turns every upstream request
//! into a `500` with a readable message.

use log::warn;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub spreadsheet_id: Option<String>,
    pub access_token: Option<String>,
    pub api_key: Option<String>,
    pub sheets_api_base: String,
    pub drive_api_base: String,
    /// When set, sheets are read from `<data_dir>/<sheet>.csv` instead of the API.
    pub data_dir: Option<PathBuf>,
    pub static_dir: PathBuf,
    pub catalog_range: String,
    pub summary_range: String,
    pub meta_cell: String,
    pub default_territory: String,
    pub fetch_timeout: Duration,
    pub fetch_retries: u32,
    /// Filter sessions untouched for this long are dropped.
    pub session_ttl: Duration,
    pub open_browser: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Self {
            host: text("HOST", "127.0.0.1"),
            port: parsed(&get, "PORT", 8080),
            spreadsheet_id: get("SPREADSHEET_ID"),
            access_token: get("GOOGLE_ACCESS_TOKEN"),
            api_key: get("GOOGLE_API_KEY"),
            sheets_api_base: text(
                "SHEETS_API_BASE",
                "https://sheets.googleapis.com/v4/spreadsheets",
            ),
            drive_api_base: text("DRIVE_API_BASE", "https://www.googleapis.com/drive/v3/files"),
            data_dir: get("DATA_DIR").map(PathBuf::from),
            static_dir: PathBuf::from(text("STATIC_DIR", "static/dist")),
            catalog_range: text("CATALOG_RANGE", "catalogo!A:K"),
            summary_range: text("SUMMARY_RANGE", "resumo!A:D"),
            meta_cell: text("META_CELL", "_meta!B1"),
            default_territory: text("DEFAULT_TERRITORY", common::pipeline::aggregate::DEFAULT_TERRITORY),
            fetch_timeout: Duration::from_secs(parsed(&get, "FETCH_TIMEOUT_SECS", 15)),
            fetch_retries: parsed(&get, "FETCH_RETRIES", 2),
            session_ttl: Duration::from_secs(parsed(&get, "SESSION_TTL_SECS", 1800)),
            open_browser: parsed(&get, "OPEN_BROWSER", false),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parsed<T, G>(get: &G, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}
