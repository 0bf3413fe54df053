use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use cotizaciones_core::quotes::projector::{DEFAULT_PROJECTION_YEARS, MAX_PROJECTION_YEARS};
use cotizaciones_core::DailySchedule;
use thiserror::Error;

const DEFAULT_STORE_URL: &str = "sqlite://./db/cotizaciones.db";

#[derive(Error, Debug)]
#[error("Invalid {key}='{value}': {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Where the series are persisted, from `COTIZ_STORE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// `sqlite://<path to db file>`
    Sqlite(String),
    /// `csv://<data directory>`
    Csv(PathBuf),
}

impl FromStr for StoreLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(path) = s.strip_prefix("sqlite://") {
            if path.is_empty() {
                return Err("missing database path".to_string());
            }
            Ok(StoreLocation::Sqlite(path.to_string()))
        } else if let Some(dir) = s.strip_prefix("csv://") {
            if dir.is_empty() {
                return Err("missing data directory".to_string());
            }
            Ok(StoreLocation::Csv(PathBuf::from(dir)))
        } else {
            Err("expected sqlite://<path> or csv://<dir>".to_string())
        }
    }
}

impl fmt::Display for StoreLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreLocation::Sqlite(path) => write!(f, "sqlite://{}", path),
            StoreLocation::Csv(dir) => write!(f, "csv://{}", dir.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub store: StoreLocation,
    pub projection_years: u32,
    pub update_schedule: DailySchedule,
    pub scheduler_enabled: bool,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
    pub scraper_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            store: StoreLocation::Sqlite("./db/cotizaciones.db".to_string()),
            projection_years: DEFAULT_PROJECTION_YEARS,
            update_schedule: DailySchedule::default(),
            scheduler_enabled: true,
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            log_format: LogFormat::Text,
            scraper_api_key: None,
        }
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}

fn parse_projection_years(value: &str) -> Result<u32, ConfigError> {
    const KEY: &str = "COTIZ_PROJECTION_YEARS";
    let years: u32 = value.trim().parse().map_err(|e| invalid(KEY, value, e))?;
    if years > MAX_PROJECTION_YEARS {
        return Err(invalid(
            KEY,
            value,
            format!("at most {} years", MAX_PROJECTION_YEARS),
        ));
    }
    Ok(years)
}

impl Config {
    /// Reads the configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let listen_addr = match var("COTIZ_LISTEN_ADDR") {
            Some(v) => v
                .parse()
                .map_err(|e| invalid("COTIZ_LISTEN_ADDR", &v, e))?,
            None => defaults.listen_addr,
        };

        let store_url = var("COTIZ_STORE_URL").unwrap_or_else(|| DEFAULT_STORE_URL.to_string());
        let store = store_url
            .parse()
            .map_err(|e| invalid("COTIZ_STORE_URL", &store_url, e))?;

        let projection_years = match var("COTIZ_PROJECTION_YEARS") {
            Some(v) => parse_projection_years(&v)?,
            None => defaults.projection_years,
        };

        let update_schedule = match var("COTIZ_UPDATE_TIME") {
            Some(v) => DailySchedule::parse(&v).map_err(|e| invalid("COTIZ_UPDATE_TIME", &v, e))?,
            None => defaults.update_schedule,
        };

        let scheduler_enabled = match var("COTIZ_SCHEDULER_ENABLED") {
            Some(v) => parse_bool("COTIZ_SCHEDULER_ENABLED", &v)?,
            None => defaults.scheduler_enabled,
        };

        let cors_allow = var("COTIZ_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout = match var("COTIZ_REQUEST_TIMEOUT_MS") {
            Some(v) => Duration::from_millis(
                v.trim()
                    .parse()
                    .map_err(|e| invalid("COTIZ_REQUEST_TIMEOUT_MS", &v, e))?,
            ),
            None => defaults.request_timeout,
        };

        let log_format = match var("COTIZ_LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) if v.eq_ignore_ascii_case("text") => LogFormat::Text,
            Some(v) => return Err(invalid("COTIZ_LOG_FORMAT", &v, "expected text or json")),
            None => defaults.log_format,
        };

        Ok(Self {
            listen_addr,
            store,
            projection_years,
            update_schedule,
            scheduler_enabled,
            cors_allow,
            request_timeout,
            log_format,
            scraper_api_key: var("SCRAPER_API_KEY"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_years_bounds() {
        assert_eq!(parse_projection_years(" 10 ").unwrap(), 10);
        assert_eq!(parse_projection_years("0").unwrap(), 0);
        assert_eq!(
            parse_projection_years(&MAX_PROJECTION_YEARS.to_string()).unwrap(),
            MAX_PROJECTION_YEARS
        );

        let err = parse_projection_years("4294967295").unwrap_err();
        assert_eq!(err.key, "COTIZ_PROJECTION_YEARS");
        assert!(parse_projection_years("-1").is_err());
        assert!(parse_projection_years("ten").is_err());
    }

    #[test]
    fn test_store_location_parsing() {
        assert_eq!(
            "sqlite://./db/x.db".parse::<StoreLocation>().unwrap(),
            StoreLocation::Sqlite("./db/x.db".to_string())
        );
        assert_eq!(
            "csv://data".parse::<StoreLocation>().unwrap(),
            StoreLocation::Csv(PathBuf::from("data"))
        );
        assert!("postgres://db".parse::<StoreLocation>().is_err());
        assert!("sqlite://".parse::<StoreLocation>().is_err());
    }

    #[test]
    fn test_store_location_display_round_trips() {
        let location = StoreLocation::Csv(PathBuf::from("data"));
        assert_eq!(location.to_string().parse::<StoreLocation>().unwrap(), location);
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("K", "TRUE").unwrap());
        assert!(!parse_bool("K", "off").unwrap());
        assert!(parse_bool("K", "maybe").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr.port(), 8000);
        assert_eq!(config.projection_years, 10);
        assert_eq!(config.update_schedule.cron_expression(), "10 16 * * *");
        assert!(config.scheduler_enabled);
    }
}
