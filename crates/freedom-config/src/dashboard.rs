use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const MIN_REFRESH_SECS: u64 = 10;
pub const MAX_REFRESH_SECS: u64 = 60;
pub const DEFAULT_REFRESH_SECS: u64 = 30;
pub const MAX_RETENTION_DAYS: u64 = 3650;

const CONFIG_ENV: &str = "FREEDOM_CONFIG";
const STATION_ENV: &str = "FREEDOM_STATION";
const REFRESH_ENV: &str = "FREEDOM_REFRESH_SECS";
const SEED_ENV: &str = "FREEDOM_SEED";

/// Dashboard settings loaded from `dashboard.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Station shown at startup (1 or 2).
    #[serde(default = "default_station")]
    pub station: u8,
    /// Seconds between two refresh cycles.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Fixed RNG seed; unset means a fresh seed every run.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
}

fn default_station() -> u8 {
    1
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

fn default_retention_days() -> u64 {
    7
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            retention_days: default_retention_days(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            station: default_station(),
            refresh_secs: default_refresh_secs(),
            seed: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse and validate config TOML.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse dashboard config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read dashboard config at {}", path.display()))?;

        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid dashboard config at {}", path.display()))
    }

    /// Resolve, load and env-override the effective configuration.
    ///
    /// `FREEDOM_CONFIG` names an explicit file that must exist. Without it
    /// the platform default is used when present, otherwise built-in
    /// defaults apply.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path))?,
            None => match default_path() {
                Some(path) if path.exists() => Self::from_path(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `FREEDOM_STATION`, `FREEDOM_REFRESH_SECS` and `FREEDOM_SEED`
    /// through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(STATION_ENV) {
            self.station = parse_env(STATION_ENV, &raw)?;
        }
        if let Some(raw) = lookup(REFRESH_ENV) {
            self.refresh_secs = parse_env(REFRESH_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SEED_ENV) {
            self.seed = Some(parse_env(SEED_ENV, &raw)?);
        }
        Ok(())
    }

    /// Validate ranges.
    pub fn validate(&self) -> Result<()> {
        if !(1..=2).contains(&self.station) {
            bail!("station must be 1 or 2, got {}", self.station);
        }
        validate_refresh_secs(self.refresh_secs)?;
        if !(1..=MAX_RETENTION_DAYS).contains(&self.logging.retention_days) {
            bail!(
                "logging.retention_days must be between 1 and {MAX_RETENTION_DAYS}, got {}",
                self.logging.retention_days
            );
        }
        if let Some(dir) = &self.logging.dir {
            if dir.as_os_str().is_empty() {
                bail!("logging.dir must not be empty");
            }
        }
        Ok(())
    }
}

/// Check an operator-supplied refresh interval.
pub fn validate_refresh_secs(secs: u64) -> Result<()> {
    if !(MIN_REFRESH_SECS..=MAX_REFRESH_SECS).contains(&secs) {
        bail!(
            "refresh_secs must be between {MIN_REFRESH_SECS} and {MAX_REFRESH_SECS}, got {secs}"
        );
    }
    Ok(())
}

/// `<config dir>/freedom-dashboard/dashboard.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("freedom-dashboard").join("dashboard.toml"))
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    match raw.trim().parse() {
        Ok(value) => Ok(value),
        Err(_) => bail!("{key} has an invalid value: {raw:?}"),
    }
}
