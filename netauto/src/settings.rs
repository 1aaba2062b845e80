//! Runtime settings from the environment.
//!
//! | Variable             | Default   |
//! |----------------------|-----------|
//! | `BACKUPS_DIR`        | `backups` |
//! | `LOGS_DIR`           | `logs`    |
//! | `DEFAULT_PING_COUNT` | `5`       |
//! | `LOG_LEVEL`          | `info`    |

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use log::LevelFilter;

const DEFAULT_PING_COUNT: NonZeroU32 = match NonZeroU32::new(5) {
    Some(count) => count,
    None => unreachable!(),
};

/// Resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backups_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub default_ping_count: NonZeroU32,
    pub log_level: LevelFilter,

    /// Problems found while resolving; reported once logging is up.
    pub warnings: Vec<String>,
}

impl Settings {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` to read variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let default_ping_count = match var("DEFAULT_PING_COUNT") {
            None => DEFAULT_PING_COUNT,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warnings.push(format!(
                    "Invalid DEFAULT_PING_COUNT {raw:?}; falling back to {DEFAULT_PING_COUNT}."
                ));
                DEFAULT_PING_COUNT
            }),
        };

        let log_level = match var("LOG_LEVEL") {
            None => LevelFilter::Info,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warnings.push(format!("Invalid LOG_LEVEL {raw:?}; using info."));
                LevelFilter::Info
            }),
        };

        Self {
            backups_dir: var("BACKUPS_DIR").unwrap_or_else(|| "backups".into()).into(),
            logs_dir: var("LOGS_DIR").unwrap_or_else(|| "logs".into()).into(),
            default_ping_count,
            log_level,
            warnings,
        }
    }
}

/// Load `KEY=value` pairs from `path` into the environment if the file exists.
///
/// Variables already set in the environment win.
pub fn load_env_file(path: &Path) -> Result<bool, dotenv::Error> {
    if !path.exists() {
        return Ok(false);
    }
    dotenv::from_path(path)?;
    Ok(true)
}
