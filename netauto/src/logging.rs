//! Log file setup.
//!
//! Records go through the `log` facade to an env_logger backend writing
//! `<logs_dir>/netauto.log`, rotated by size.

use std::io::Write;
use std::path::{Path, PathBuf};

use file_rotate::compression::Compression;
use file_rotate::suffix::AppendCount;
use file_rotate::{ContentLimit, FileRotate};
use log::{LevelFilter, info};

use crate::error::{Error, Result};

/// Log file name inside the logs directory.
pub const LOG_FILE_NAME: &str = "netauto.log";

const MAX_BYTES: usize = 2_000_000;
const BACKUP_COUNT: usize = 3;

/// Size-rotated log file keeping `backups` old files as `.1`, `.2`, ...
fn rotating_file(path: &Path, max_bytes: usize, backups: usize) -> FileRotate<AppendCount> {
    FileRotate::new(
        path,
        AppendCount::new(backups),
        ContentLimit::Bytes(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None,
    )
}

/// Install the process-wide logger. Later calls leave the first one in place.
///
/// Returns the path of the log file.
pub fn init(logs_dir: &Path, level: LevelFilter) -> Result<PathBuf> {
    std::fs::create_dir_all(logs_dir)
        .map_err(|e| Error::Logging(format!("cannot create {}: {e}", logs_dir.display())))?;

    let path = logs_dir.join(LOG_FILE_NAME);
    let file = rotating_file(&path, MAX_BYTES, BACKUP_COUNT);

    let installed = env_logger::Builder::new()
        .filter_level(level)
        .filter_module("russh", level.min(LevelFilter::Warn))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                buf.timestamp_seconds(),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .is_ok();

    if installed {
        info!("Logging initialized at {}", level);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_keeps_backups() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("test.log");
        let mut file = rotating_file(&path, 10, 2);

        for line in ["aaaaaaaa\n", "bbbbbbbb\n", "cccccccc\n", "dddddddd\n"] {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() <= 10);
        assert!(tmp.path().join("test.log.1").exists());
        assert!(tmp.path().join("test.log.2").exists());
        assert!(!tmp.path().join("test.log.3").exists());
    }

    #[test]
    fn test_init_creates_log_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let logs_dir = tmp.path().join("logs");

        let path = init(&logs_dir, LevelFilter::Info).unwrap();

        assert_eq!(path, logs_dir.join(LOG_FILE_NAME));
        assert!(logs_dir.is_dir());
    }
}
