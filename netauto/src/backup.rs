//! Running-config backups on local disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::info;
use tempfile::NamedTempFile;

use crate::error::BackupError;

/// Timestamp layout used in backup file names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// File name for a backup of `hostname` taken at `taken_at`.
pub fn backup_file_name(hostname: &str, taken_at: DateTime<Utc>) -> String {
    format!(
        "{}_running_{}.txt",
        hostname,
        taken_at.format(TIMESTAMP_FORMAT)
    )
}

/// Write `config` to `<dir>/<hostname>_running_<timestamp>.txt`.
///
/// The directory is created if needed. Content is staged in a temporary file
/// in the same directory and renamed into place, so either the whole capture
/// lands or nothing does. An existing file with the same name is never
/// replaced.
pub fn write_backup(
    config: &str,
    hostname: &str,
    dir: &Path,
    taken_at: DateTime<Utc>,
) -> Result<PathBuf, BackupError> {
    std::fs::create_dir_all(dir).map_err(|source| BackupError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(backup_file_name(hostname, taken_at));
    let write_err = |source| BackupError::Write {
        path: path.clone(),
        source,
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(write_err)?;
    staged.write_all(config.as_bytes()).map_err(write_err)?;
    staged.as_file().sync_all().map_err(write_err)?;
    staged
        .persist_noclobber(&path)
        .map_err(|e| write_err(e.error))?;

    info!("Backup stored at {}", path.display());
    Ok(path)
}
