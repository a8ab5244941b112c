use std::path::{Path, PathBuf};

use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BackupPolicy {
    /// Write a backup only if there is none yet, so the backup keeps the content from
    /// before the first repair.
    #[default]
    KeepEarliestBackup,
    /// Overwrite the backup on every rewrite.  Content from before earlier repairs is lost.
    RefreshLatestBackup,
}

/// `index.html` with suffix `.backup` becomes `index.html.backup`.
pub fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut path = path.as_os_str().to_owned();
    path.push(suffix);
    path.into()
}

/// Saves `content`, the text of `path` before it is rewritten, according to `policy`.
///
/// Returns the backup path if a backup was written.
pub fn ensure_backup(
    path: &Path,
    content: &str,
    suffix: &str,
    policy: BackupPolicy,
) -> anyhow::Result<Option<PathBuf>> {
    let backup = backup_path(path, suffix);
    if policy == BackupPolicy::KeepEarliestBackup && backup.exists() {
        debug!("Keeping the existing backup {backup:?}");
        return Ok(None);
    }
    fs_err::write(&backup, content)?;
    info!("Backup saved to {backup:?}");
    Ok(Some(backup))
}
