//! Per-run backup directory and the restore-on-failure guard.

use crate::constants::BACKUP_TIMESTAMP_FORMAT;
use crate::error::{OptimizeError, Result};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Upper bound on `_N` suffixes tried for one timestamp.
const MAX_BACKUP_DIR_ATTEMPTS: u32 = 1000;

/// Timestamped directory holding the untouched originals of one run.
#[derive(Debug, Clone)]
pub struct BackupDir {
    path: PathBuf,
}

impl BackupDir {
    /// Creates a fresh `root/<YYYYMMDD_HHMMSS>` for `timestamp`, parents included.
    ///
    /// A run directory is never shared: when the timestamp name is taken (two
    /// runs in the same second) the next free `_1`, `_2`, ... suffix is used.
    pub fn create(root: &Path, timestamp: DateTime<Local>) -> Result<Self> {
        let stamp = timestamp.format(BACKUP_TIMESTAMP_FORMAT).to_string();
        fs::create_dir_all(root)
            .map_err(|_| OptimizeError::BackupDirectoryCreationFailed(root.to_path_buf()))?;

        for attempt in 0..MAX_BACKUP_DIR_ATTEMPTS {
            let name = match attempt {
                0 => stamp.clone(),
                n => format!("{}_{}", stamp, n),
            };
            let path = root.join(name);
            match fs::create_dir(&path) {
                Ok(()) => return Ok(Self { path }),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(_) => return Err(OptimizeError::BackupDirectoryCreationFailed(path)),
            }
        }

        Err(OptimizeError::BackupDirectoryCreationFailed(root.join(stamp)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the backup of `asset` lives (same file name, flat).
    pub fn backup_path_for(&self, asset: &Path) -> Result<PathBuf> {
        let name = asset
            .file_name()
            .ok_or_else(|| OptimizeError::UnsupportedFormat("Invalid file name".to_string()))?;
        Ok(self.path.join(name))
    }

    /// Copies `asset` byte-for-byte into the backup directory.
    ///
    /// An existing backup copy is never replaced.
    pub fn back_up(&self, asset: &Path) -> Result<PathBuf> {
        let backup = self.backup_path_for(asset)?;
        let write_failure = |source: io::Error| OptimizeError::BackupWriteFailure {
            path: asset.to_path_buf(),
            source,
        };

        let mut source = File::open(asset).map_err(write_failure)?;
        let mut copy = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&backup)
            .map_err(write_failure)?;
        let copied = io::copy(&mut source, &mut copy).and_then(|_| copy.sync_all());
        if let Err(e) = copied {
            drop(copy);
            let _ = fs::remove_file(&backup);
            return Err(write_failure(e));
        }

        Ok(backup)
    }
}

/// Restores an asset from its backup when dropped, unless committed.
///
/// Held for the duration of an in-place rewrite: every early return and `?`
/// between acquisition and [`RestoreGuard::commit`] puts the original back.
pub struct RestoreGuard<'a> {
    asset: &'a Path,
    backup: &'a Path,
    armed: bool,
}

impl<'a> RestoreGuard<'a> {
    pub fn new(asset: &'a Path, backup: &'a Path) -> Self {
        Self {
            asset,
            backup,
            armed: true,
        }
    }

    /// The rewrite succeeded; keep the new content.
    pub fn commit(mut self) {
        self.armed = false;
    }

    /// The rewrite failed; put the original back now and report whether
    /// that worked.
    pub fn restore(mut self) -> Result<()> {
        self.armed = false;
        restore_from_backup(self.asset, self.backup)
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = restore_from_backup(self.asset, self.backup) {
            crate::error!("{}", e);
        }
    }
}

fn restore_from_backup(asset: &Path, backup: &Path) -> Result<()> {
    fs::copy(backup, asset).map_err(|source| OptimizeError::RestoreFailure {
        path: asset.to_path_buf(),
        source,
    })?;
    crate::verbose!("Restored {:?} from {:?}", asset, backup);
    Ok(())
}
