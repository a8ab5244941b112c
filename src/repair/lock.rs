use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::warn;

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("{0:?} exists: another repair of this file is running, or one crashed and left the lock behind")]
    Held(PathBuf),
    #[error("Failed to create the lock file: {0}")]
    Io(#[from] io::Error),
}

/// Exclusive claim on a file being repaired, held as `<path>.lock` until dropped.
#[derive(Debug)]
pub struct RepairLock {
    path: PathBuf,
}

impl RepairLock {
    pub fn acquire(target: &Path) -> Result<Self, LockError> {
        let mut path = target.as_os_str().to_owned();
        path.push(".lock");
        let path = PathBuf::from(path);
        let mut file = match fs_err::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(LockError::Held(path)),
            Err(e) => return Err(e.into()),
        };
        let lock = Self { path };
        writeln!(file, "{}", std::process::id())?;
        Ok(lock)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RepairLock {
    fn drop(&mut self) {
        if let Err(e) = fs_err::remove_file(&self.path) {
            warn!("Failed to release the lock: {e}");
        }
    }
}
