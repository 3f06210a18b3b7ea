use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::SessionStore;
use crate::errors::StoreResult;

/// File-backed session store, one file per key under a sessions directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn new<P: Into<PathBuf>>(dir: P) -> StoreResult<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(FileStore { dir })
    }

    /// Open the per-user default store at `~/.config/easel/sessions`.
    pub fn in_default_dir() -> StoreResult<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(ErrorKind::NotFound, "could not determine home directory")
        })?;
        Self::new(home_dir.join(".config").join("easel").join("sessions"))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
