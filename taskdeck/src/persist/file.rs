//! File-backed [`Slot`]: one file per key under a data directory.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{PersistError, Slot};

/// Stores a slot's text in `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file that is synced to disk and then
/// renamed over the target, so a crash mid-write leaves either the old or
/// the new snapshot in place. Undecodable text is copied to
/// `<key>.json.corrupt` next to it.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Creates a slot for `key` inside `dir`.
    #[must_use]
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    /// Creates a slot backed by an explicit file path.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns where undecodable text is set aside.
    #[must_use]
    pub fn corrupt_path(&self) -> PathBuf {
        self.sibling(".corrupt")
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn create_parent(&self) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }
        Ok(())
    }

    fn io_error(path: &Path, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<String>, PersistError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }

    fn write(&self, text: &str) -> Result<(), PersistError> {
        self.create_parent()?;

        let tmp = self.temp_path();
        let mut file = File::create(&tmp).map_err(|e| Self::io_error(&tmp, e))?;
        file.write_all(text.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|e| Self::io_error(&tmp, e))?;
        drop(file);
        std::fs::rename(&tmp, &self.path).map_err(|e| Self::io_error(&self.path, e))
    }

    fn set_aside(&self, text: &str) -> Result<(), PersistError> {
        let path = self.corrupt_path();
        std::fs::write(&path, text).map_err(|e| Self::io_error(&path, e))?;
        tracing::info!(path = %path.display(), "corrupt snapshot copied aside");
        Ok(())
    }
}
