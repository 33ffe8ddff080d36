//! JSON file storage for taskdeck boards.

mod error;

pub use error::FsStoreError;

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use taskdeck_core::BoardSnapshot;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// File name of the persisted board inside the data directory.
pub const STATE_FILE: &str = "task-storage.json";

/// Board storage backed by a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store using `<data_dir>/task-storage.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::at(data_dir.as_ref().join(STATE_FILE))
    }

    /// Store using an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted board. A missing file yields `None`.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or does not hold a valid board.
    pub fn load(&self) -> Result<Option<BoardSnapshot>, FsStoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No stored board yet");
                return Ok(None);
            }
            Err(source) => {
                return Err(FsStoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let board: BoardSnapshot =
            serde_json::from_str(&contents).map_err(|source| FsStoreError::Parse {
                path: self.path.clone(),
                source,
            })?;
        info!(
            path = %self.path.display(),
            tasks = board.tasks.len(),
            groups = board.groups.len(),
            "Loaded board"
        );
        Ok(Some(board))
    }

    /// Replace the persisted board with `board`.
    ///
    /// The document is written to a temporary sibling and renamed into place so
    /// a crash never leaves a half-written file behind.
    ///
    /// # Errors
    /// Returns an error when serialization or any filesystem step fails.
    pub fn save(&self, board: &BoardSnapshot) -> Result<(), FsStoreError> {
        let body = serde_json::to_string_pretty(board)?;
        self.atomic_write(body.as_bytes())
            .map_err(|source| FsStoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            path = %self.path.display(),
            tasks = board.tasks.len(),
            groups = board.groups.len(),
            "Saved board"
        );
        Ok(())
    }

    fn atomic_write(&self, content: &[u8]) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }
}
