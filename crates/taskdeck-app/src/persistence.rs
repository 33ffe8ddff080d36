//! Storage port used by [`Store`](crate::store::Store).

use std::sync::{Arc, Mutex};

use anyhow::{Error, anyhow};
use taskdeck_core::BoardSnapshot;
use taskdeck_store_fs::{FsStoreError, JsonFileStore};

use crate::notify::guard;

/// Minimal storage abstraction required by the store.
pub trait Persistence {
    /// Error type bubbled up from the backing storage.
    type Error: Into<Error>;

    /// Read the persisted board, `None` when nothing was stored yet.
    ///
    /// # Errors
    /// Returns a storage-specific error when the board cannot be read.
    fn load(&self) -> Result<Option<BoardSnapshot>, Self::Error>;

    /// Replace the persisted board.
    ///
    /// # Errors
    /// Returns a storage-specific error when writing fails.
    fn save(&self, board: &BoardSnapshot) -> Result<(), Self::Error>;
}

impl Persistence for JsonFileStore {
    type Error = FsStoreError;

    fn load(&self) -> Result<Option<BoardSnapshot>, Self::Error> {
        Self::load(self)
    }

    fn save(&self, board: &BoardSnapshot) -> Result<(), Self::Error> {
        Self::save(self, board)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    board: Option<BoardSnapshot>,
    saves: usize,
    fail_saves: bool,
}

/// In-memory storage; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryPersistence {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `board`.
    #[must_use]
    pub fn with_board(board: BoardSnapshot) -> Self {
        let persistence = Self::default();
        guard(&persistence.inner).board = Some(board);
        persistence
    }

    /// Last saved board.
    #[must_use]
    pub fn stored(&self) -> Option<BoardSnapshot> {
        guard(&self.inner).board.clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        guard(&self.inner).saves
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        guard(&self.inner).fail_saves = fail;
    }
}

impl Persistence for MemoryPersistence {
    type Error = Error;

    fn load(&self) -> Result<Option<BoardSnapshot>, Self::Error> {
        Ok(guard(&self.inner).board.clone())
    }

    fn save(&self, board: &BoardSnapshot) -> Result<(), Self::Error> {
        let mut state = guard(&self.inner);
        if state.fail_saves {
            return Err(anyhow!("storage unavailable"));
        }
        state.board = Some(board.clone());
        state.saves += 1;
        drop(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use taskdeck_core::Group;
    use tempfile::tempdir;

    #[test]
    fn memory_persistence_shares_state_between_clones() -> Result<()> {
        let persistence = MemoryPersistence::new();
        let observer = persistence.clone();
        assert!(persistence.load()?.is_none());

        let board = BoardSnapshot::new(vec![], vec![Group {
            id: "group-1".into(),
            title: "Errands".into(),
            tasks: vec![],
            collapsed: false,
        }]);
        persistence.save(&board)?;
        assert_eq!(observer.stored(), Some(board));
        assert_eq!(observer.save_count(), 1);
        Ok(())
    }

    #[test]
    fn failing_saves_keep_previous_board() -> Result<()> {
        let persistence = MemoryPersistence::with_board(BoardSnapshot::default());
        persistence.fail_saves(true);
        let Err(err) = persistence.save(&BoardSnapshot::default()) else {
            panic!("save should fail");
        };
        assert!(err.to_string().contains("unavailable"));
        assert_eq!(persistence.save_count(), 0);
        assert_eq!(persistence.load()?, Some(BoardSnapshot::default()));
        Ok(())
    }

    #[test]
    fn json_file_store_implements_the_port() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonFileStore::in_dir(dir.path());
        assert!(Persistence::load(&store)?.is_none());
        Persistence::save(&store, &BoardSnapshot::default())?;
        assert_eq!(Persistence::load(&store)?, Some(BoardSnapshot::default()));
        Ok(())
    }
}
