//! State store abstraction
//!
//! The engine loads the full [`State`] before every operation and saves it
//! back after every committed mutation. Where it lives is up to the store.

use std::path::PathBuf;

use crate::state::State;

/// Failure to read or write persisted state
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("State file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read state from {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write state to {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Failed to parse state in {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("State file already exists: {} (use --force to overwrite)", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("Persisted state is corrupt: {reason}")]
    Corrupt { reason: String },
}

/// Load/save collaborator injected into the engine
pub trait StateStore {
    /// Returns a validated state or an error; never a partial one.
    fn load(&self) -> Result<State, StoreError>;

    /// Overwrites the stored state in full.
    fn save(&mut self, state: &State) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for &mut S {
    fn load(&self) -> Result<State, StoreError> {
        (**self).load()
    }

    fn save(&mut self, state: &State) -> Result<(), StoreError> {
        (**self).save(state)
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<State>,
    fail_next_save: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new(state: State) -> Self {
        Self {
            state: Some(state),
            fail_next_save: false,
            saves: 0,
        }
    }

    /// Store with nothing in it; every load fails with `NotFound`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    /// Number of successful saves so far
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Make the next `save` fail with a write error.
    pub fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<State, StoreError> {
        let state = self.state.ok_or_else(|| StoreError::NotFound {
            path: PathBuf::from("<memory>"),
        })?;
        state.validate()?;
        Ok(state)
    }

    fn save(&mut self, state: &State) -> Result<(), StoreError> {
        if std::mem::take(&mut self.fail_next_save) {
            return Err(StoreError::Write {
                path: PathBuf::from("<memory>"),
                reason: "simulated write failure".to_string(),
            });
        }
        self.state = Some(*state);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Pool, Wallet};

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::empty();
        assert!(matches!(store.load(), Err(StoreError::NotFound { .. })));

        let state = State::new(Pool::new(3.0, 4.0), Wallet::new(1.0, 2.0));
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
        assert_eq!(store.saves(), 1);
    }

    #[test]
    fn test_memory_store_simulated_failure_is_one_shot() {
        let original = State::new(Pool::new(3.0, 4.0), Wallet::default());
        let mut store = MemoryStore::new(original);
        store.fail_next_save();

        let next = State::new(Pool::new(5.0, 6.0), Wallet::default());
        assert!(matches!(store.save(&next), Err(StoreError::Write { .. })));
        assert_eq!(store.state(), Some(&original));

        store.save(&next).unwrap();
        assert_eq!(store.state(), Some(&next));
    }

    #[test]
    fn test_memory_store_rejects_corrupt_state() {
        let corrupt = State::new(
            Pool {
                reserve_a: 1.0,
                reserve_b: 1.0,
                k: 7.0,
            },
            Wallet::default(),
        );
        let store = MemoryStore::new(corrupt);
        assert!(matches!(store.load(), Err(StoreError::Corrupt { .. })));
    }
}
