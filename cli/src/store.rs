//! JSON state file backing the pool engine

use amm_model::{State, StateStore, StoreError};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `seed` as the initial state. Refuses to replace an existing
    /// file unless `force` is set.
    pub fn init(&mut self, seed: &State, force: bool) -> Result<(), StoreError> {
        if self.exists() && !force {
            return Err(StoreError::AlreadyExists { path: self.path.clone() });
        }
        seed.validate()?;
        self.save(seed)
    }

    fn write_err(&self, err: impl ToString) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<State, StoreError> {
        let data = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                path: self.path.clone(),
            },
            _ => StoreError::Read {
                path: self.path.clone(),
                reason: e.to_string(),
            },
        })?;

        let state: State = serde_json::from_str(&data).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        state.validate()?;

        debug!("loaded state from {}", self.path.display());
        Ok(state)
    }

    /// Overwrite the file in full. The JSON goes to a sibling temp file
    /// first and is renamed over the target, so a failed write leaves the
    /// previous state in place.
    fn save(&mut self, state: &State) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(state).map_err(|e| self.write_err(e))?;
        json.push('\n');

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.write_err(e))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json).map_err(|e| self.write_err(e))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.write_err(e));
        }

        debug!("saved state to {}", self.path.display());
        Ok(())
    }
}
