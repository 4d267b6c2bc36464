//! Active workout/plan pointer.
//!
//! A single JSON file is the only record of which workout and plan are
//! active. Loading heals the pointer against the collections: an id whose
//! document no longer exists is cleared and the healed state written back,
//! so a delete can never leave a dangling reference visible to callers.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Collection, StorageError};
use crate::models::{WeeklyPlan, Workout};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
}

pub struct ActiveStore {
    path: PathBuf,
}

impl ActiveStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Raw pointer state; a missing or unreadable file is an empty state.
    pub fn load(&self) -> Result<ActiveState, StorageError> {
        if !self.path.exists() {
            return Ok(ActiveState::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "active pointer unreadable, resetting");
                Ok(ActiveState::default())
            }
        }
    }

    pub fn save(&self, state: &ActiveState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }

    /// Load the pointer and drop any id that no longer resolves to a
    /// stored document, persisting the healed state when it changed.
    pub fn load_healed(
        &self,
        workouts: &Collection<Workout>,
        plans: &Collection<WeeklyPlan>,
    ) -> Result<ActiveState, StorageError> {
        let mut state = self.load()?;
        let original = state.clone();

        if let Some(id) = &state.workout_id {
            if workouts.get(id)?.is_none() {
                warn!(id = %id, "active workout no longer exists, clearing");
                state.workout_id = None;
            }
        }
        if let Some(id) = &state.plan_id {
            if plans.get(id)?.is_none() {
                warn!(id = %id, "active plan no longer exists, clearing");
                state.plan_id = None;
            }
        }

        if state != original {
            self.save(&state)?;
        }
        Ok(state)
    }
}
