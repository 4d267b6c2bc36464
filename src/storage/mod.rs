//! Local persistence.
//!
//! Layout under the configured data directory:
//! - `collections/workouts.jsonl` — one stored workout per line
//! - `collections/plans.jsonl` — one stored weekly plan per line
//! - `state/active.json` — the active workout/plan pointer
//!
//! Collections are append-mostly JSONL files; updates and deletes rewrite
//! the whole file, which is fine at the volumes a personal training log
//! ever reaches.

pub mod active;
pub mod collection;

pub use active::{ActiveState, ActiveStore};
pub use collection::{Collection, Stored};

use std::path::PathBuf;

use thiserror::Error;

use crate::models::{WeeklyPlan, Workout};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Root of the on-disk layout; cheap to clone, holds no open handles.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn collections_dir(&self) -> PathBuf {
        self.data_dir.join("collections")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    pub fn workouts(&self) -> Collection<Workout> {
        Collection::new(self.collections_dir().join("workouts.jsonl"))
    }

    pub fn plans(&self) -> Collection<WeeklyPlan> {
        Collection::new(self.collections_dir().join("plans.jsonl"))
    }

    pub fn active(&self) -> ActiveStore {
        ActiveStore::new(self.state_dir().join("active.json"))
    }
}
