//! # Esqueleto
//!
//! A personal strength-training tracker built around pasting workout
//! plans as free text and getting structured, queryable sessions back.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (workouts, exercises, weekly plans)
//! - **parser**: Format detection, single-day parser, weekly segmenter
//! - **importer**: Validation layer between pasted text and storage
//! - **storage**: JSONL collections and the active workout/plan pointer
//! - **calculate**: History views (week grouping, streaks)
//! - **export**: Pushing workouts to external platforms (Intervals.icu)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod export;
pub mod importer;
pub mod models;
pub mod parser;
pub mod storage;

pub use models::*;
