//! Route handlers, grouped by resource.

pub mod history;
pub mod import;
pub mod plans;
pub mod workouts;
