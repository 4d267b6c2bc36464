//! Core data models for esqueleto.

mod ids;
mod plan;
mod workout;

pub use ids::*;
pub use plan::*;
pub use workout::*;
