//! # Civic Rules
//!
//! The rulebook crate - players, prepared positions, topics and round records
//! for the civic reasoning game. This crate is the single source of truth for
//! game state and does not contain any question planning or scoring logic.

pub mod config;
pub mod entities;
pub mod mechanics;
pub mod registry;

pub use config::*;
pub use entities::*;
pub use mechanics::*;
pub use registry::*;
