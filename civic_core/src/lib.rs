//! # Civic Core
//!
//! The rule-based engine of the civic reasoning game. This crate reads and
//! writes the state defined in `civic_rules`; it never generates text beyond
//! assembling what players wrote.
//!
//! ## Core Components
//!
//! - **socratic**: The fixed question plan, answer ingestion and completeness
//! - **debate**: Opening, rebuttal and closing statements from prepared positions
//! - **scoring**: Completeness scores, simulated votes and the unique-winner rule
//! - **feedback**: Highlights and improvements per player
//! - **forecast**: Estimate clamping and closest-guess scoring
//! - **session**: Drives whole rounds against an explicit `GameRegistry`
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: The same positions always produce the same transcript, votes and scores
//! - **Player-Authored**: Every generated sentence is built from the speaker's own answers
//! - **Ties Are Outcomes**: A shared top vote count or closest estimate awards nobody, it is never an error

pub mod debate;
pub mod error;
pub mod feedback;
pub mod forecast;
pub mod scoring;
pub mod session;
pub mod socratic;

pub use debate::*;
pub use error::*;
pub use feedback::*;
pub use forecast::*;
pub use scoring::*;
pub use session::*;
pub use socratic::*;
