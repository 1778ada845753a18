//! Core data models for olympia.
//!
//! Epistemic mapping:
//! - K_i (Knowledge): Closed enums and constructor-enforced invariants
//! - B_i (Beliefs): Wrapped in Result/Option
//! - I^R (Resolvable): Config parameters and instruction overrides
//! - I^B (Bounded): Error variants for IO and malformed records

mod config;
mod descriptor;
mod error;
mod outcome;
mod record;
mod tags;

pub use config::*;
pub use descriptor::*;
pub use error::*;
pub use outcome::*;
pub use record::*;
pub use tags::*;
