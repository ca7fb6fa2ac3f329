//! Shared types for the secret santa workspace
//!
//! Contains the participant and group identifiers, the shared error type
//! and the group-aware logging setup used by every crate.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
