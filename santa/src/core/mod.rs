//! Core business logic modules
//!
//! Pure logic with no I/O: parsing and rewriting rosters, deriving
//! eligibility, generating assignments and rendering messages.

pub mod eligibility;
pub mod generator;
pub mod message;
pub mod roster;

pub use generator::{Assignment, AssignmentGenerator, Eligibility, Strategy};
pub use message::{Message, Templates};
pub use roster::{Roster, RosterEntry};
