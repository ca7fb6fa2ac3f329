//! Secret santa assignment library
//!
//! Assigns every active participant of each independent group a recipient
//! they have never had before, records the new assignment in the group's
//! history file and notifies everyone. The assignment search lives in
//! `core`, storage and delivery sit behind the traits in `traits`.

pub mod config;
pub mod core;
pub mod error;
pub mod secret_santa;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::{Config, GroupConfig, RelayConfig};
pub use crate::core::{Assignment, AssignmentGenerator, Eligibility, Message, Roster, Strategy, Templates};
pub use error::{SantaError, SantaResult};
pub use secret_santa::{GroupOutcome, GroupReport, RunSummary, SecretSanta};
pub use traits::{Notifier, RecordStore};
