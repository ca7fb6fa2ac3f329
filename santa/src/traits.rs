//! Trait definitions with mockall annotations for testing
//!
//! The record store and the notification channel are the two collaborators
//! of a run. Both are injected into `SecretSanta` so the driver can be tested
//! without touching the disk or the network.

use std::path::{Path, PathBuf};

use crate::core::{Message, Roster};
use crate::error::SantaResult;

/// Storage for one record file per group
#[mockall::automock]
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Read and parse the group's record file
    async fn load(&self, records: &Path) -> SantaResult<Roster>;

    /// Durably copy the current record file to a fresh, never reused path
    ///
    /// # Returns
    /// Location of the backup copy
    async fn backup(&self, records: &Path) -> SantaResult<PathBuf>;

    /// Replace the record file with the rendered roster
    async fn persist(&self, records: &Path, roster: &Roster) -> SantaResult<()>;
}

/// Outbound notification channel
#[mockall::automock]
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Verify the channel is usable before any group is processed
    async fn connect(&self) -> SantaResult<()>;

    /// Deliver one message
    async fn send(&self, message: &Message) -> SantaResult<()>;
}
