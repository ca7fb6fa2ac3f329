//! Service implementations
//!
//! Real implementations of the collaborator traits: the file-backed record
//! store and the two notification channels.

pub mod console_notifier;
pub mod record_store;
pub mod relay_notifier;

// Re-export all service implementations
pub use console_notifier::ConsoleNotifier;
pub use record_store::FileRecordStore;
pub use relay_notifier::HttpRelayNotifier;
