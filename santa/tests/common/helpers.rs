//! Test helpers for santa tests
//!
//! A recording notifier for end-to-end runs against real files, plus
//! assertions over rosters before and after a cycle.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use santa::{Config, GroupConfig, Message, Notifier, Roster, SantaError, SantaResult};
use shared::Participant;

use super::fixtures::TestFixtures;

/// Notifier that keeps every message in memory
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Message>>>,
    refuse: Arc<HashSet<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail delivery to the given addresses
    pub fn refusing(addresses: &[&str]) -> Self {
        Self {
            sent: Arc::default(),
            refuse: Arc::new(addresses.iter().map(|a| a.to_string()).collect()),
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, address: &str) -> Option<Message> {
        self.sent().into_iter().find(|message| message.to == address)
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn connect(&self) -> SantaResult<()> {
        Ok(())
    }

    async fn send(&self, message: &Message) -> SantaResult<()> {
        if self.refuse.contains(&message.to) {
            return Err(SantaError::notification(format!("refused {}", message.to)));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// Write a record file into `dir` and return its path
    pub fn write_group(dir: &Path, file_name: &str, content: &str) -> PathBuf {
        let path = dir.join(file_name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn read_roster(path: &Path) -> Roster {
        let content = std::fs::read_to_string(path).unwrap();
        Roster::parse(&content, path).unwrap()
    }

    /// Dry-run style configuration over the given groups
    pub fn config(groups: Vec<GroupConfig>) -> Config {
        let mut config = Config::new(TestFixtures::FROM_ADDRESS, groups);
        config.dry_run = true;
        config
    }

    /// Files in `dir` whose names mark them as backups
    pub fn backups_in(dir: &Path) -> Vec<PathBuf> {
        let mut backups: Vec<PathBuf> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().contains(".backup-"))
                    .unwrap_or(false)
            })
            .collect();
        backups.sort();
        backups
    }

    /// Assert `after` is `before` plus exactly one fresh, valid recipient per
    /// active participant, and that excluded participants are untouched
    pub fn assert_cycle_applied(before: &Roster, after: &Roster, excluded: &BTreeSet<Participant>) {
        let mut recipients = HashSet::new();

        for old in before.entries() {
            let new = after.get(old.name.as_str()).expect("participant kept");
            assert_eq!(new.contact, old.contact, "contact of {} changed", old.name);

            if excluded.contains(&old.name) {
                assert_eq!(new.history, old.history, "excluded {} was assigned", old.name);
                continue;
            }

            assert_eq!(new.history.len(), old.history.len() + 1, "{} history did not grow by one", old.name);
            assert_eq!(&new.history[..old.history.len()], &old.history[..]);

            let recipient = new.history.last().unwrap();
            assert_ne!(recipient, &old.name, "{} assigned to themself", old.name);
            assert!(!old.history.contains(recipient), "{} got {} again", old.name, recipient);
            assert!(!excluded.contains(recipient), "{} got excluded {}", old.name, recipient);
            assert!(before.contains(recipient.as_str()));
            assert!(recipients.insert(recipient.clone()), "{} assigned twice", recipient);
        }
    }
}
