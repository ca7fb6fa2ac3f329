//! Run configuration
//!
//! Loaded from a JSON file and then adjusted by command line flags. The
//! resulting `Config` is handed to `SecretSanta` explicitly; nothing reads
//! configuration from global state afterwards.
//!
//! ```json
//! {
//!   "from_address": "santa@example.com",
//!   "retry_limit": 10,
//!   "strategy": "greedy",
//!   "dry_run": false,
//!   "relay": { "endpoint": "https://relay.example/send", "token_env": "SANTA_RELAY_TOKEN" },
//!   "groups": [ { "records": "family.csv", "exclude": ["Amy", "Bill"] } ]
//! }
//! ```
//!
//! Record paths that are relative are resolved against the directory of the
//! configuration file.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::{GroupId, Participant, SharedError};

use crate::core::{AssignmentGenerator, Strategy, Templates};
use crate::error::{SantaError, SantaResult};

fn default_retry_limit() -> u32 {
    AssignmentGenerator::DEFAULT_RETRY_LIMIT
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// Whole-run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Sender address stamped on every message
    pub from_address: String,
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    #[serde(default)]
    pub strategy: Strategy,
    /// Print messages instead of dispatching them; skips the relay entirely
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub relay: Option<RelayConfig>,
    #[serde(default)]
    pub templates: Templates,
    pub groups: Vec<GroupConfig>,
}

/// HTTP mail relay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    pub endpoint: String,
    /// Environment variable holding a bearer token for the relay
    #[serde(default)]
    pub token_env: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// One independent group backed by one record file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub records: PathBuf,
    /// Participants sitting this cycle out
    #[serde(default)]
    pub exclude: BTreeSet<Participant>,
}

impl GroupConfig {
    pub fn new(records: impl Into<PathBuf>) -> Self {
        Self {
            records: records.into(),
            exclude: BTreeSet::new(),
        }
    }

    pub fn excluding<I, S>(mut self, names: I) -> SantaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.exclude.insert(Participant::new(name)?);
        }
        Ok(self)
    }

    pub fn id(&self) -> GroupId {
        GroupId::from_path(&self.records)
    }
}

impl Config {
    /// Minimal configuration for the given groups with every default applied
    pub fn new(from_address: impl Into<String>, groups: Vec<GroupConfig>) -> Self {
        Self {
            from_address: from_address.into(),
            retry_limit: default_retry_limit(),
            strategy: Strategy::default(),
            dry_run: false,
            relay: None,
            templates: Templates::default(),
            groups,
        }
    }

    pub fn from_json(content: &str) -> SantaResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a configuration file, resolving relative record paths next to it
    pub async fn load(path: &Path) -> SantaResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SantaError::config(format!("cannot read {}: {}", path.display(), e)))?;
        let mut config = Self::from_json(&content)?;

        if let Some(base) = path.parent() {
            for group in &mut config.groups {
                if group.records.is_relative() {
                    group.records = base.join(&group.records);
                }
            }
        }

        Ok(config)
    }

    /// Check the configuration can drive a run
    pub fn validate(&self) -> SantaResult<()> {
        if self.retry_limit < 1 {
            return Err(invalid("retry_limit", self.retry_limit));
        }
        if self.from_address.trim().is_empty() {
            return Err(invalid("from_address", &self.from_address));
        }
        if self.groups.is_empty() {
            return Err(invalid("groups", "[]"));
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if !seen.insert(&group.records) {
                return Err(invalid("groups.records", group.records.display()));
            }
        }

        if !self.dry_run {
            match &self.relay {
                None => return Err(invalid("relay", "missing (required unless dry_run)")),
                Some(relay) if relay.endpoint.trim().is_empty() => {
                    return Err(invalid("relay.endpoint", &relay.endpoint));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Identifier for every group, in configuration order
    ///
    /// Groups are named after their file stem unless another group shares
    /// that stem, in which case the full record path is used.
    pub fn group_ids(&self) -> Vec<GroupId> {
        let mut stems: HashMap<GroupId, usize> = HashMap::new();
        for group in &self.groups {
            *stems.entry(group.id()).or_default() += 1;
        }

        self.groups
            .iter()
            .map(|group| {
                let id = group.id();
                if stems.get(&id).copied().unwrap_or_default() > 1 {
                    GroupId::new(group.records.display().to_string())
                } else {
                    id
                }
            })
            .collect()
    }

    pub fn generator(&self) -> AssignmentGenerator {
        AssignmentGenerator::new(self.retry_limit).with_strategy(self.strategy)
    }
}

fn invalid(field: &str, value: impl std::fmt::Display) -> SantaError {
    SharedError::InvalidConfig {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SAMPLE: &str = r#"{
        "from_address": "santa@example.com",
        "relay": { "endpoint": "http://localhost:8025/send", "token_env": "SANTA_RELAY_TOKEN" },
        "groups": [
            { "records": "family.csv", "exclude": ["Amy", "Bill"] },
            { "records": "/abs/work.csv" }
        ]
    }"#;

    #[test]
    fn test_defaults_are_applied() {
        let config = Config::from_json(SAMPLE).unwrap();

        assert_eq!(config.retry_limit, 10);
        assert_eq!(config.strategy, Strategy::Greedy);
        assert!(!config.dry_run);
        assert_eq!(config.templates, Templates::default());
        assert_eq!(config.relay.as_ref().unwrap().timeout_ms, 10_000);
        assert_eq!(config.groups[0].exclude.len(), 2);
        assert!(config.groups[1].exclude.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_strategy_parses_lowercase() {
        let config = Config::from_json(
            r#"{"from_address": "s@x", "strategy": "exhaustive", "dry_run": true, "groups": [{"records": "a.csv"}]}"#,
        )
        .unwrap();

        assert_eq!(config.generator().strategy(), Strategy::Exhaustive);
    }

    #[test]
    fn test_invalid_exclusion_name_is_rejected() {
        let result = Config::from_json(r#"{"from_address": "s@x", "groups": [{"records": "a.csv", "exclude": ["a,b"]}]}"#);
        assert_matches!(result, Err(SantaError::JsonError(_)));
    }

    #[test]
    fn test_validate_rejects_zero_retry_limit() {
        let mut config = Config::new("s@x", vec![GroupConfig::new("a.csv")]);
        config.dry_run = true;
        config.retry_limit = 0;

        assert_matches!(
            config.validate(),
            Err(SantaError::SharedError(SharedError::InvalidConfig { field, .. })) if field == "retry_limit"
        );
    }

    #[test]
    fn test_validate_requires_relay_unless_dry_run() {
        let mut config = Config::new("s@x", vec![GroupConfig::new("a.csv")]);
        assert!(config.validate().is_err());

        config.dry_run = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_groups_and_empty_sender() {
        let mut config = Config::new("s@x", vec![GroupConfig::new("a.csv"), GroupConfig::new("a.csv")]);
        config.dry_run = true;
        assert!(config.validate().is_err());

        let mut config = Config::new("  ", vec![GroupConfig::new("a.csv")]);
        config.dry_run = true;
        assert!(config.validate().is_err());

        let mut config = Config::new("s@x", vec![]);
        config.dry_run = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_group_helpers() {
        let group = GroupConfig::new("/data/office.csv").excluding(["Carlos"]).unwrap();

        assert_eq!(group.id().as_str(), "office");
        assert!(group.exclude.contains("Carlos"));
        assert!(GroupConfig::new("x.csv").excluding(["bad,name"]).is_err());
    }

    #[test]
    fn test_group_ids_fall_back_to_path_on_shared_stem() {
        let config = Config::new(
            "s@x",
            vec![
                GroupConfig::new("a/family.csv"),
                GroupConfig::new("b/family.csv"),
                GroupConfig::new("b/office.csv"),
            ],
        );

        let ids: Vec<String> = config.group_ids().iter().map(GroupId::to_string).collect();
        assert_eq!(ids, vec!["a/family.csv", "b/family.csv", "office"]);
    }

    #[test]
    fn test_padded_exclusion_still_removes_participant() {
        use crate::core::{eligibility, Roster};

        let config = Config::from_json(
            r#"{"from_address": "s@x", "dry_run": true, "groups": [{"records": "a.csv", "exclude": [" Amy "]}]}"#,
        )
        .unwrap();
        let roster = Roster::parse("Amy,amy@x\nBill,bill@x\nCarlos,carlos@x\n", Path::new("a.csv")).unwrap();
        let exclude = &config.groups[0].exclude;

        let domain = eligibility::build(&roster, exclude);

        assert!(exclude.contains("Amy"));
        assert!(!domain.contains_key("Amy"));
        assert!(domain.values().all(|eligible| !eligible.contains("Amy")));
        assert!(eligibility::unknown_exclusions(&roster, exclude).is_empty());
    }

    #[tokio::test]
    async fn test_load_resolves_relative_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("santa.json");
        tokio::fs::write(&path, SAMPLE).await.unwrap();

        let config = Config::load(&path).await.unwrap();

        assert_eq!(config.groups[0].records, dir.path().join("family.csv"));
        assert_eq!(config.groups[1].records, PathBuf::from("/abs/work.csv"));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_a_configuration_error() {
        let result = Config::load(Path::new("/definitely/not/here.json")).await;
        assert_matches!(result, Err(SantaError::ConfigurationError { .. }));
    }
}
