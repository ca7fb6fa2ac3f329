//! Run driver
//!
//! Processes every configured group in order: load the records, derive
//! eligibility, generate an assignment, back up and rewrite the records, and
//! only then notify participants. A group that fails before its records are
//! rewritten sends nothing and leaves its file untouched; other groups carry on.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shared::{group_debug, group_error, group_info, group_warn, logging, GroupId, Participant};

use crate::config::{Config, GroupConfig};
use crate::core::{eligibility, Assignment, Message, Roster};
use crate::error::{SantaError, SantaResult};
use crate::traits::{Notifier, RecordStore};

/// Result of one fully processed group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReport {
    pub group: GroupId,
    pub assigned: usize,
    /// Backup of the records taken before they were rewritten
    pub backup: Option<PathBuf>,
    pub notified: usize,
    pub missing_contact: Vec<Participant>,
    pub failed_delivery: Vec<Participant>,
}

#[derive(Debug)]
pub enum GroupOutcome {
    Completed(GroupReport),
    Failed { group: GroupId, error: SantaError },
}

impl GroupOutcome {
    pub fn group(&self) -> &GroupId {
        match self {
            GroupOutcome::Completed(report) => &report.group,
            GroupOutcome::Failed { group, .. } => group,
        }
    }
}

/// Outcome of every group in a run, in configuration order
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<GroupOutcome>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .iter()
            .all(|outcome| matches!(outcome, GroupOutcome::Completed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&GroupId, &SantaError)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            GroupOutcome::Failed { group, error } => Some((group, error)),
            GroupOutcome::Completed(_) => None,
        })
    }

    pub fn reports(&self) -> impl Iterator<Item = &GroupReport> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            GroupOutcome::Completed(report) => Some(report),
            GroupOutcome::Failed { .. } => None,
        })
    }
}

/// Coordinates a secret santa run over injected collaborators
pub struct SecretSanta<S, N>
where
    S: RecordStore,
    N: Notifier,
{
    config: Config,
    store: S,
    notifier: N,
}

impl<S, N> SecretSanta<S, N>
where
    S: RecordStore,
    N: Notifier,
{
    pub fn new(config: Config, store: S, notifier: N) -> Self {
        Self { config, store, notifier }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every group with an entropy-seeded generator
    pub async fn run(&self) -> SantaResult<RunSummary> {
        let mut rng = StdRng::from_entropy();
        self.run_with_rng(&mut rng).await
    }

    /// Run every group; only a failure to open the notification channel aborts the run
    pub async fn run_with_rng<R: Rng>(&self, rng: &mut R) -> SantaResult<RunSummary> {
        self.notifier.connect().await.map_err(|e| {
            logging::log_error("Connecting notification channel", &e);
            e
        })?;

        let mut summary = RunSummary::default();
        for (group, id) in self.config.groups.iter().zip(self.config.group_ids()) {
            match self.run_group(&id, group, rng).await {
                Ok(report) => {
                    logging::log_success(
                        &id,
                        &format!("{} assigned, {} notified", report.assigned, report.notified),
                    );
                    summary.outcomes.push(GroupOutcome::Completed(report));
                }
                Err(error) => {
                    group_error!(id, "❌ Group {} aborted: {}", id, error);
                    summary.outcomes.push(GroupOutcome::Failed { group: id, error });
                }
            }
        }

        Ok(summary)
    }

    /// Process a single group end to end
    pub async fn run_group<R: Rng>(&self, id: &GroupId, group: &GroupConfig, rng: &mut R) -> SantaResult<GroupReport> {
        logging::log_progress(id, "Loading", &group.records.display().to_string());

        let roster = self.store.load(&group.records).await?;
        for unknown in eligibility::unknown_exclusions(&roster, &group.exclude) {
            group_warn!(id, "⚠️ Excluded participant {} is not in the records", unknown);
        }

        let eligibility = eligibility::build(&roster, &group.exclude);
        let assignment = self.config.generator().generate(&eligibility, rng)?;
        group_debug!(id, "🎲 Generated assignment for {} participants", assignment.len());

        // Persist before anyone hears about the assignment
        let backup = self.persist(id, group, &roster, &assignment).await?;

        let mut report = GroupReport {
            group: id.clone(),
            assigned: assignment.len(),
            backup,
            notified: 0,
            missing_contact: Vec::new(),
            failed_delivery: Vec::new(),
        };

        let templates = &self.config.templates;
        for (giver, recipient) in assignment.iter() {
            let message = roster
                .contact_of(giver.as_str())
                .map(|to| templates.assignment(to, giver, recipient));
            self.deliver(id, giver, message, &mut report).await;
        }
        for absent in &group.exclude {
            let message = roster.contact_of(absent.as_str()).map(|to| templates.absent(to, absent));
            self.deliver(id, absent, message, &mut report).await;
        }

        Ok(report)
    }

    async fn persist(
        &self,
        id: &GroupId,
        group: &GroupConfig,
        roster: &Roster,
        assignment: &Assignment,
    ) -> SantaResult<Option<PathBuf>> {
        if assignment.is_empty() {
            group_info!(id, "No active participants, records left unchanged");
            return Ok(None);
        }

        let backup = self.store.backup(&group.records).await?;
        logging::log_progress(id, "Backed up", &backup.display().to_string());

        self.store
            .persist(&group.records, &roster.with_assignment(assignment))
            .await?;
        logging::log_progress(id, "Updated", &group.records.display().to_string());

        Ok(Some(backup))
    }

    /// Send one message; problems are reported per participant and never abort the group
    async fn deliver(&self, id: &GroupId, participant: &Participant, message: Option<Message>, report: &mut GroupReport) {
        let Some(message) = message else {
            let error = SantaError::MissingContact {
                participant: participant.clone(),
            };
            group_error!(id, "{}", error);
            report.missing_contact.push(participant.clone());
            return;
        };

        match self.notifier.send(&message).await {
            Ok(()) => report.notified += 1,
            Err(error) => {
                group_error!(id, "Could not notify {}: {}", participant, error);
                report.failed_delivery.push(participant.clone());
            }
        }
    }
}
