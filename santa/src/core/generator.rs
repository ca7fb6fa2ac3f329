//! Constrained random assignment of givers to recipients
//!
//! The default strategy is a randomized greedy search with bounded retries.
//! It is a Monte Carlo heuristic rather than a complete solver: on sparse
//! eligibility graphs (small groups, long histories) it can exhaust its retry
//! budget even though a valid assignment exists. The exhaustive strategy runs
//! an augmenting-path matching instead and only fails when no perfect
//! assignment exists at all.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shared::Participant;
use tracing::debug;

use crate::error::{SantaError, SantaResult};

/// Participant -> recipients they may legally be assigned this cycle
pub type Eligibility = BTreeMap<Participant, BTreeSet<Participant>>;

/// Search strategy used to build an assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Randomized greedy attempts, discarded wholesale on a dead end
    #[default]
    Greedy,
    /// Augmenting-path matching over a randomly ordered graph
    Exhaustive,
}

/// Complete giver -> recipient mapping for one group and one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    pairs: BTreeMap<Participant, Participant>,
}

impl Assignment {
    pub fn recipient_of(&self, giver: &str) -> Option<&Participant> {
        self.pairs.get(giver)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &Participant)> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Check the mapping covers the whole domain, stays inside every
    /// eligibility set, never maps anyone to themself and never reuses a recipient
    pub fn is_valid_for(&self, eligibility: &Eligibility) -> bool {
        if self.pairs.len() != eligibility.len() {
            return false;
        }

        let mut seen = HashSet::with_capacity(self.pairs.len());
        self.pairs.iter().all(|(giver, recipient)| {
            giver != recipient
                && eligibility
                    .get(giver)
                    .is_some_and(|eligible| eligible.contains(recipient))
                && seen.insert(recipient)
        })
    }
}

impl FromIterator<(Participant, Participant)> for Assignment {
    fn from_iter<T: IntoIterator<Item = (Participant, Participant)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Builds assignments from eligibility sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentGenerator {
    retry_limit: u32,
    strategy: Strategy,
}

impl Default for AssignmentGenerator {
    fn default() -> Self {
        Self {
            retry_limit: Self::DEFAULT_RETRY_LIMIT,
            strategy: Strategy::Greedy,
        }
    }
}

impl AssignmentGenerator {
    pub const DEFAULT_RETRY_LIMIT: u32 = 10;

    /// Greedy generator with the given retry budget (at least one attempt is always made)
    pub fn new(retry_limit: u32) -> Self {
        Self {
            retry_limit: retry_limit.max(1),
            strategy: Strategy::Greedy,
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn retry_limit(&self) -> u32 {
        self.retry_limit
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Produce a complete assignment or fail with `InfeasibleAssignment`
    ///
    /// Recipients that are not themselves keys of `eligibility` are inactive
    /// and never claimed. A partial mapping is never returned.
    pub fn generate<R: Rng + ?Sized>(&self, eligibility: &Eligibility, rng: &mut R) -> SantaResult<Assignment> {
        let candidates = candidate_lists(eligibility);

        match self.strategy {
            Strategy::Greedy => {
                // Someone with no candidates at all makes every attempt fail identically
                let budget = if candidates.values().any(Vec::is_empty) {
                    1
                } else {
                    self.retry_limit
                };

                let mut fewest_unassigned = candidates.len();
                for attempt in 1..=budget {
                    match greedy_attempt(&candidates, rng) {
                        Ok(assignment) => {
                            debug!(attempt, participants = assignment.len(), "assignment found");
                            return Ok(assignment);
                        }
                        Err(unassigned) => {
                            debug!(attempt, unassigned, "assignment attempt hit a dead end");
                            fewest_unassigned = fewest_unassigned.min(unassigned);
                        }
                    }
                }

                Err(SantaError::InfeasibleAssignment {
                    attempts: budget,
                    unassigned: fewest_unassigned,
                })
            }
            Strategy::Exhaustive => exhaustive_match(&candidates, rng)
                .map_err(|unassigned| SantaError::InfeasibleAssignment { attempts: 1, unassigned }),
        }
    }
}

/// Per giver, the active recipients other than the giver
fn candidate_lists(eligibility: &Eligibility) -> BTreeMap<&Participant, Vec<&Participant>> {
    eligibility
        .iter()
        .map(|(giver, eligible)| {
            let active = eligible
                .iter()
                .filter(|recipient| *recipient != giver && eligibility.contains_key(*recipient))
                .collect();
            (giver, active)
        })
        .collect()
}

/// One greedy pass in shuffled order; on a dead end returns how many givers were left
fn greedy_attempt<R: Rng + ?Sized>(
    candidates: &BTreeMap<&Participant, Vec<&Participant>>,
    rng: &mut R,
) -> Result<Assignment, usize> {
    let mut order: Vec<&Participant> = candidates.keys().copied().collect();
    order.shuffle(rng);

    let mut claimed: HashSet<&Participant> = HashSet::with_capacity(order.len());
    let mut pairs = BTreeMap::new();

    for (index, giver) in order.iter().enumerate() {
        let available: Vec<&Participant> = candidates[giver]
            .iter()
            .copied()
            .filter(|recipient| !claimed.contains(recipient))
            .collect();

        let Some(&recipient) = available.choose(rng) else {
            return Err(order.len() - index);
        };

        claimed.insert(recipient);
        pairs.insert((*giver).clone(), recipient.clone());
    }

    Ok(Assignment { pairs })
}

/// Kuhn's augmenting-path matching with givers and candidates visited in random order
fn exhaustive_match<R: Rng + ?Sized>(
    candidates: &BTreeMap<&Participant, Vec<&Participant>>,
    rng: &mut R,
) -> Result<Assignment, usize> {
    let mut shuffled: HashMap<&Participant, Vec<&Participant>> = HashMap::with_capacity(candidates.len());
    for (giver, list) in candidates {
        let mut list = list.clone();
        list.shuffle(rng);
        shuffled.insert(*giver, list);
    }

    let mut givers: Vec<&Participant> = candidates.keys().copied().collect();
    givers.shuffle(rng);

    // recipient -> giver currently holding them
    let mut holder: HashMap<&Participant, &Participant> = HashMap::with_capacity(givers.len());
    let mut unassigned = 0;

    for giver in givers {
        let mut visited = HashSet::new();
        if !augment(giver, &shuffled, &mut holder, &mut visited) {
            unassigned += 1;
        }
    }

    if unassigned > 0 {
        return Err(unassigned);
    }

    Ok(holder
        .into_iter()
        .map(|(recipient, giver)| (giver.clone(), recipient.clone()))
        .collect())
}

fn augment<'a>(
    giver: &'a Participant,
    candidates: &HashMap<&'a Participant, Vec<&'a Participant>>,
    holder: &mut HashMap<&'a Participant, &'a Participant>,
    visited: &mut HashSet<&'a Participant>,
) -> bool {
    for &recipient in &candidates[giver] {
        if !visited.insert(recipient) {
            continue;
        }

        let free = match holder.get(recipient).copied() {
            None => true,
            Some(current) => augment(current, candidates, holder, visited),
        };

        if free {
            holder.insert(recipient, giver);
            return true;
        }
    }
    false
}
