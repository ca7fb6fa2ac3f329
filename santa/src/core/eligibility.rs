//! Derives who may receive whom from a roster and this cycle's exclusions

use std::collections::BTreeSet;

use shared::Participant;

use crate::core::generator::Eligibility;
use crate::core::roster::Roster;

/// Everyone in the roster who is not excluded this cycle may receive anyone
/// else still active, except the people they have already had
pub fn build(roster: &Roster, excluded: &BTreeSet<Participant>) -> Eligibility {
    let active: BTreeSet<&Participant> = roster
        .entries()
        .map(|entry| &entry.name)
        .filter(|name| !excluded.contains(*name))
        .collect();

    roster
        .entries()
        .filter(|entry| active.contains(&entry.name))
        .map(|entry| {
            let eligible = active
                .iter()
                .filter(|candidate| ***candidate != entry.name && !entry.history.contains(**candidate))
                .map(|candidate| (*candidate).clone())
                .collect();
            (entry.name.clone(), eligible)
        })
        .collect()
}

/// Exclusions that do not name anyone in the roster
pub fn unknown_exclusions<'a>(roster: &Roster, excluded: &'a BTreeSet<Participant>) -> Vec<&'a Participant> {
    excluded.iter().filter(|name| !roster.contains(name.as_str())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn p(name: &str) -> Participant {
        Participant::new(name).unwrap()
    }

    fn roster(content: &str) -> Roster {
        Roster::parse(content, Path::new("test.csv")).unwrap()
    }

    fn set(names: &[&str]) -> BTreeSet<Participant> {
        names.iter().map(|name| p(name)).collect()
    }

    #[test]
    fn test_no_history_means_everyone_else() {
        let eligibility = build(&roster("A,a@x\nB,b@x\nC,c@x\n"), &BTreeSet::new());

        assert_eq!(eligibility.len(), 3);
        assert_eq!(eligibility[&p("A")], set(&["B", "C"]));
        assert_eq!(eligibility[&p("B")], set(&["A", "C"]));
        assert_eq!(eligibility[&p("C")], set(&["A", "B"]));
    }

    #[test]
    fn test_history_is_excluded() {
        let eligibility = build(&roster("A,a@x,B\nB,b@x,C,A\nC,c@x\n"), &BTreeSet::new());

        assert_eq!(eligibility[&p("A")], set(&["C"]));
        assert_eq!(eligibility[&p("B")], set(&[]));
        assert_eq!(eligibility[&p("C")], set(&["A", "B"]));
    }

    #[test]
    fn test_excluded_participants_leave_the_domain() {
        let eligibility = build(&roster("A,a@x\nB,b@x\nC,c@x\nD,d@x\n"), &set(&["B"]));

        assert!(!eligibility.contains_key(&p("B")));
        assert_eq!(eligibility[&p("A")], set(&["C", "D"]));
        assert!(eligibility.values().all(|eligible| !eligible.contains(&p("B"))));
    }

    #[test]
    fn test_history_of_departed_participants_is_harmless() {
        // Z no longer appears in the roster
        let eligibility = build(&roster("A,a@x,Z\nB,b@x\n"), &BTreeSet::new());
        assert_eq!(eligibility[&p("A")], set(&["B"]));
    }

    #[test]
    fn test_unknown_exclusions() {
        let roster = roster("A,a@x\nB,b@x\n");
        let excluded = set(&["B", "Zed"]);

        assert_eq!(unknown_exclusions(&roster, &excluded), vec![&p("Zed")]);
    }
}
