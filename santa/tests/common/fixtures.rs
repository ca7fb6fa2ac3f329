//! Test fixtures and data for santa tests

use santa::Roster;
use shared::Participant;
use std::path::Path;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const FROM_ADDRESS: &'static str = "santa@example.com";

    /// Five people, two of whom already exchanged gifts last year
    pub const FAMILY: &'static str = "Amy,amy@example.com,Bill\n\
Bill,bill@example.com,Carlos\n\
Carlos,carlos@example.com\n\
David,david@example.com\n\
Ernest,ernest@example.com\n";

    /// Three colleagues with no history
    pub const OFFICE: &'static str = "Felix,felix@example.com\nGina,gina@example.com\nHal,hal@example.com\n";

    /// Four people with no history
    pub const QUARTET: &'static str = "A,a@example.com\nB,b@example.com\nC,c@example.com\nD,d@example.com\n";

    /// Ivy has no contact address on file
    pub const NO_CONTACT: &'static str = "Ivy\nJack,jack@example.com\nKim,kim@example.com\n";

    /// Only one person can take part, so no assignment is possible
    pub const LONELY: &'static str = "Solo,solo@example.com\n";

    pub fn participant(name: &str) -> Participant {
        Participant::new(name).unwrap()
    }

    pub fn roster(content: &str) -> Roster {
        Roster::parse(content, Path::new("fixture.csv")).unwrap()
    }
}
