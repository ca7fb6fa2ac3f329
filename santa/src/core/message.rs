//! Notification messages and their templates

use std::fmt;

use serde::{Deserialize, Serialize};
use shared::Participant;

/// Message templates; `{name}` and `{recipient}` are substituted when rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    pub assignment_subject: String,
    pub assignment_body: String,
    pub absent_subject: String,
    pub absent_body: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            assignment_subject: "Your Secret Santa Assignment".to_string(),
            assignment_body: "Dear {name},\n\nYour assigned Secret Santa recipient is {recipient}.\n\nSincerely,\nSecret Santa"
                .to_string(),
            absent_subject: "You should participate in Secret Santa!".to_string(),
            absent_body: String::new(),
        }
    }
}

impl Templates {
    /// Message telling `giver` who they are buying for
    pub fn assignment(&self, to: &str, giver: &Participant, recipient: &Participant) -> Message {
        Message {
            participant: giver.clone(),
            to: to.to_string(),
            subject: fill(&self.assignment_subject, giver, Some(recipient)),
            body: fill(&self.assignment_body, giver, Some(recipient)),
        }
    }

    /// Message for someone sitting this cycle out
    pub fn absent(&self, to: &str, participant: &Participant) -> Message {
        Message {
            participant: participant.clone(),
            to: to.to_string(),
            subject: fill(&self.absent_subject, participant, None),
            body: fill(&self.absent_body, participant, None),
        }
    }
}

fn fill(template: &str, name: &Participant, recipient: Option<&Participant>) -> String {
    let text = template.replace("{name}", name.as_str());
    match recipient {
        Some(recipient) => text.replace("{recipient}", recipient.as_str()),
        None => text,
    }
}

/// A rendered message addressed to one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub participant: Participant,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "To: {}", self.to)?;
        writeln!(f, "Subject: {}", self.subject)?;
        if !self.body.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.body)?;
        }
        Ok(())
    }
}
