//! Record file codec
//!
//! One line per participant: `name,contact,past-recipient,past-recipient,...`.
//! Lines are kept verbatim so that anyone not assigned this cycle is written
//! back byte for byte.

use std::collections::HashSet;
use std::path::Path;

use shared::Participant;

use crate::core::generator::Assignment;
use crate::error::{SantaError, SantaResult};

/// One participant's record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub name: Participant,
    pub contact: Option<String>,
    /// Past recipients, oldest first
    pub history: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RosterLine {
    raw: String,
    entry: Option<RosterEntry>,
    /// Terminator the line was read with; `None` for a final unterminated line
    ending: Option<LineEnding>,
}

/// Parsed contents of one group's record file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    lines: Vec<RosterLine>,
    line_ending: LineEnding,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

impl Roster {
    /// Parse record file content; `path` is only used for diagnostics
    pub fn parse(content: &str, path: &Path) -> SantaResult<Self> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        let mut line_ending = None;

        for (index, chunk) in content.split_inclusive('\n').enumerate() {
            let (raw, ending) = split_terminator(chunk);
            line_ending = line_ending.or(ending);

            if raw.trim().is_empty() {
                lines.push(RosterLine {
                    raw: raw.to_string(),
                    entry: None,
                    ending,
                });
                continue;
            }

            let entry = parse_entry(raw).map_err(|reason| SantaError::MalformedRecord {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })?;

            if !seen.insert(entry.name.clone()) {
                return Err(SantaError::DuplicateParticipant {
                    participant: entry.name,
                    path: path.to_path_buf(),
                });
            }

            lines.push(RosterLine {
                raw: raw.to_string(),
                entry: Some(entry),
                ending,
            });
        }

        Ok(Self {
            lines,
            line_ending: line_ending.unwrap_or_default(),
        })
    }

    /// Serialize back to record file content, always newline terminated
    ///
    /// Every line keeps the terminator it was read with. A final line that
    /// had none gets the first terminator seen in the file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.raw);
            out.push_str(line.ending.unwrap_or(self.line_ending).as_str());
        }
        out
    }

    pub fn entries(&self) -> impl Iterator<Item = &RosterEntry> {
        self.lines.iter().filter_map(|line| line.entry.as_ref())
    }

    pub fn get(&self, name: &str) -> Option<&RosterEntry> {
        self.entries().find(|entry| entry.name.as_str() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn contact_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|entry| entry.contact.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of this roster with each assigned participant's new recipient
    /// appended as one more column; every other line is left untouched
    pub fn with_assignment(&self, assignment: &Assignment) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                let Some(entry) = &line.entry else {
                    return line.clone();
                };
                let Some(recipient) = assignment.recipient_of(entry.name.as_str()) else {
                    return line.clone();
                };

                let mut entry = entry.clone();
                // Keep the contact column even when it was empty
                let mut raw = line.raw.trim_end().to_string();
                if raw.split(',').count() < 2 {
                    raw.push(',');
                }
                raw.push(',');
                raw.push_str(recipient.as_str());
                entry.history.push(recipient.clone());

                RosterLine {
                    raw,
                    entry: Some(entry),
                    ending: line.ending,
                }
            })
            .collect();

        Self {
            lines,
            line_ending: self.line_ending,
        }
    }
}

/// Split one `split_inclusive` chunk into its content and terminator
fn split_terminator(chunk: &str) -> (&str, Option<LineEnding>) {
    if let Some(raw) = chunk.strip_suffix("\r\n") {
        (raw, Some(LineEnding::CrLf))
    } else if let Some(raw) = chunk.strip_suffix('\n') {
        (raw, Some(LineEnding::Lf))
    } else {
        (chunk, None)
    }
}

fn parse_entry(raw: &str) -> Result<RosterEntry, String> {
    let mut columns = raw.split(',').map(str::trim);

    let name = columns.next().unwrap_or_default();
    let name = Participant::new(name).map_err(|err| err.to_string())?;

    let contact = columns
        .next()
        .filter(|contact| !contact.is_empty())
        .map(str::to_string);

    let history = columns
        .filter(|column| !column.is_empty())
        .map(|column| Participant::new(column).map_err(|err| err.to_string()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RosterEntry { name, contact, history })
}
