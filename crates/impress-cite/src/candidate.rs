//! Completion candidates projected from bibliography entries

use serde::{Deserialize, Serialize};

use crate::entry::BibEntry;

const UNDEFINED: &str = "undefined";

/// A completion item for one citation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Shown in the completion list
    pub label: String,
    /// Text inserted on accept
    pub insert_text: String,
    /// Short description (the entry's title)
    pub detail: Option<String>,
    /// Text the editor filters against: author, title and journal
    pub filter_text: String,
    /// Remaining fields as sorted `name: value` lines
    pub documentation: String,
}

impl Candidate {
    /// Project an entry into a candidate.
    ///
    /// With `legacy_undefined`, absent filter fields are written as
    /// `undefined` to match older clients.
    pub fn from_entry(entry: &BibEntry, legacy_undefined: bool) -> Self {
        let missing = if legacy_undefined { UNDEFINED } else { "" };
        let filter_text = format!(
            "{} {} {}",
            entry.author().unwrap_or(missing),
            entry.title().unwrap_or(missing),
            entry.journal().unwrap_or(missing),
        );

        let documentation = entry
            .sorted_fields()
            .into_iter()
            .filter(|(name, _)| *name != "key" && *name != "title")
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            label: entry.key.clone(),
            insert_text: entry.key.clone(),
            detail: entry.title().map(str::to_string),
            filter_text,
            documentation,
        }
    }

    /// Whether every whitespace-separated term of `query` occurs in the
    /// filter text or the key (case-insensitive). An empty query matches.
    pub fn matches(&self, query: &str) -> bool {
        let haystack = format!("{} {}", self.label, self.filter_text).to_lowercase();
        query
            .split_whitespace()
            .all(|term| haystack.contains(&term.to_lowercase()))
    }
}

impl From<&BibEntry> for Candidate {
    fn from(entry: &BibEntry) -> Self {
        Self::from_entry(entry, false)
    }
}
