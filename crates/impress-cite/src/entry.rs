//! Bibliography entry data structures

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Recognized BibTeX entry types.
///
/// Entries whose type is not listed here are skipped by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BibEntryType {
    Article,
    Book,
    Booklet,
    Conference,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
}

impl BibEntryType {
    /// Parse an entry type (case-insensitive). Returns `None` for unrecognized types.
    pub fn parse(s: &str) -> Option<Self> {
        let ty = match s.to_ascii_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "conference" => Self::Conference,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            _ => return None,
        };
        Some(ty)
    }

    /// Lowercase tag as written after `@`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::Conference => "conference",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
        }
    }
}

impl std::fmt::Display for BibEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed bibliography entry.
///
/// `key` and `entry_type` are held apart from `fields`; field names are
/// stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBibEntry")]
pub struct BibEntry {
    pub key: String,
    pub entry_type: BibEntryType,
    pub fields: HashMap<String, String>,
}

/// Deserialized form of [`BibEntry`], before fields go through `set_field`
#[derive(Deserialize)]
struct RawBibEntry {
    key: String,
    entry_type: BibEntryType,
    #[serde(default)]
    fields: HashMap<String, String>,
}

impl From<RawBibEntry> for BibEntry {
    fn from(raw: RawBibEntry) -> Self {
        let mut entry = BibEntry::new(raw.key, raw.entry_type);
        for (name, value) in raw.fields {
            entry.set_field(name, value);
        }
        entry
    }
}

impl BibEntry {
    /// Create an entry with no fields
    pub fn new(key: impl Into<String>, entry_type: BibEntryType) -> Self {
        Self {
            key: key.into(),
            entry_type,
            fields: HashMap::new(),
        }
    }

    /// Set a field, replacing any previous value.
    ///
    /// A field named `key` is ignored so the citation key never appears twice.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        if name == "key" {
            return;
        }
        self.fields.insert(name, value.into());
    }

    /// Get a field value by name (case-insensitive)
    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Fields sorted by name
    pub fn sorted_fields(&self) -> Vec<(&str, &str)> {
        let mut fields: Vec<(&str, &str)> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        fields.sort_unstable_by(|a, b| a.0.cmp(b.0));
        fields
    }

    pub fn title(&self) -> Option<&str> {
        self.get_field("title")
    }

    pub fn author(&self) -> Option<&str> {
        self.get_field("author")
    }

    pub fn journal(&self) -> Option<&str> {
        self.get_field("journal")
    }

    pub fn year(&self) -> Option<&str> {
        self.get_field("year")
    }
}
