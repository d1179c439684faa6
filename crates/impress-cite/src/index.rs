//! Per-source entry index.
//!
//! Each source identifier (usually a `.bib` path) owns the entries last
//! parsed from it. A source's list is only ever replaced wholesale or
//! removed; entries are never edited in place.

use indexmap::IndexMap;

use crate::entry::BibEntry;
use crate::parser;

/// Entries grouped by source, in the order sources were first added.
#[derive(Debug, Clone, Default)]
pub struct SourceIndex {
    sources: IndexMap<String, Vec<BibEntry>>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and replace the entries stored for `source_id`.
    ///
    /// Returns the number of entries stored. Malformed entries are logged
    /// and left out; a source that was already present keeps its position.
    pub fn parse(&mut self, source_id: &str, text: &str) -> usize {
        tracing::info!("Parsing .bib entries from {}", source_id);

        let result = parser::parse(text);
        for skipped in &result.errors {
            tracing::warn!(
                source = source_id,
                index = skipped.index,
                key = skipped.key.as_deref().unwrap_or(""),
                "Skipping malformed .bib entry: {}",
                skipped.error
            );
        }

        let count = result.entries.len();
        tracing::info!("Parsed {} .bib entries from {}.", count, source_id);
        self.sources.insert(source_id.to_string(), result.entries);
        count
    }

    /// Remove `source_id` and its entries. Returns whether it was present.
    pub fn forget(&mut self, source_id: &str) -> bool {
        tracing::info!("Forgetting parsed bib entries for {}", source_id);
        self.sources.shift_remove(source_id).is_some()
    }

    /// Entries parsed from `source_id`
    pub fn get(&self, source_id: &str) -> Option<&[BibEntry]> {
        self.sources.get(source_id).map(Vec::as_slice)
    }

    /// Source identifiers in insertion order
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// All entries, by source then by parse order
    pub fn entries(&self) -> impl Iterator<Item = &BibEntry> {
        self.sources.values().flatten()
    }

    /// Number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Number of entries across all sources
    pub fn entry_count(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }
}
