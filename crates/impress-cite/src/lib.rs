//! Citation index and completion candidates
//!
//! This crate keeps an in-memory index of bibliography entries per source
//! file and turns it into completion candidates for citation commands.
//!
//! Features:
//! - Brace-depth BibTeX entry splitting that tolerates malformed entries
//! - Per-source replace/forget index with stable source order
//! - Candidate list cached for a short window, with an injectable clock
//! - Thread-safe provider wrapper for multi-threaded hosts

mod candidate;
mod clock;
mod config;
mod entry;
mod error;
mod index;
pub mod parser;
mod provider;
mod query;

pub use candidate::Candidate;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CiteConfig, MAX_CACHE_WINDOW_MS};
pub use entry::{BibEntry, BibEntryType};
pub use error::{CiteError, ParseError, Result};
pub use index::SourceIndex;
pub use parser::{parse, parse_entries, BibParseError, BibParseResult};
pub use provider::{CitationProvider, SharedCitationProvider};
pub use query::{CandidateCache, QueryEngine};
