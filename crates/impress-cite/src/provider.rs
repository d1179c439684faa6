//! Citation provider: the interface editor integrations talk to.
//!
//! Hosts forward file lifecycle events (opened, changed, deleted) as
//! [`CitationProvider::parse_source`], [`CitationProvider::load_source`] and
//! [`CitationProvider::forget_source`] calls, and ask for completions with
//! [`CitationProvider::provide_candidates`].

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::candidate::Candidate;
use crate::clock::{Clock, SystemClock};
use crate::config::CiteConfig;
use crate::error::{CiteError, Result};
use crate::index::SourceIndex;
use crate::query::QueryEngine;

/// Owns the source index and the query engine over it.
#[derive(Debug)]
pub struct CitationProvider<C: Clock = SystemClock> {
    config: CiteConfig,
    index: SourceIndex,
    engine: QueryEngine<C>,
}

impl CitationProvider<SystemClock> {
    pub fn new(config: CiteConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for CitationProvider<SystemClock> {
    fn default() -> Self {
        Self::new(CiteConfig::default())
    }
}

impl<C: Clock> CitationProvider<C> {
    pub fn with_clock(config: CiteConfig, clock: C) -> Self {
        let engine = QueryEngine::with_clock(&config, clock);
        Self {
            config,
            index: SourceIndex::new(),
            engine,
        }
    }

    /// Replace the entries for `source_id` with those parsed from `text`.
    pub fn parse_source(&mut self, source_id: &str, text: &str) -> usize {
        self.index.parse(source_id, text)
    }

    /// Read a `.bib` file and index it under its path.
    ///
    /// When the file cannot be read, entries previously indexed for it stay
    /// in place.
    pub fn load_source(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let (source_id, text) = read_source(path.as_ref())?;
        Ok(self.parse_source(&source_id, &text))
    }

    /// Remove every entry indexed for `source_id`.
    pub fn forget_source(&mut self, source_id: &str) -> bool {
        self.index.forget(source_id)
    }

    /// All candidates; may lag index changes by up to the cache window.
    pub fn provide_candidates(&mut self) -> Arc<[Candidate]> {
        self.engine.provide(&self.index)
    }

    /// Candidates matching `query`, at most `limit` of them.
    pub fn provide_matching(&mut self, query: &str, limit: Option<usize>) -> Vec<Candidate> {
        self.engine.provide_matching(&self.index, query, limit)
    }

    pub fn invalidate_cache(&mut self) {
        self.engine.invalidate();
    }

    pub fn index(&self) -> &SourceIndex {
        &self.index
    }

    pub fn config(&self) -> &CiteConfig {
        &self.config
    }
}

/// Read a bibliography file, returning its source identifier and text.
fn read_source(path: &Path) -> Result<(String, String)> {
    let text = std::fs::read_to_string(path).map_err(|source| CiteError::UnreadableSource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((path.display().to_string(), text))
}

/// A [`CitationProvider`] behind one lock, for hosts that call in from
/// several threads.
#[derive(Debug, Clone)]
pub struct SharedCitationProvider<C: Clock = SystemClock> {
    inner: Arc<Mutex<CitationProvider<C>>>,
}

impl<C: Clock> SharedCitationProvider<C> {
    pub fn new(provider: CitationProvider<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(provider)),
        }
    }

    /// Lock the provider. State is replaced wholesale, so a poisoned lock
    /// is still consistent and is recovered.
    pub fn lock(&self) -> MutexGuard<'_, CitationProvider<C>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn parse_source(&self, source_id: &str, text: &str) -> usize {
        self.lock().parse_source(source_id, text)
    }

    pub fn load_source(&self, path: impl AsRef<Path>) -> Result<usize> {
        let (source_id, text) = read_source(path.as_ref())?;
        Ok(self.parse_source(&source_id, &text))
    }

    pub fn forget_source(&self, source_id: &str) -> bool {
        self.lock().forget_source(source_id)
    }

    pub fn provide_candidates(&self) -> Arc<[Candidate]> {
        self.lock().provide_candidates()
    }

    pub fn provide_matching(&self, query: &str, limit: Option<usize>) -> Vec<Candidate> {
        self.lock().provide_matching(query, limit)
    }

    pub fn invalidate_cache(&self) {
        self.lock().invalidate_cache();
    }
}
