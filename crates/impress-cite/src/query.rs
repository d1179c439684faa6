//! Candidate query engine with a time-gated cache.
//!
//! Completion is requested on nearly every keystroke, so the flattened
//! candidate list is kept for a short window (one second by default). Within
//! that window the cached list is returned as-is, even if the index has
//! changed since; callers that need the change immediately call
//! [`QueryEngine::invalidate`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::candidate::Candidate;
use crate::clock::{Clock, SystemClock};
use crate::config::CiteConfig;
use crate::index::SourceIndex;

/// The last computed candidate list and when it was computed.
#[derive(Debug, Clone)]
pub struct CandidateCache {
    pub data: Arc<[Candidate]>,
    pub computed_at: Option<DateTime<Utc>>,
}

impl CandidateCache {
    fn empty() -> Self {
        Self {
            data: Arc::from(Vec::new()),
            computed_at: None,
        }
    }

    /// Fresh until more than `window` has passed since the last computation
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.computed_at
            .is_some_and(|computed_at| now - computed_at <= window)
    }
}

impl Default for CandidateCache {
    fn default() -> Self {
        Self::empty()
    }
}

/// Builds completion candidates from a [`SourceIndex`].
#[derive(Debug)]
pub struct QueryEngine<C: Clock = SystemClock> {
    clock: C,
    window: Duration,
    legacy_undefined: bool,
    deduplicate_keys: bool,
    cache: CandidateCache,
}

impl QueryEngine<SystemClock> {
    pub fn new(config: &CiteConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> QueryEngine<C> {
    /// Build an engine. An out-of-range cache window is capped (see
    /// [`CiteConfig::cache_window`]) and logged.
    pub fn with_clock(config: &CiteConfig, clock: C) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!(
                "{}; using a {} ms cache window",
                e,
                config.cache_window().num_milliseconds()
            );
        }
        Self {
            clock,
            window: config.cache_window(),
            legacy_undefined: config.legacy_undefined_fields,
            deduplicate_keys: config.deduplicate_keys,
            cache: CandidateCache::default(),
        }
    }

    /// Candidates for every indexed entry, recomputed at most once per window.
    pub fn provide(&mut self, index: &SourceIndex) -> Arc<[Candidate]> {
        let now = self.clock.now();
        if !self.cache.is_fresh(now, self.window) {
            self.cache = CandidateCache {
                data: self.build(index).into(),
                computed_at: Some(now),
            };
            tracing::debug!("Rebuilt {} citation candidates", self.cache.data.len());
        }
        Arc::clone(&self.cache.data)
    }

    /// Candidates matching every term of `query`, at most `limit` of them.
    pub fn provide_matching(
        &mut self,
        index: &SourceIndex,
        query: &str,
        limit: Option<usize>,
    ) -> Vec<Candidate> {
        let candidates = self.provide(index);
        candidates
            .iter()
            .filter(|c| c.matches(query))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Drop the cached list so the next call recomputes.
    pub fn invalidate(&mut self) {
        self.cache = CandidateCache::default();
    }

    pub fn cache(&self) -> &CandidateCache {
        &self.cache
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn build(&self, index: &SourceIndex) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        index
            .entries()
            .filter(|entry| !self.deduplicate_keys || seen.insert(entry.key.as_str()))
            .map(|entry| Candidate::from_entry(entry, self.legacy_undefined))
            .collect()
    }
}
