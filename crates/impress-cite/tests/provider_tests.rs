//! Citation provider integration tests

mod common;

use chrono::Duration;
use common::fixtures::{bibtex_fixture_path, load_bibtex_fixture};
use impress_cite::{
    CitationProvider, CiteConfig, CiteError, ManualClock, SharedCitationProvider,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn manual_provider(config: CiteConfig) -> (CitationProvider<ManualClock>, ManualClock) {
    let clock = ManualClock::default();
    (CitationProvider::with_clock(config, clock.clone()), clock)
}

fn labels(candidates: &[impress_cite::Candidate]) -> Vec<&str> {
    candidates.iter().map(|c| c.label.as_str()).collect()
}

// === Loading ===

#[test]
fn test_load_fixture_file() {
    let mut provider = CitationProvider::default();
    let count = provider.load_source(bibtex_fixture_path("physics.bib")).unwrap();
    assert_eq!(count, 3);

    let source_id = bibtex_fixture_path("physics.bib").display().to_string();
    assert_eq!(provider.index().get(&source_id).map(|e| e.len()), Some(3));
}

#[test]
fn test_load_temp_file_and_reload() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "@article{{first, title = {{One}}}}").unwrap();
    file.flush().unwrap();

    let (mut provider, clock) = manual_provider(CiteConfig::default());
    assert_eq!(provider.load_source(file.path()).unwrap(), 1);
    assert_eq!(labels(&provider.provide_candidates()), vec!["first"]);

    std::fs::write(file.path(), "@article{second, title = {Two}} @misc{third}").unwrap();
    assert_eq!(provider.load_source(file.path()).unwrap(), 2);
    clock.advance(Duration::milliseconds(1001));
    assert_eq!(labels(&provider.provide_candidates()), vec!["second", "third"]);
}

#[test]
fn test_unreadable_source_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.bib");

    let mut provider = CitationProvider::default();
    let err = provider.load_source(&missing).unwrap_err();
    match err {
        CiteError::UnreadableSource { path, .. } => assert_eq!(path, missing),
        other => panic!("unexpected error: {}", other),
    }
    assert!(provider.index().is_empty());
}

// === Candidates ===

#[test]
fn test_candidate_projection_from_fixture() {
    let (mut provider, _) = manual_provider(CiteConfig::default());
    provider.parse_source("physics.bib", &load_bibtex_fixture("physics.bib"));

    let candidates = provider.provide_candidates();
    let einstein = &candidates[0];
    assert_eq!(einstein.insert_text, "Einstein1905");
    assert_eq!(
        einstein.detail.as_deref(),
        Some("On the Electrodynamics of Moving Bodies")
    );
    assert_eq!(
        einstein.documentation,
        "author: Albert Einstein\njournal: Annalen der Physik\npages: 891--921\nvolume: 17\nyear: 1905"
    );

    let smith = &candidates[2];
    assert_eq!(smith.filter_text, "Jane Smith Sets {and} Braces ");
}

#[test]
fn test_documentation_sorted_regardless_of_input_order() {
    let (mut provider, _) = manual_provider(CiteConfig::default());
    provider.parse_source(
        "refs.bib",
        "@misc{k, zeta = z, alpha = a, title = {T}, middle = m}",
    );
    let candidates = provider.provide_candidates();
    assert_eq!(candidates[0].documentation, "alpha: a\nmiddle: m\nzeta: z");
}

#[test]
fn test_legacy_undefined_filter_text() {
    let config = CiteConfig {
        legacy_undefined_fields: true,
        ..CiteConfig::default()
    };
    let (mut provider, _) = manual_provider(config);
    provider.parse_source("refs.bib", "@misc{k, title = {T}}");
    assert_eq!(
        provider.provide_candidates()[0].filter_text,
        "undefined T undefined"
    );
}

#[test]
fn test_failed_source_does_not_block_others() {
    let (mut provider, _) = manual_provider(CiteConfig::default());
    provider.parse_source("broken.bib", "@article{only, title {no equals}}");
    provider.parse_source("good.bib", "@article{fine, title = {Fine}}");
    assert_eq!(labels(&provider.provide_candidates()), vec!["fine"]);
}

// === Cache Window ===

#[test]
fn test_identical_results_within_window() {
    let (mut provider, clock) = manual_provider(CiteConfig::default());
    provider.parse_source("refs.bib", "@misc{a, note = x}");
    let first = provider.provide_candidates();

    provider.parse_source("more.bib", "@misc{b, note = x}");
    clock.advance(Duration::milliseconds(500));
    let second = provider.provide_candidates();
    assert_eq!(first, second);

    clock.advance(Duration::milliseconds(600));
    assert_eq!(labels(&provider.provide_candidates()), vec!["a", "b"]);
}

#[test]
fn test_forget_excluded_after_window() {
    let (mut provider, clock) = manual_provider(CiteConfig::default());
    provider.parse_source("a.bib", "@misc{a1, note = x} @misc{a2, note = x}");
    provider.parse_source("b.bib", "@misc{b1, note = x}");
    assert_eq!(provider.provide_candidates().len(), 3);

    assert!(provider.forget_source("a.bib"));
    assert_eq!(provider.provide_candidates().len(), 3);

    clock.advance(Duration::seconds(2));
    assert_eq!(labels(&provider.provide_candidates()), vec!["b1"]);
}

#[test]
fn test_custom_window() {
    let config = CiteConfig {
        cache_window_ms: 0,
        ..CiteConfig::default()
    };
    let (mut provider, clock) = manual_provider(config);
    provider.parse_source("refs.bib", "@misc{a, note = x}");
    provider.provide_candidates();

    provider.parse_source("refs.bib", "@misc{b, note = x}");
    clock.advance(Duration::milliseconds(1));
    assert_eq!(labels(&provider.provide_candidates()), vec!["b"]);
}

// === Matching ===

#[test]
fn test_provide_matching_fixture() {
    let (mut provider, _) = manual_provider(CiteConfig::default());
    provider.parse_source("physics.bib", &load_bibtex_fixture("physics.bib"));

    let matched = provider.provide_matching("feynman lectures", None);
    assert_eq!(labels(&matched), vec!["Feynman1965"]);
    assert!(provider.provide_matching("quantum gravity", None).is_empty());
}

// === Shared Provider ===

#[test]
fn test_shared_provider_forget() {
    let shared = SharedCitationProvider::new(CitationProvider::default());
    shared.parse_source("a.bib", "@misc{a, note = x}");
    shared.parse_source("b.bib", "@misc{b, note = x}");
    assert_eq!(shared.provide_candidates().len(), 2);

    shared.forget_source("a.bib");
    shared.invalidate_cache();
    assert_eq!(labels(&shared.provide_candidates()), vec!["b"]);
    assert_eq!(shared.lock().index().len(), 1);
}
