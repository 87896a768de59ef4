//! Recorded inputs under `test_fixtures/`

use std::path::PathBuf;

pub fn fixture_path(relative: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "test_fixtures", relative].iter().collect()
}

#[allow(dead_code)]
pub fn load_fixture(relative: &str) -> String {
    let path = fixture_path(relative);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

#[allow(dead_code)]
pub fn load_bibtex_fixture(file: &str) -> String {
    load_fixture(&format!("bibtex/{file}"))
}

#[allow(dead_code)]
pub fn load_ris_fixture(file: &str) -> String {
    load_fixture(&format!("ris/{file}"))
}

/// Provider JSON captured from Crossref and Open Library
#[allow(dead_code)]
pub fn load_response_fixture(file: &str) -> String {
    load_fixture(&format!("responses/{file}"))
}
