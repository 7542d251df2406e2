//! Conformance tests that run YAML fixtures against envdetect
//!
//! Run with: cargo test -p envdetect-test --test conformance --features fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use envdetect_test::fixture::{Fixture, PatternFixture};
use std::fs;
use std::path::{Path, PathBuf};

/// The fixtures directory next to this crate's manifest
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Every `.yaml`/`.yml` file in `dir`, sorted for stable output
fn yaml_files(dir: &Path) -> Vec<PathBuf> {
    assert!(
        dir.exists(),
        "Fixtures directory does not exist: {}",
        dir.display()
    );

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| is_yaml(path))
        .collect();
    paths.sort();
    assert!(!paths.is_empty(), "no fixtures in {}", dir.display());
    paths
}

fn is_yaml(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "yaml" || e == "yml")
}

/// Load and run all detector fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    for path in yaml_files(dir) {
        println!("Running fixture: {}", path.display());

        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

/// Load and run all pattern fixtures in a directory
fn run_pattern_fixtures_in_dir(dir: &Path) {
    for path in yaml_files(dir) {
        println!("Running fixture: {}", path.display());

        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = PatternFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

#[test]
fn test_wildcard() {
    run_pattern_fixtures_in_dir(&fixtures_dir().join("01_wildcard"));
}

#[test]
fn test_rules() {
    run_fixtures_in_dir(&fixtures_dir().join("02_rules"));
}

#[test]
fn test_resolution() {
    run_fixtures_in_dir(&fixtures_dir().join("03_resolution"));
}
