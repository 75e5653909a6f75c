//! Conformance tests that run YAML fixtures against stackmatch
//!
//! Run with: cargo test -p stackmatch-test --test conformance
//!
//! Note: This test file requires the `fixtures` feature (on by default).

#![cfg(feature = "fixtures")]

use stackmatch_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};

/// Fixture directory inside this crate
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    assert!(
        dir.exists(),
        "Fixtures directory does not exist: {}",
        dir.display()
    );

    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            println!("Running fixture: {}", path.display());

            let yaml = fs::read_to_string(&path).expect("read yaml");

            // Parse potentially multiple fixtures (separated by ---)
            let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
                panic!("Failed to parse {}: {}", path.display(), e);
            });

            for fixture in fixtures {
                println!("  Running: {}", fixture.name);
                fixture.run_and_assert();
            }
        }
    }
}

#[test]
fn test_leaf() {
    run_fixtures_in_dir(&fixtures_dir().join("01_leaf"));
}

#[test]
fn test_composites() {
    run_fixtures_in_dir(&fixtures_dir().join("02_composites"));
}

#[test]
fn test_grammars() {
    run_fixtures_in_dir(&fixtures_dir().join("03_grammars"));
}
