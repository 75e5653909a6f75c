//! Config conformance tests: validates the config loading path.
//!
//! Run with: cargo test -p stackmatch-test --test config_conformance

#![cfg(feature = "fixtures")]

use stackmatch_test::config_fixture::ConfigFixture;
use stackmatch_test::TestAddress;
use std::fs;
use std::path::{Path, PathBuf};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("config")
}

/// Load and run all config fixtures in a directory.
fn run_config_fixtures(dir: &Path) {
    assert!(
        dir.exists(),
        "Config fixtures directory does not exist: {}",
        dir.display()
    );

    for entry in fs::read_dir(dir).expect("read dir") {
        let path = entry.expect("dir entry").path();

        if !path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            continue;
        }

        println!("Loading config fixture: {}", path.display());
        let yaml = fs::read_to_string(&path).expect("read yaml");
        let fixtures = ConfigFixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);

            if fixture.expect_error {
                assert!(
                    fixture.load().is_err(),
                    "Fixture '{}' expected a load error",
                    fixture.name
                );
                continue;
            }

            let pattern = fixture
                .load()
                .unwrap_or_else(|e| panic!("Fixture '{}' failed to load: {e}", fixture.name));

            for case in &fixture.cases {
                let address: TestAddress = case.address.parse().expect("valid address");
                assert_eq!(
                    pattern.matches(&address),
                    case.expect,
                    "Fixture '{}' address '{}'",
                    fixture.name,
                    case.address
                );
            }
        }
    }
}

#[test]
fn test_config_fixtures() {
    run_config_fixtures(&fixtures_dir());
}
