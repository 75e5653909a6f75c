//! Config conformance fixture runner.
//!
//! Loads YAML fixtures that use the **production config format** (the same
//! shape as [`PatternConfig`]). This tests the config-driven loading path:
//! YAML → `PatternConfig` → `PatternConfig::load()` → match.
//!
//! Unlike the [`fixture`](crate::fixture) module, which builds patterns from
//! a shorthand, this module exercises the production config pipeline.

use serde::Deserialize;
use stackmatch::{Pattern, PatternConfig, PatternError, ProtocolRegistry};

/// A config conformance test fixture.
///
/// The `config` field is the raw YAML/JSON value that gets deserialized as
/// [`PatternConfig`].
#[derive(Debug, Deserialize)]
pub struct ConfigFixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: serde_json::Value,
    #[serde(default)]
    pub cases: Vec<ConfigTestCase>,
    #[serde(default)]
    pub expect_error: bool,
}

/// A test case within a config fixture.
#[derive(Debug, Deserialize)]
pub struct ConfigTestCase {
    pub address: String,
    pub expect: bool,
}

impl ConfigFixture {
    /// Parse a single config fixture from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple config fixtures from a YAML file with `---` separators.
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Deserialize and load the fixture's config against the well-known registry.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidConfig`] if the value does not
    /// deserialize, or any load error from [`PatternConfig::load`].
    pub fn load(&self) -> Result<Pattern, PatternError> {
        let config: PatternConfig =
            serde_json::from_value(self.config.clone()).map_err(|e| PatternError::InvalidConfig {
                message: e.to_string(),
            })?;
        config.load(ProtocolRegistry::well_known())
    }
}
