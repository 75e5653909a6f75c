//! Conformance test fixture runner
//!
//! Loads YAML fixtures written in a compact shorthand and runs them against
//! the stackmatch engine. Patterns are built with the combinators directly,
//! bypassing [`PatternConfig`](stackmatch::PatternConfig).
//!
//! ```yaml
//! name: tcp_over_ip
//! description: IP followed by TCP
//! pattern:
//!   and:
//!     - or: [{ protocol: ip4 }, { protocol: ip6 }]
//!     - protocol: tcp
//! cases:
//!   - address: /ip4/1.2.3.4/tcp/80
//!     expect: true
//! ```

use serde::Deserialize;
use stackmatch::prelude::*;

use crate::TestAddress;

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub pattern: PatternSpec,
    pub cases: Vec<TestCase>,
}

/// Shorthand pattern: one key per node.
/// Uses untagged deserialization - composites first, leaves last.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    And(AndSpec),
    Or(OrSpec),
    Grammar(GrammarSpec),
    Protocol(ProtocolSpec),
}

#[derive(Debug, Deserialize)]
pub struct AndSpec {
    pub and: Vec<PatternSpec>,
}

#[derive(Debug, Deserialize)]
pub struct OrSpec {
    pub or: Vec<PatternSpec>,
}

#[derive(Debug, Deserialize)]
pub struct GrammarSpec {
    pub grammar: String,
}

#[derive(Debug, Deserialize)]
pub struct ProtocolSpec {
    pub protocol: String,
}

/// Test case
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub address: String,
    pub expect: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder: Convert shorthand to stackmatch types
// ═══════════════════════════════════════════════════════════════════════════════

impl PatternSpec {
    /// Build a runtime pattern, resolving names against the well-known registry.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for unknown names or empty composites.
    pub fn build(&self) -> Result<Pattern, PatternError> {
        let registry = ProtocolRegistry::well_known();
        match self {
            PatternSpec::And(a) => Pattern::composite(Op::And, Self::build_all(&a.and)?),
            PatternSpec::Or(o) => Pattern::composite(Op::Or, Self::build_all(&o.or)?),
            PatternSpec::Grammar(g) => {
                grammar::by_name(&g.grammar)
                    .cloned()
                    .ok_or_else(|| PatternError::UnknownGrammar {
                        name: g.grammar.clone(),
                        available: grammar::NAMES.iter().map(ToString::to_string).collect(),
                    })
            }
            PatternSpec::Protocol(p) => registry.code(&p.protocol).map(Pattern::leaf).ok_or_else(
                || PatternError::UnknownProtocol {
                    name: p.protocol.clone(),
                    available: registry.names(),
                },
            ),
        }
    }

    fn build_all(specs: &[PatternSpec]) -> Result<Vec<Pattern>, PatternError> {
        specs.iter().map(PatternSpec::build).collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub address: String,
    pub passed: bool,
    pub expected: bool,
    pub actual: bool,
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Run all test cases and return results
    ///
    /// # Panics
    ///
    /// Panics if the pattern or an address is malformed; fixtures are
    /// expected to be well formed.
    pub fn run(&self) -> Vec<CaseResult> {
        let pattern = self
            .pattern
            .build()
            .unwrap_or_else(|e| panic!("fixture '{}': {e}", self.name));
        self.cases
            .iter()
            .map(|case| {
                let address = TestAddress::parse(&case.address)
                    .unwrap_or_else(|e| panic!("fixture '{}': {e}", self.name));
                let actual = pattern.matches(&address);
                CaseResult {
                    address: case.address.clone(),
                    passed: actual == case.expect,
                    expected: case.expect,
                    actual,
                }
            })
            .collect()
    }

    /// Run all test cases and panic on first failure
    pub fn run_and_assert(&self) {
        for result in self.run() {
            assert!(
                result.passed,
                "Fixture '{}' address '{}' failed: expected {}, got {}",
                self.name, result.address, result.expected, result.actual
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shorthand() {
        let fixture = Fixture::from_yaml(
            "
name: inline
pattern:
  and:
    - grammar: ip
    - protocol: tcp
cases:
  - address: /ip4/1.2.3.4/tcp/80
    expect: true
  - address: /ip4/1.2.3.4/udp/80
    expect: false
",
        )
        .unwrap();
        assert_eq!(fixture.pattern.build().unwrap(), *grammar::TCP);
        assert!(fixture.run().iter().all(|r| r.passed));
    }

    #[test]
    fn empty_composite_rejected() {
        let spec: PatternSpec = serde_yaml::from_str("or: []").unwrap();
        assert!(matches!(
            spec.build(),
            Err(PatternError::EmptyComposite { op: Op::Or })
        ));
    }
}
