//! Config types for data-driven pattern construction.
//!
//! [`PatternConfig`] is the serde-deserializable mirror of
//! [`Pattern`](crate::Pattern). Protocols are referenced by name and resolved
//! against a [`ProtocolRegistry`] at load time; named grammars can be embedded
//! by reference.
//!
//! ```json
//! { "type": "and", "patterns": [
//!     { "type": "grammar", "name": "ip" },
//!     { "type": "protocol", "name": "tcp" }
//! ] }
//! ```
//!
//! | Config variant | Runtime node |
//! |----------------|--------------|
//! | `protocol` / `code` | `Pattern::Leaf` |
//! | `grammar` | a clone of [`grammar::by_name`](crate::grammar::by_name) |
//! | `and` / `or` | `Pattern::Composite` |

use crate::{grammar, Op, Pattern, PatternError, ProtocolCode, ProtocolRegistry, MAX_DEPTH};
use serde::Deserialize;

/// Configuration for a [`Pattern`](crate::Pattern).
///
/// Uses `#[serde(tag = "type")]` for discriminated union deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternConfig {
    /// A leaf referenced by registered protocol name (`"tcp"`, `"ipfs"`).
    Protocol {
        /// Protocol name or alias.
        name: String,
    },

    /// A leaf referenced by raw numeric code, registered or not.
    Code {
        /// The protocol code.
        code: u32,
    },

    /// A named grammar from [`grammar`](crate::grammar).
    Grammar {
        /// One of [`grammar::NAMES`](crate::grammar::NAMES).
        name: String,
    },

    /// Children must match consecutively.
    And {
        /// Child patterns, at least one.
        patterns: Vec<PatternConfig>,
    },

    /// First matching child wins.
    Or {
        /// Child patterns, at least one.
        patterns: Vec<PatternConfig>,
    },
}

impl PatternConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::InvalidConfig`] on malformed JSON or an
    /// unknown `type` tag.
    pub fn from_json(json: &str) -> Result<Self, PatternError> {
        serde_json::from_str(json).map_err(|e| PatternError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Build a runtime [`Pattern`](crate::Pattern), resolving protocol names
    /// against `registry`.
    ///
    /// # Errors
    ///
    /// - [`PatternError::UnknownProtocol`] for an unregistered protocol name.
    /// - [`PatternError::UnknownGrammar`] for an unknown grammar name.
    /// - [`PatternError::EmptyComposite`] for `and`/`or` with no children.
    /// - [`PatternError::DepthExceeded`] / [`PatternError::TooManyChildren`]
    ///   if the tree exceeds safety limits.
    pub fn load(&self, registry: &ProtocolRegistry) -> Result<Pattern, PatternError> {
        let pattern = self.build(registry, 1)?;
        pattern.validate()?;
        tracing::debug!(
            pattern = %pattern.display_with(registry),
            depth = pattern.depth(),
            "loaded pattern config"
        );
        Ok(pattern)
    }

    fn build(&self, registry: &ProtocolRegistry, depth: usize) -> Result<Pattern, PatternError> {
        // Checked while descending so hostile configs cannot blow the stack.
        if depth > MAX_DEPTH {
            return Err(PatternError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        match self {
            Self::Protocol { name } => registry.code(name).map(Pattern::leaf).ok_or_else(|| {
                PatternError::UnknownProtocol {
                    name: name.clone(),
                    available: registry.names(),
                }
            }),
            Self::Code { code } => Ok(Pattern::leaf(ProtocolCode(*code))),
            Self::Grammar { name } => {
                grammar::by_name(name)
                    .cloned()
                    .ok_or_else(|| PatternError::UnknownGrammar {
                        name: name.clone(),
                        available: grammar::NAMES.iter().map(ToString::to_string).collect(),
                    })
            }
            Self::And { patterns } => Self::build_composite(Op::And, patterns, registry, depth),
            Self::Or { patterns } => Self::build_composite(Op::Or, patterns, registry, depth),
        }
    }

    fn build_composite(
        op: Op,
        patterns: &[PatternConfig],
        registry: &ProtocolRegistry,
        depth: usize,
    ) -> Result<Pattern, PatternError> {
        let children = patterns
            .iter()
            .map(|p| p.build(registry, depth + 1))
            .collect::<Result<Vec<_>, _>>()?;
        Pattern::composite(op, children)
    }
}
