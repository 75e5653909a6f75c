//! Evaluation trace types for debugging pattern matches.
//!
//! [`PatternTrace`] mirrors the shape of the [`Pattern`](crate::Pattern) tree
//! but records what each visited node did with the protocols it was handed.
//! [`MatchTrace`] wraps the root with the full-match decision.
//!
//! Unlike a boolean predicate tree, a pattern cannot evaluate AND children
//! past a failure: the next child has no remainder to start from. Traces
//! therefore follow the same short-circuit path as
//! [`Pattern::matches`](crate::Pattern::matches), and nodes that were never
//! reached do not appear.
//!
//! # Example
//!
//! ```
//! use stackmatch::{grammar, ProtocolCode};
//!
//! let trace = grammar::TCP.match_with_trace(&[ProtocolCode::IP4, ProtocolCode::UDP]);
//! assert!(!trace.matched);
//! println!("{trace:#?}");
//! ```

use crate::ProtocolCode;

/// Trace of one pattern node's prefix match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTrace {
    /// A leaf compared against the head protocol.
    Leaf {
        /// The code this leaf accepts.
        code: ProtocolCode,
        /// Whether the head matched.
        matched: bool,
        /// The head protocol it was compared with (`None` on empty input).
        found: Option<ProtocolCode>,
    },
    /// AND: children visited in order until the first failure.
    And {
        /// Whether all children matched.
        matched: bool,
        /// Protocols consumed by the whole conjunction (0 on failure).
        consumed: usize,
        /// Rejected by the length precheck before any child ran.
        length_rejected: bool,
        /// Traces of the children that were reached.
        children: Vec<PatternTrace>,
    },
    /// OR: alternatives visited in order until the first success.
    Or {
        /// Whether any alternative matched.
        matched: bool,
        /// Protocols consumed by the winning alternative (0 on failure).
        consumed: usize,
        /// Traces of the alternatives that were tried.
        children: Vec<PatternTrace>,
    },
}

impl PatternTrace {
    /// Whether this node's prefix match succeeded.
    #[must_use]
    pub fn matched(&self) -> bool {
        match self {
            Self::Leaf { matched, .. } | Self::And { matched, .. } | Self::Or { matched, .. } => {
                *matched
            }
        }
    }

    /// Protocols consumed by this node.
    #[must_use]
    pub fn consumed(&self) -> usize {
        match self {
            Self::Leaf { matched, .. } => usize::from(*matched),
            Self::And { consumed, .. } | Self::Or { consumed, .. } => *consumed,
        }
    }

    /// Traces of the children that were evaluated.
    #[must_use]
    pub fn children(&self) -> &[PatternTrace] {
        match self {
            Self::Leaf { .. } => &[],
            Self::And { children, .. } | Self::Or { children, .. } => children,
        }
    }
}

/// Trace of a full [`Pattern::matches`](crate::Pattern::matches) call.
///
/// # INV: `matched` == `matches()` result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchTrace {
    /// The full-match decision.
    pub matched: bool,
    /// Number of protocols in the address.
    pub layers: usize,
    /// Protocols left after the root's prefix match, `None` if it failed.
    pub remaining: Option<usize>,
    /// Root node trace.
    pub root: PatternTrace,
}
