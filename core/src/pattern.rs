//! Pattern: grammar trees over protocol stacks
//!
//! A [`Pattern`] is either a single-protocol leaf or an AND/OR composite of
//! child patterns. Every node answers the same prefix question: given the
//! remaining protocols, does a prefix match, and what is left over? The
//! top-level [`Pattern::matches`] closes that into a whole-address decision.

use crate::{
    MatchTrace, PatternError, PatternTrace, ProtocolCode, ProtocolRegistry, ProtocolStack,
    MAX_CHILDREN_PER_COMPOSITE, MAX_DEPTH,
};
use std::fmt;

/// Composite operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Op {
    /// Children match consecutively, in declared order.
    And,
    /// First child that matches wins.
    Or,
}

impl Op {
    /// Delimiter used when rendering children of this operator.
    #[must_use]
    pub const fn delimiter(self) -> char {
        match self {
            Op::And => ',',
            Op::Or => '|',
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Op::And => "and",
            Op::Or => "or",
        })
    }
}

/// AND/OR node with at least one child.
///
/// Fields are private so that the only way to obtain one is through the
/// checked constructors on [`Pattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Composite {
    op: Op,
    children: Vec<Pattern>,
}

impl Composite {
    /// The combining operator.
    #[must_use]
    pub fn op(&self) -> Op {
        self.op
    }

    /// Child patterns in declared order. Never empty.
    #[must_use]
    pub fn children(&self) -> &[Pattern] {
        &self.children
    }

    fn partial_match<'a>(&self, protocols: &'a [ProtocolCode]) -> Option<&'a [ProtocolCode]> {
        match self.op {
            Op::And => {
                // Fast reject. Assumes every child consumes at least one
                // protocol, which holds for leaves and non-empty composites.
                if protocols.len() < self.children.len() {
                    return None;
                }
                // No backtracking: a child's consumption is final.
                self.children
                    .iter()
                    .try_fold(protocols, |rest, child| child.partial_match(rest))
            }
            Op::Or => self
                .children
                .iter()
                .find_map(|child| child.partial_match(protocols)),
        }
    }

    fn trace<'a>(
        &self,
        protocols: &'a [ProtocolCode],
    ) -> (PatternTrace, Option<&'a [ProtocolCode]>) {
        match self.op {
            Op::And => {
                if protocols.len() < self.children.len() {
                    let trace = PatternTrace::And {
                        matched: false,
                        consumed: 0,
                        length_rejected: true,
                        children: Vec::new(),
                    };
                    return (trace, None);
                }
                let mut children = Vec::with_capacity(self.children.len());
                let mut rest = Some(protocols);
                for child in &self.children {
                    let Some(current) = rest else { break };
                    let (child_trace, remainder) = child.trace(current);
                    children.push(child_trace);
                    rest = remainder;
                }
                let trace = PatternTrace::And {
                    matched: rest.is_some(),
                    consumed: rest.map_or(0, |r| protocols.len() - r.len()),
                    length_rejected: false,
                    children,
                };
                (trace, rest)
            }
            Op::Or => {
                let mut children = Vec::new();
                for child in &self.children {
                    let (child_trace, remainder) = child.trace(protocols);
                    children.push(child_trace);
                    if let Some(rest) = remainder {
                        let trace = PatternTrace::Or {
                            matched: true,
                            consumed: protocols.len() - rest.len(),
                            children,
                        };
                        return (trace, Some(rest));
                    }
                }
                let trace = PatternTrace::Or {
                    matched: false,
                    consumed: 0,
                    children,
                };
                (trace, None)
            }
        }
    }
}

/// A node in a protocol-stack grammar.
///
/// # Matching semantics
///
/// - `Leaf(code)` consumes exactly one protocol equal to `code`.
/// - `And` consumes its children's prefixes back to back, in order. Once a
///   child has matched, it is never retried with a different split.
/// - `Or` tries each child from the same position and takes the first hit.
///
/// A bare leaf used as a whole pattern is stricter than the same leaf nested
/// in a composite: [`matches`](Self::matches) requires the address to have
/// exactly one protocol. A nested leaf only inspects the head and leaves the
/// remainder to its parent.
///
/// # Example
///
/// ```
/// use stackmatch::{Pattern, ProtocolCode};
///
/// let tcp = Pattern::and([
///     Pattern::or([Pattern::leaf(ProtocolCode::IP4), Pattern::leaf(ProtocolCode::IP6)]),
///     Pattern::leaf(ProtocolCode::TCP),
/// ]);
///
/// assert!(tcp.matches(&[ProtocolCode::IP6, ProtocolCode::TCP]));
/// assert!(!tcp.matches(&[ProtocolCode::IP4, ProtocolCode::UDP]));
/// assert_eq!(tcp.to_string(), "{ { ip4|ip6 },tcp }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// Accepts exactly one specific protocol.
    Leaf(ProtocolCode),
    /// AND/OR over child patterns.
    Composite(Composite),
}

impl Pattern {
    /// Single-protocol pattern.
    #[must_use]
    pub const fn leaf(code: ProtocolCode) -> Self {
        Pattern::Leaf(code)
    }

    /// Conjunction: children must match consecutively, in order.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty. A childless conjunction is a
    /// construction bug, not a pattern that fails to match.
    #[must_use]
    #[track_caller]
    pub fn and(children: impl IntoIterator<Item = Pattern>) -> Self {
        match Self::composite(Op::And, children) {
            Ok(pattern) => pattern,
            Err(e) => panic!("{e}"),
        }
    }

    /// Disjunction: the first child that matches wins.
    ///
    /// # Panics
    ///
    /// Panics if `children` is empty.
    #[must_use]
    #[track_caller]
    pub fn or(children: impl IntoIterator<Item = Pattern>) -> Self {
        match Self::composite(Op::Or, children) {
            Ok(pattern) => pattern,
            Err(e) => panic!("{e}"),
        }
    }

    /// Fallible composite constructor.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::EmptyComposite`] if `children` is empty.
    pub fn composite(
        op: Op,
        children: impl IntoIterator<Item = Pattern>,
    ) -> Result<Self, PatternError> {
        let children: Vec<Pattern> = children.into_iter().collect();
        if children.is_empty() {
            return Err(PatternError::EmptyComposite { op });
        }
        Ok(Pattern::Composite(Composite { op, children }))
    }

    /// Does this pattern account for the whole address?
    ///
    /// Composites must match a prefix that leaves nothing behind. Bare
    /// leaves require the address to be exactly that one protocol.
    pub fn matches<S: ProtocolStack + ?Sized>(&self, stack: &S) -> bool {
        let protocols = stack.protocols();
        let matched = self.matches_protocols(&protocols);
        tracing::trace!(pattern = %self, layers = protocols.len(), matched, "full match");
        matched
    }

    /// [`matches`](Self::matches) over an already extracted sequence.
    #[must_use]
    pub fn matches_protocols(&self, protocols: &[ProtocolCode]) -> bool {
        match self {
            Pattern::Leaf(code) => matches!(protocols, [only] if only == code),
            Pattern::Composite(_) => self.partial_match(protocols).is_some_and(<[_]>::is_empty),
        }
    }

    /// Prefix match.
    ///
    /// Returns the unconsumed remainder on success, `None` on failure. A
    /// failed match consumes nothing.
    #[must_use]
    pub fn partial_match<'a>(&self, protocols: &'a [ProtocolCode]) -> Option<&'a [ProtocolCode]> {
        match self {
            Pattern::Leaf(code) => match protocols.split_first() {
                Some((head, rest)) if head == code => Some(rest),
                _ => None,
            },
            Pattern::Composite(composite) => composite.partial_match(protocols),
        }
    }

    /// Full match with a record of every node visited.
    ///
    /// And/Or keep their short-circuit behaviour: an AND stops at the first
    /// failing child, an OR at the first matching alternative. The trace's
    /// `matched` always equals [`matches`](Self::matches).
    #[must_use]
    pub fn match_with_trace<S: ProtocolStack + ?Sized>(&self, stack: &S) -> MatchTrace {
        let protocols = stack.protocols();
        let (root, remainder) = self.trace(&protocols);
        let remaining = remainder.map(<[_]>::len);
        let matched = match self {
            Pattern::Leaf(_) => protocols.len() == 1 && root.matched(),
            Pattern::Composite(_) => remaining == Some(0),
        };
        MatchTrace {
            matched,
            layers: protocols.len(),
            remaining,
            root,
        }
    }

    fn trace<'a>(
        &self,
        protocols: &'a [ProtocolCode],
    ) -> (PatternTrace, Option<&'a [ProtocolCode]>) {
        match self {
            Pattern::Leaf(code) => {
                let remainder = self.partial_match(protocols);
                let trace = PatternTrace::Leaf {
                    code: *code,
                    matched: remainder.is_some(),
                    found: protocols.first().copied(),
                };
                (trace, remainder)
            }
            Pattern::Composite(composite) => composite.trace(protocols),
        }
    }

    /// The leaf's code, if this is a leaf.
    #[must_use]
    pub fn code(&self) -> Option<ProtocolCode> {
        match self {
            Pattern::Leaf(code) => Some(*code),
            Pattern::Composite(_) => None,
        }
    }

    /// The composite operator, if this is a composite.
    #[must_use]
    pub fn op(&self) -> Option<Op> {
        match self {
            Pattern::Leaf(_) => None,
            Pattern::Composite(c) => Some(c.op),
        }
    }

    /// Child patterns; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Pattern] {
        match self {
            Pattern::Leaf(_) => &[],
            Pattern::Composite(c) => &c.children,
        }
    }

    /// Returns `true` if this is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Pattern::Leaf(_))
    }

    /// Returns `true` if this is a conjunction.
    #[must_use]
    pub fn is_and(&self) -> bool {
        self.op() == Some(Op::And)
    }

    /// Returns `true` if this is a disjunction.
    #[must_use]
    pub fn is_or(&self) -> bool {
        self.op() == Some(Op::Or)
    }

    /// Depth of the tree; a leaf has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Pattern::Leaf(_) => 1,
            Pattern::Composite(c) => 1 + c.children.iter().map(Pattern::depth).max().unwrap_or(0),
        }
    }

    /// Minimum number of protocols any successful prefix match consumes.
    #[must_use]
    pub fn min_len(&self) -> usize {
        match self {
            Pattern::Leaf(_) => 1,
            Pattern::Composite(c) => match c.op {
                Op::And => c.children.iter().map(Pattern::min_len).sum(),
                Op::Or => c.children.iter().map(Pattern::min_len).min().unwrap_or(0),
            },
        }
    }

    /// Check safety limits for trees built from untrusted config.
    ///
    /// # Errors
    ///
    /// - [`PatternError::DepthExceeded`] if nesting exceeds [`MAX_DEPTH`].
    /// - [`PatternError::TooManyChildren`] if a composite exceeds
    ///   [`MAX_CHILDREN_PER_COMPOSITE`].
    pub fn validate(&self) -> Result<(), PatternError> {
        let depth = self.depth();
        if depth > MAX_DEPTH {
            return Err(PatternError::DepthExceeded {
                depth,
                max: MAX_DEPTH,
            });
        }
        self.check_width()
    }

    fn check_width(&self) -> Result<(), PatternError> {
        let children = self.children();
        if children.len() > MAX_CHILDREN_PER_COMPOSITE {
            return Err(PatternError::TooManyChildren {
                count: children.len(),
                max: MAX_CHILDREN_PER_COMPOSITE,
            });
        }
        children.iter().try_for_each(Pattern::check_width)
    }

    /// Render with names from `registry` instead of the well-known table.
    #[must_use]
    pub fn display_with<'a>(&'a self, registry: &'a ProtocolRegistry) -> PatternDisplay<'a> {
        PatternDisplay {
            pattern: self,
            registry,
        }
    }
}

impl From<ProtocolCode> for Pattern {
    fn from(code: ProtocolCode) -> Self {
        Pattern::Leaf(code)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with(ProtocolRegistry::well_known()), f)
    }
}

/// Renders a [`Pattern`] as `{ a,b }` / `{ a|b }` using a given registry.
///
/// Codes missing from the registry render as their number.
pub struct PatternDisplay<'a> {
    pattern: &'a Pattern,
    registry: &'a ProtocolRegistry,
}

impl fmt::Display for PatternDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pattern {
            Pattern::Leaf(code) => match self.registry.name(*code) {
                Some(name) => f.write_str(name),
                None => write!(f, "{}", code.get()),
            },
            Pattern::Composite(c) => {
                f.write_str("{ ")?;
                for (i, child) in c.children.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", c.op.delimiter())?;
                    }
                    fmt::Display::fmt(&child.display_with(self.registry), f)?;
                }
                f.write_str(" }")
            }
        }
    }
}

// Note: Pattern is Send + Sync automatically; it holds only codes and Vecs.
