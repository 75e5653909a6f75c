//! stackmatch - Grammar matching for layered network addresses
//!
//! Decides whether an address's protocol stack (e.g. `ip4/udp/utp`) has one
//! of the shapes a caller accepts.
//!
//! # Architecture
//!
//! - [`ProtocolCode`]: Opaque protocol identifier (`ip4`, `tcp`, ...)
//! - [`ProtocolStack`]: Address-side extraction: ordered protocol codes
//! - [`Pattern`]: Grammar tree: `Leaf(code)` or AND/OR [`Composite`]
//! - [`grammar`]: Named trees (`IP`, `TCP`, `RELIABLE`, ...)
//! - [`ProtocolRegistry`]: Code <-> name lookup for rendering and config
//!
//! # Key Design Insights
//!
//! 1. **One contract, threaded remainder**: every node implements a prefix
//!    match that returns the unconsumed tail. AND threads it through its
//!    children, OR restarts each alternative from the same position.
//!
//! 2. **No backtracking**: once an AND child has matched, its consumption is
//!    final. Grammars over protocol layers are unambiguous by position, so
//!    greedy matching is enough.
//!
//! 3. **Bare leaves are strict**: a leaf used as a whole pattern matches only
//!    single-protocol addresses; nested leaves only inspect the head.
//!
//! # Example
//!
//! ```
//! use stackmatch::prelude::*;
//!
//! let tcp = Pattern::and([
//!     Pattern::or([Pattern::leaf(ProtocolCode::IP4), Pattern::leaf(ProtocolCode::IP6)]),
//!     Pattern::leaf(ProtocolCode::TCP),
//! ]);
//!
//! assert!(tcp.matches(&[ProtocolCode::IP4, ProtocolCode::TCP]));
//! assert!(!tcp.matches(&[ProtocolCode::IP4, ProtocolCode::UDP, ProtocolCode::UTP]));
//! assert!(grammar::RELIABLE.matches(&[ProtocolCode::IP4, ProtocolCode::UDP, ProtocolCode::UTP]));
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

pub mod grammar;
mod pattern;
mod protocol;
mod protocol_stack;
mod trace;

#[cfg(feature = "config")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use pattern::{Composite, Op, Pattern, PatternDisplay};
pub use protocol::{ProtocolCode, ProtocolInfo, ProtocolRegistry};
pub use protocol_stack::ProtocolStack;
pub use trace::{MatchTrace, PatternTrace};

#[cfg(feature = "config")]
pub use config::PatternConfig;

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use stackmatch::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        grammar, MatchTrace, Op, Pattern, PatternError, PatternTrace, ProtocolCode,
        ProtocolInfo, ProtocolRegistry, ProtocolStack,
    };

    #[cfg(feature = "config")]
    pub use crate::PatternConfig;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed depth for pattern trees loaded from config.
///
/// Matching recurses once per level; validate untrusted trees with
/// [`Pattern::validate`].
pub const MAX_DEPTH: usize = 32;

/// Maximum number of children in a single `And` or `Or` composite.
pub const MAX_CHILDREN_PER_COMPOSITE: usize = 256;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from pattern construction, validation and config loading.
///
/// Matching itself never fails; these are all caught before a pattern is used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    /// An `and`/`or` composite was given no children.
    #[error("{op} pattern requires at least one child")]
    EmptyComposite {
        /// The composite's operator.
        op: Op,
    },

    /// A protocol name is not in the registry.
    #[error("unknown protocol \"{name}\"; registered: {}", .available.join(", "))]
    UnknownProtocol {
        /// The unresolved name.
        name: String,
        /// Names the registry does know.
        available: Vec<String>,
    },

    /// A grammar name is not one of [`grammar::NAMES`].
    #[error("unknown grammar \"{name}\"; available: {}", .available.join(", "))]
    UnknownGrammar {
        /// The unresolved name.
        name: String,
        /// Known grammar names.
        available: Vec<String>,
    },

    /// Pattern nesting exceeds [`MAX_DEPTH`].
    #[error("pattern nesting depth is {depth}, but maximum allowed is {max}")]
    DepthExceeded {
        /// Actual depth of the pattern tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },

    /// A composite exceeds [`MAX_CHILDREN_PER_COMPOSITE`].
    #[error("composite has {count} children, but maximum allowed is {max}")]
    TooManyChildren {
        /// Actual number of children.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Configuration deserialization failed.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// The underlying error message.
        message: String,
    },
}
