//! Named grammars for common multiaddr shapes.
//!
//! Each constant is built once, on first use, from the same combinators
//! callers use. They add no engine behaviour.
//!
//! | Name | Shape |
//! |------|-------|
//! | [`IP`] | `ip4` or `ip6` |
//! | [`TCP`] | IP, then `tcp` |
//! | [`UDP`] | IP, then `udp` |
//! | [`UTP`] | UDP, then `utp` |
//! | [`RELIABLE`] | TCP or UTP |
//! | [`IPFS`] | RELIABLE, then `p2p` |

use crate::{Pattern, ProtocolCode};
use std::sync::LazyLock;

/// `ip4` or `ip6`.
pub static IP: LazyLock<Pattern> = LazyLock::new(|| {
    Pattern::or([
        Pattern::leaf(ProtocolCode::IP4),
        Pattern::leaf(ProtocolCode::IP6),
    ])
});

/// IP followed by `tcp`.
pub static TCP: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::and([IP.clone(), Pattern::leaf(ProtocolCode::TCP)]));

/// IP followed by `udp`.
pub static UDP: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::and([IP.clone(), Pattern::leaf(ProtocolCode::UDP)]));

/// UDP followed by `utp`.
pub static UTP: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::and([UDP.clone(), Pattern::leaf(ProtocolCode::UTP)]));

/// A reliable transport: TCP or uTP over UDP.
pub static RELIABLE: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::or([TCP.clone(), UTP.clone()]));

/// A reliable transport followed by a peer identity.
pub static IPFS: LazyLock<Pattern> =
    LazyLock::new(|| Pattern::and([RELIABLE.clone(), Pattern::leaf(ProtocolCode::P2P)]));

/// Names accepted by [`by_name`], in dependency order.
pub const NAMES: &[&str] = &["ip", "tcp", "udp", "utp", "reliable", "ipfs"];

/// Look up a named grammar (case-insensitive).
///
/// ```
/// use stackmatch::{grammar, ProtocolCode};
///
/// let reliable = grammar::by_name("Reliable").unwrap();
/// assert!(reliable.matches(&[ProtocolCode::IP4, ProtocolCode::UDP, ProtocolCode::UTP]));
/// ```
#[must_use]
pub fn by_name(name: &str) -> Option<&'static Pattern> {
    let pattern: &'static LazyLock<Pattern> = match name.to_ascii_lowercase().as_str() {
        "ip" => &IP,
        "tcp" => &TCP,
        "udp" => &UDP,
        "utp" => &UTP,
        "reliable" => &RELIABLE,
        "ipfs" => &IPFS,
        _ => return None,
    };
    Some(LazyLock::force(pattern))
}
