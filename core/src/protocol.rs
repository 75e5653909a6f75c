//! Protocol codes and the code <-> name registry.
//!
//! The engine only ever compares [`ProtocolCode`]s. Names exist for rendering
//! patterns and for resolving protocol references in config. The registry
//! shipped here covers the well-known multiaddr codes; callers with private
//! protocols extend it with [`ProtocolRegistry::with`].

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::LazyLock;

/// Opaque numeric identifier of one protocol layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ProtocolCode(pub u32);

impl ProtocolCode {
    /// IPv4 address.
    pub const IP4: Self = Self(4);
    /// TCP port.
    pub const TCP: Self = Self(6);
    /// IPv6 address.
    pub const IP6: Self = Self(41);
    /// DNS name, any address family.
    pub const DNS: Self = Self(53);
    /// DNS name resolving to IPv4.
    pub const DNS4: Self = Self(54);
    /// DNS name resolving to IPv6.
    pub const DNS6: Self = Self(55);
    /// SCTP port.
    pub const SCTP: Self = Self(132);
    /// UDP port.
    pub const UDP: Self = Self(273);
    /// uTP over UDP.
    pub const UTP: Self = Self(302);
    /// Unix domain socket path.
    pub const UNIX: Self = Self(400);
    /// Peer identity layer. Registered under both `p2p` and the legacy `ipfs`.
    pub const P2P: Self = Self(421);
    /// HTTPS.
    pub const HTTPS: Self = Self(443);
    /// Tor onion service.
    pub const ONION: Self = Self(444);
    /// QUIC over UDP.
    pub const QUIC: Self = Self(460);
    /// WebSocket.
    pub const WS: Self = Self(477);
    /// Secure WebSocket.
    pub const WSS: Self = Self(478);
    /// HTTP.
    pub const HTTP: Self = Self(480);

    /// The raw numeric code.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ProtocolCode {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

impl fmt::Display for ProtocolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ProtocolRegistry::well_known().name(*self) {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Registry entry for one protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolInfo {
    /// Numeric code compared by the matcher.
    pub code: ProtocolCode,
    /// Canonical display name.
    pub name: Cow<'static, str>,
    /// Whether the textual form carries a value segment (`/tcp/80`) or not (`/utp`).
    pub takes_value: bool,
    /// Whether the value is a path that runs to the end of the address
    /// (`/unix/tmp/node.sock`). Implies `takes_value`.
    pub takes_path: bool,
}

impl ProtocolInfo {
    /// Create a registry entry.
    pub fn new(code: ProtocolCode, name: impl Into<Cow<'static, str>>, takes_value: bool) -> Self {
        Self {
            code,
            name: name.into(),
            takes_value,
            takes_path: false,
        }
    }

    /// Mark the value as a trailing path.
    #[must_use]
    pub fn with_path(mut self) -> Self {
        self.takes_value = true;
        self.takes_path = true;
        self
    }
}

const WELL_KNOWN: &[(ProtocolCode, &str, bool)] = &[
    (ProtocolCode::IP4, "ip4", true),
    (ProtocolCode::TCP, "tcp", true),
    (ProtocolCode::IP6, "ip6", true),
    (ProtocolCode::DNS, "dns", true),
    (ProtocolCode::DNS4, "dns4", true),
    (ProtocolCode::DNS6, "dns6", true),
    (ProtocolCode::SCTP, "sctp", true),
    (ProtocolCode::UDP, "udp", true),
    (ProtocolCode::UTP, "utp", false),
    (ProtocolCode::P2P, "p2p", true),
    (ProtocolCode::HTTPS, "https", false),
    (ProtocolCode::ONION, "onion", true),
    (ProtocolCode::QUIC, "quic", false),
    (ProtocolCode::WS, "ws", false),
    (ProtocolCode::WSS, "wss", false),
    (ProtocolCode::HTTP, "http", false),
];

static WELL_KNOWN_REGISTRY: LazyLock<ProtocolRegistry> = LazyLock::new(|| {
    WELL_KNOWN
        .iter()
        .fold(ProtocolRegistry::new(), |registry, &(code, name, takes_value)| {
            registry.with(ProtocolInfo::new(code, name, takes_value))
        })
        .with(ProtocolInfo::new(ProtocolCode::UNIX, "unix", true).with_path())
        .alias("ipfs", ProtocolCode::P2P)
});

/// Bidirectional code <-> name lookup.
///
/// Codes map to exactly one [`ProtocolInfo`]; names (including aliases) map
/// to exactly one code. Registering a code twice replaces the earlier entry,
/// and claiming another code's canonical name evicts that code along with
/// its aliases.
#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    by_code: BTreeMap<ProtocolCode, ProtocolInfo>,
    by_name: HashMap<Cow<'static, str>, ProtocolCode>,
}

impl ProtocolRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry of well-known multiaddr protocols.
    #[must_use]
    pub fn well_known() -> &'static ProtocolRegistry {
        &WELL_KNOWN_REGISTRY
    }

    /// Register a protocol (builder pattern).
    #[must_use]
    pub fn with(mut self, info: ProtocolInfo) -> Self {
        if let Some(previous) = self.by_code.remove(&info.code) {
            // Aliases keep pointing at the code; only its old canonical name goes.
            if self.by_name.get(&previous.name) == Some(&previous.code) {
                self.by_name.remove(&previous.name);
            }
        }
        self.claim_name(&info.name, info.code);
        self.by_code.insert(info.code, info);
        self
    }

    /// Register an additional name for an already known code (builder pattern).
    #[must_use]
    pub fn alias(mut self, name: impl Into<Cow<'static, str>>, code: ProtocolCode) -> Self {
        self.claim_name(&name.into(), code);
        self
    }

    fn claim_name(&mut self, name: &Cow<'static, str>, code: ProtocolCode) {
        let displaced = self
            .by_name
            .insert(name.clone(), code)
            .filter(|&owner| owner != code)
            .filter(|owner| self.by_code.get(owner).is_some_and(|info| info.name == *name));
        if let Some(owner) = displaced {
            self.by_code.remove(&owner);
            self.by_name.retain(|_, c| *c != owner);
        }
    }

    /// Look up the registry entry for a code.
    #[must_use]
    pub fn get(&self, code: ProtocolCode) -> Option<&ProtocolInfo> {
        self.by_code.get(&code)
    }

    /// Canonical display name for a code.
    #[must_use]
    pub fn name(&self, code: ProtocolCode) -> Option<&str> {
        self.get(code).map(|info| info.name.as_ref())
    }

    /// Resolve a name or alias to its code.
    #[must_use]
    pub fn code(&self, name: &str) -> Option<ProtocolCode> {
        self.by_name.get(name).copied()
    }

    /// Resolve a name or alias to its registry entry.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ProtocolInfo> {
        self.code(name).and_then(|code| self.get(code))
    }

    /// All entries, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &ProtocolInfo> {
        self.by_code.values()
    }

    /// All registered names and aliases, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().map(ToString::to_string).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Returns `true` if no protocols are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
