//! `ProtocolStack`: address-side protocol extraction
//!
//! The engine never decodes addresses itself. Anything that can hand out its
//! layers as an ordered list of [`ProtocolCode`]s (a decoded multiaddr, a
//! parsed test address, a plain slice) implements [`ProtocolStack`] and can be
//! matched against a [`Pattern`](crate::Pattern).

use crate::ProtocolCode;
use std::borrow::Cow;

/// Exposes an address as its ordered sequence of protocol codes.
///
/// Order is outermost layer first, exactly as the address codec yields it.
/// The returned sequence is treated as an immutable snapshot for the duration
/// of one match call.
///
/// # Example
///
/// ```
/// use std::borrow::Cow;
/// use stackmatch::{ProtocolCode, ProtocolStack};
///
/// struct TcpSocket;
///
/// impl ProtocolStack for TcpSocket {
///     fn protocols(&self) -> Cow<'_, [ProtocolCode]> {
///         Cow::Borrowed(&[ProtocolCode::IP4, ProtocolCode::TCP])
///     }
/// }
///
/// assert_eq!(TcpSocket.protocols().len(), 2);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `ProtocolStack`",
    label = "this type cannot be matched against a pattern",
    note = "implement ProtocolStack to expose the address's protocol codes in layer order"
)]
pub trait ProtocolStack {
    /// The address's protocol codes, outermost first.
    fn protocols(&self) -> Cow<'_, [ProtocolCode]>;
}

impl ProtocolStack for [ProtocolCode] {
    fn protocols(&self) -> Cow<'_, [ProtocolCode]> {
        Cow::Borrowed(self)
    }
}

impl<const N: usize> ProtocolStack for [ProtocolCode; N] {
    fn protocols(&self) -> Cow<'_, [ProtocolCode]> {
        Cow::Borrowed(self)
    }
}

impl ProtocolStack for Vec<ProtocolCode> {
    fn protocols(&self) -> Cow<'_, [ProtocolCode]> {
        Cow::Borrowed(self)
    }
}

#[diagnostic::do_not_recommend]
impl<T: ProtocolStack + ?Sized> ProtocolStack for &T {
    fn protocols(&self) -> Cow<'_, [ProtocolCode]> {
        (**self).protocols()
    }
}

#[diagnostic::do_not_recommend]
impl<T: ProtocolStack + ?Sized> ProtocolStack for Box<T> {
    fn protocols(&self) -> Cow<'_, [ProtocolCode]> {
        (**self).protocols()
    }
}
