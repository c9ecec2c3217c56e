//! Ownership of a wrapped stream.

use core::fmt;

/// Whether a decorator owns the stream it wraps.
///
/// - `Owns`: disposing the decorator disposes the wrapped stream.
/// - `None`: the wrapped stream is borrowed; whoever created it disposes it.
///
/// Rust ownership and this flag are independent. A decorator may hold a
/// `&mut S` and still be told it `Owns` the stream (disposal then cascades
/// through the reference), or hold an `S` by value with `None` (the value is
/// dropped with the decorator but never disposed by it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The wrapped stream is not owned.
    None,
    /// The wrapped stream is owned and disposed along with its wrapper.
    Owns,
}

impl Ownership {
    /// Check if the wrapper owns the wrapped stream.
    #[inline]
    pub const fn owns(self) -> bool {
        matches!(self, Ownership::Owns)
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::None => write!(f, "None"),
            Ownership::Owns => write!(f, "Owns"),
        }
    }
}
