//! Lifecycle slot for a disposable resource.

use crate::domain::error::{Result, StreamError};

/// Holds a resource until it is disposed.
///
/// Once the slot is `Disposed` the resource is gone for good and every
/// accessor fails with [`StreamError::Disposed`].
#[derive(Debug)]
pub enum Slot<T> {
    /// The resource is live.
    Open(T),
    /// The resource has been released.
    Disposed,
}

impl<T> Slot<T> {
    /// Check if the resource has been released.
    #[inline]
    pub const fn is_disposed(&self) -> bool {
        matches!(self, Slot::Disposed)
    }

    /// Borrow the live resource.
    #[inline]
    pub fn get(&self) -> Result<&T> {
        match self {
            Slot::Open(value) => Ok(value),
            Slot::Disposed => Err(StreamError::Disposed),
        }
    }

    /// Mutably borrow the live resource.
    #[inline]
    pub fn get_mut(&mut self) -> Result<&mut T> {
        match self {
            Slot::Open(value) => Ok(value),
            Slot::Disposed => Err(StreamError::Disposed),
        }
    }

    /// Move the resource out, leaving the slot disposed.
    ///
    /// Returns `None` if the slot was already disposed.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        match core::mem::replace(self, Slot::Disposed) {
            Slot::Open(value) => Some(value),
            Slot::Disposed => None,
        }
    }

    /// Consume the slot, returning the live resource.
    #[inline]
    pub fn into_inner(self) -> Result<T> {
        match self {
            Slot::Open(value) => Ok(value),
            Slot::Disposed => Err(StreamError::Disposed),
        }
    }
}
