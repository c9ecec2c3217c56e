//! Shared state and forwarding logic for stream decorators.

use core::time::Duration;

use crate::domain::{Ownership, Result, SeekFrom, Slot, Stream};

/// The wrapped stream plus the ownership mode that decides whether it is
/// disposed together with the decorator.
///
/// Every decorator in this crate embeds one of these. It forwards the
/// capability queries and the cursor/length operations unchanged; reading
/// and writing are left to the decorator, which is where they differ.
///
/// After [`dispose`](Self::dispose) the wrapped stream is gone: capability
/// queries return `false` and every other operation fails with
/// [`StreamError::Disposed`](crate::domain::StreamError::Disposed).
///
/// Outside this crate the wrapped stream is reachable only through
/// [`get_ref`](Self::get_ref), so it cannot be moved behind a decorator's
/// back:
///
/// ```compile_fail
/// use stream_wrappers::{Ownership, Stream, WrappingStreamBase, ZeroStream};
///
/// let mut base = WrappingStreamBase::new(ZeroStream::with_length(10), Ownership::None);
/// base.get_mut().unwrap().set_position(5).unwrap();
/// ```
#[derive(Debug)]
pub struct WrappingStreamBase<S> {
    inner: Slot<S>,
    ownership: Ownership,
}

impl<S: Stream> WrappingStreamBase<S> {
    /// Wrap `stream` with the given ownership.
    pub fn new(stream: S, ownership: Ownership) -> Self {
        Self {
            inner: Slot::Open(stream),
            ownership,
        }
    }

    /// Ownership mode fixed at construction.
    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    /// Shared access to the wrapped stream.
    pub fn get_ref(&self) -> Result<&S> {
        self.inner.get()
    }

    /// Exclusive access to the wrapped stream.
    pub(crate) fn get_mut(&mut self) -> Result<&mut S> {
        self.inner.get_mut()
    }

    /// Give back the wrapped stream without disposing it.
    pub fn into_inner(self) -> Result<S> {
        self.inner.into_inner()
    }

    /// Whether the wrapper has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Forwarded `can_read`; `false` once disposed.
    pub fn can_read(&self) -> bool {
        self.inner.get().is_ok_and(|s| s.can_read())
    }

    /// Forwarded `can_write`; `false` once disposed.
    pub fn can_write(&self) -> bool {
        self.inner.get().is_ok_and(|s| s.can_write())
    }

    /// Forwarded `can_seek`; `false` once disposed.
    pub fn can_seek(&self) -> bool {
        self.inner.get().is_ok_and(|s| s.can_seek())
    }

    /// Forwarded `can_timeout`; `false` once disposed.
    pub fn can_timeout(&self) -> bool {
        self.inner.get().is_ok_and(|s| s.can_timeout())
    }

    /// Forwarded `position`.
    pub fn position(&mut self) -> Result<u64> {
        self.inner.get_mut()?.position()
    }

    /// Forwarded `set_position`.
    pub fn set_position(&mut self, position: u64) -> Result<()> {
        self.inner.get_mut()?.set_position(position)
    }

    /// Forwarded `length`.
    pub fn length(&mut self) -> Result<u64> {
        self.inner.get_mut()?.length()
    }

    /// Forwarded `set_length`.
    pub fn set_length(&mut self, length: u64) -> Result<()> {
        self.inner.get_mut()?.set_length(length)
    }

    /// Forwarded `seek`.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.inner.get_mut()?.seek(pos)
    }

    /// Forwarded `flush`.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.get_mut()?.flush()
    }

    /// Forwarded `read_timeout`.
    pub fn read_timeout(&self) -> Result<Option<Duration>> {
        self.inner.get()?.read_timeout()
    }

    /// Forwarded `set_read_timeout`.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.inner.get_mut()?.set_read_timeout(timeout)
    }

    /// Forwarded `write_timeout`.
    pub fn write_timeout(&self) -> Result<Option<Duration>> {
        self.inner.get()?.write_timeout()
    }

    /// Forwarded `set_write_timeout`.
    pub fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.inner.get_mut()?.set_write_timeout(timeout)
    }

    /// Release the wrapper.
    ///
    /// The wrapped stream is disposed only under [`Ownership::Owns`]; with
    /// [`Ownership::None`] it is simply dropped from this wrapper and stays
    /// usable through whatever else refers to it. Calling this again does
    /// nothing.
    pub fn dispose(&mut self) -> Result<()> {
        match core::mem::replace(&mut self.inner, Slot::Disposed) {
            Slot::Disposed => Ok(()),
            Slot::Open(mut stream) => {
                if self.ownership.owns() {
                    debug!("disposing owned inner stream");
                    stream
                        .dispose()
                        .inspect_err(|e| warn!("inner stream failed to dispose: {}", e))
                } else {
                    trace!("releasing borrowed inner stream");
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ZeroStream;
    use crate::domain::StreamError;

    #[test]
    fn test_forwards_capabilities() {
        let base = WrappingStreamBase::new(ZeroStream::with_length(10), Ownership::None);
        assert!(base.can_read());
        assert!(base.can_write());
        assert!(base.can_seek());
        assert!(!base.can_timeout());
    }

    #[test]
    fn test_forwards_cursor_operations() {
        let mut base = WrappingStreamBase::new(ZeroStream::with_length(10), Ownership::None);
        assert_eq!(base.seek(SeekFrom::End(-2)).unwrap(), 8);
        assert_eq!(base.position().unwrap(), 8);
        base.set_length(20).unwrap();
        assert_eq!(base.length().unwrap(), 20);
    }

    #[test]
    fn test_dispose_owned_disposes_inner() {
        let mut zero = ZeroStream::new();
        {
            let mut base = WrappingStreamBase::new(&mut zero, Ownership::Owns);
            base.dispose().unwrap();
        }
        assert!(zero.is_disposed());
    }

    #[test]
    fn test_dispose_borrowed_leaves_inner() {
        let mut zero = ZeroStream::new();
        {
            let mut base = WrappingStreamBase::new(&mut zero, Ownership::None);
            base.dispose().unwrap();
            assert!(base.is_disposed());
        }
        assert!(!zero.is_disposed());
    }

    #[test]
    fn test_after_dispose() {
        let mut base = WrappingStreamBase::new(ZeroStream::new(), Ownership::Owns);
        base.dispose().unwrap();
        base.dispose().unwrap();

        assert!(!base.can_read());
        assert!(!base.can_seek());
        assert!(matches!(base.position(), Err(StreamError::Disposed)));
        assert!(matches!(base.flush(), Err(StreamError::Disposed)));
        assert!(base.into_inner().is_err());
    }
}
