//! Pass-through decorator.

use core::time::Duration;

use tokio_util::sync::CancellationToken;

use super::WrappingStreamBase;
use crate::domain::{AsyncStream, Ownership, Result, SeekFrom, Stream};

/// A decorator that forwards every operation unchanged.
///
/// Useful on its own to hand out a stream under [`Ownership::None`] so the
/// receiver's `dispose` cannot close it, and as the simplest example of a
/// decorator built on [`WrappingStreamBase`].
///
/// # Examples
///
/// ```
/// use stream_wrappers::adapters::{WrappingStream, ZeroStream};
/// use stream_wrappers::domain::{Ownership, Stream};
///
/// let mut zero = ZeroStream::with_length(4);
/// let mut view = WrappingStream::new(&mut zero, Ownership::None);
/// let mut buf = [1u8; 8];
/// assert_eq!(view.read(&mut buf).unwrap(), 4);
/// view.dispose().unwrap();
/// assert!(!zero.is_disposed());
/// ```
#[derive(Debug)]
pub struct WrappingStream<S> {
    base: WrappingStreamBase<S>,
}

impl<S: Stream> WrappingStream<S> {
    /// Wrap `stream`.
    pub fn new(stream: S, ownership: Ownership) -> Self {
        Self {
            base: WrappingStreamBase::new(stream, ownership),
        }
    }

    /// The shared decorator state.
    pub fn base(&self) -> &WrappingStreamBase<S> {
        &self.base
    }

    /// Give back the wrapped stream without disposing it.
    pub fn into_inner(self) -> Result<S> {
        self.base.into_inner()
    }
}

impl<S: Stream> Stream for WrappingStream<S> {
    fn can_read(&self) -> bool {
        self.base.can_read()
    }

    fn can_write(&self) -> bool {
        self.base.can_write()
    }

    fn can_seek(&self) -> bool {
        self.base.can_seek()
    }

    fn can_timeout(&self) -> bool {
        self.base.can_timeout()
    }

    fn position(&mut self) -> Result<u64> {
        self.base.position()
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        self.base.set_position(position)
    }

    fn length(&mut self) -> Result<u64> {
        self.base.length()
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        self.base.set_length(length)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.base.seek(pos)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.base.get_mut()?.read(buf)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.base.get_mut()?.read_byte()
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.base.get_mut()?.write(buf)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.base.get_mut()?.write_byte(byte)
    }

    fn flush(&mut self) -> Result<()> {
        self.base.flush()
    }

    fn read_timeout(&self) -> Result<Option<Duration>> {
        self.base.read_timeout()
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.base.set_read_timeout(timeout)
    }

    fn write_timeout(&self) -> Result<Option<Duration>> {
        self.base.write_timeout()
    }

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.base.set_write_timeout(timeout)
    }

    fn dispose(&mut self) -> Result<()> {
        self.base.dispose()
    }

    fn is_disposed(&self) -> bool {
        self.base.is_disposed()
    }
}

impl<S: AsyncStream> AsyncStream for WrappingStream<S> {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        self.base.get_mut()?.read_async(buf, cancel).await
    }

    async fn write_async(&mut self, buf: &[u8], cancel: &CancellationToken) -> Result<()> {
        self.base.get_mut()?.write_async(buf, cancel).await
    }

    async fn flush_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.base.get_mut()?.flush_async(cancel).await
    }
}
