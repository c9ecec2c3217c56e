//! Read-only view of a borrowed stream.

use core::time::Duration;

use tokio_util::sync::CancellationToken;

use super::WrappingStreamBase;
use crate::domain::{AsyncStream, Ownership, Result, SeekFrom, Stream, StreamError};

/// Forwards reads and rejects every write.
///
/// A `ReadOnlyStream` never owns what it wraps: disposing it leaves the
/// wrapped stream open. Pass `&mut stream` to keep using the stream after
/// the view is gone.
#[derive(Debug)]
pub struct ReadOnlyStream<S> {
    base: WrappingStreamBase<S>,
}

impl<S: Stream> ReadOnlyStream<S> {
    /// Wrap `stream` under [`Ownership::None`].
    pub fn new(stream: S) -> Self {
        Self {
            base: WrappingStreamBase::new(stream, Ownership::None),
        }
    }

    /// The shared decorator state.
    pub fn base(&self) -> &WrappingStreamBase<S> {
        &self.base
    }

    /// Give back the wrapped stream.
    pub fn into_inner(self) -> Result<S> {
        self.base.into_inner()
    }

    fn reject(&self, operation: &'static str) -> StreamError {
        if self.base.is_disposed() {
            StreamError::Disposed
        } else {
            trace!("read-only stream rejected {}", operation);
            StreamError::NotSupported(operation)
        }
    }
}

impl<S: Stream> Stream for ReadOnlyStream<S> {
    fn can_read(&self) -> bool {
        self.base.can_read()
    }

    fn can_write(&self) -> bool {
        false
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

    fn set_length(&mut self, _length: u64) -> Result<()> {
        Err(self.reject("set_length"))
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

    fn write(&mut self, _buf: &[u8]) -> Result<()> {
        Err(self.reject("write"))
    }

    fn write_byte(&mut self, _byte: u8) -> Result<()> {
        Err(self.reject("write_byte"))
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

impl<S: AsyncStream> AsyncStream for ReadOnlyStream<S> {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        self.base.get_mut()?.read_async(buf, cancel).await
    }

    async fn write_async(&mut self, _buf: &[u8], _cancel: &CancellationToken) -> Result<()> {
        Err(self.reject("write_async"))
    }

    async fn flush_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.base.get_mut()?.flush_async(cancel).await
    }
}
