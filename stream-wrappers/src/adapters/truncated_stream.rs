//! Truncated view - caps how far a stream can be read.

use core::time::Duration;

use tokio_util::sync::CancellationToken;

use super::WrappingStreamBase;
use crate::domain::{AsyncStream, Ownership, Result, SeekFrom, Stream, StreamError};

/// A read-only view that ends `max_length` bytes after the point where it
/// was wrapped.
///
/// The wrap point is the wrapped stream's position at construction, its
/// [`origin`](Self::origin). Positions stay in the wrapped stream's
/// coordinates; only the boundary and the visible length are measured from
/// the origin. The visible length is `min(max_length, inner.length() -
/// origin)`, recomputed on every call, so it always equals the number of
/// bytes a read from the origin can return.
///
/// The decorator tracks its own read offset, so the number of bytes left
/// before the boundary stays exact even if the wrapped stream grows or
/// shrinks underneath it.
///
/// # Examples
///
/// ```
/// use stream_wrappers::adapters::{TruncatedStream, ZeroStream};
/// use stream_wrappers::domain::{Ownership, SeekFrom, Stream};
///
/// let mut zero = ZeroStream::with_length(1000);
/// zero.set_position(200).unwrap();
///
/// let mut view = TruncatedStream::new(zero, 500, Ownership::Owns).unwrap();
/// assert_eq!(view.origin(), 200);
/// assert_eq!(view.length().unwrap(), 500);
///
/// view.seek(SeekFrom::End(-20)).unwrap();
/// assert_eq!(view.position().unwrap(), 680);
/// let mut buf = [0u8; 1000];
/// assert_eq!(view.read(&mut buf).unwrap(), 20);
/// assert_eq!(view.read(&mut buf).unwrap(), 0);
/// ```
#[derive(Debug)]
pub struct TruncatedStream<S> {
    base: WrappingStreamBase<S>,
    origin: u64,
    max_length: u64,
    offset: u64,
}

impl<S: Stream> TruncatedStream<S> {
    /// Wrap `stream`, hiding everything from `max_length` bytes past its
    /// current position onwards.
    ///
    /// # Errors
    ///
    /// Fails with [`StreamError::ArgumentOutOfRange`] if `max_length` is not
    /// a valid stream length, or propagates the wrapped stream's error if it
    /// cannot report its position.
    pub fn new(mut stream: S, max_length: u64, ownership: Ownership) -> Result<Self> {
        if max_length > crate::domain::MAX_POSITION {
            return Err(StreamError::ArgumentOutOfRange {
                name: "max_length",
                value: i128::from(max_length),
            });
        }
        let origin = stream.position()?;
        Ok(Self {
            base: WrappingStreamBase::new(stream, ownership),
            origin,
            max_length,
            offset: origin,
        })
    }

    /// The boundary passed at construction.
    pub fn max_length(&self) -> u64 {
        self.max_length
    }

    /// Position of the wrapped stream when the view was created.
    pub fn origin(&self) -> u64 {
        self.origin
    }

    fn boundary(&self) -> u64 {
        self.origin.saturating_add(self.max_length)
    }

    /// The shared decorator state.
    pub fn base(&self) -> &WrappingStreamBase<S> {
        &self.base
    }

    /// Give back the wrapped stream without disposing it.
    pub fn into_inner(self) -> Result<S> {
        self.base.into_inner()
    }

    fn remaining(&self) -> u64 {
        self.boundary().saturating_sub(self.offset)
    }

    fn clamp(&self, requested: usize) -> usize {
        usize::try_from(self.remaining()).map_or(requested, |left| requested.min(left))
    }

    fn reject(&self, operation: &'static str) -> StreamError {
        if self.base.is_disposed() {
            StreamError::Disposed
        } else {
            trace!("truncated stream rejected {}", operation);
            StreamError::NotSupported(operation)
        }
    }
}

impl<S: Stream> Stream for TruncatedStream<S> {
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
        self.base.set_position(position)?;
        self.offset = position;
        Ok(())
    }

    fn length(&mut self) -> Result<u64> {
        let inner = self.base.length()?;
        Ok(self.max_length.min(inner.saturating_sub(self.origin)))
    }

    fn set_length(&mut self, _length: u64) -> Result<()> {
        Err(self.reject("set_length"))
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let pos = match pos {
            SeekFrom::End(offset) => {
                let visible = self.length()?;
                let relative = SeekFrom::End(offset).resolve(0, visible)?;
                SeekFrom::Start(self.origin.saturating_add(relative))
            }
            other => other,
        };
        let result = self.base.seek(pos)?;
        self.offset = result;
        Ok(result)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = self.clamp(buf.len());
        let n = self.base.get_mut()?.read(&mut buf[..count])?;
        self.offset += n as u64;
        Ok(n)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let boundary = self.boundary();
        let inner = self.base.get_mut()?;
        if self.offset >= boundary {
            return Ok(None);
        }
        let byte = inner.read_byte()?;
        if byte.is_some() {
            self.offset += 1;
        }
        Ok(byte)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<()> {
        Err(self.reject("write"))
    }

    fn write_byte(&mut self, _byte: u8) -> Result<()> {
        Err(self.reject("write_byte"))
    }

    fn flush(&mut self) -> Result<()> {
        Err(self.reject("flush"))
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

impl<S: AsyncStream> AsyncStream for TruncatedStream<S> {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        let count = self.clamp(buf.len());
        let n = self.base.get_mut()?.read_async(&mut buf[..count], cancel).await?;
        self.offset += n as u64;
        Ok(n)
    }

    async fn write_async(&mut self, _buf: &[u8], _cancel: &CancellationToken) -> Result<()> {
        Err(self.reject("write_async"))
    }

    async fn flush_async(&mut self, _cancel: &CancellationToken) -> Result<()> {
        Err(self.reject("flush_async"))
    }
}
