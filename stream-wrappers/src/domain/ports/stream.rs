//! Stream port - the byte-stream contract every stream in the crate both
//! implements and consumes.
//!
//! Decorators are written against these traits only. Anything that can
//! read, write, seek and report a position and length can sit at the bottom
//! of a stack of decorators.

use core::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::domain::error::{Result, StreamError};

/// Largest position a stream may reach.
pub const MAX_POSITION: u64 = i64::MAX as u64;

/// Seek origin and offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
    /// Offset from the start of the stream.
    Start(u64),
    /// Offset relative to the current position.
    Current(i64),
    /// Offset from the end of the stream.
    End(i64),
}

impl SeekFrom {
    /// Resolve this seek against a current position and a length.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::InvalidSeek`] if the target would be negative
    /// or past [`MAX_POSITION`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stream_wrappers::domain::SeekFrom;
    ///
    /// assert_eq!(SeekFrom::Current(-5).resolve(10, 100).unwrap(), 5);
    /// assert_eq!(SeekFrom::End(-1).resolve(10, 100).unwrap(), 99);
    /// assert!(SeekFrom::Current(-11).resolve(10, 100).is_err());
    /// ```
    pub fn resolve(self, position: u64, length: u64) -> Result<u64> {
        let target = match self {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => i128::from(position) + i128::from(offset),
            SeekFrom::End(offset) => i128::from(length) + i128::from(offset),
        };
        checked_position(target)
    }
}

/// Convert a computed target into a valid position.
pub(crate) fn checked_position(target: i128) -> Result<u64> {
    if target < 0 || target > i128::from(MAX_POSITION) {
        Err(StreamError::InvalidSeek { target })
    } else {
        Ok(target as u64)
    }
}

impl From<embedded_io::SeekFrom> for SeekFrom {
    fn from(from: embedded_io::SeekFrom) -> Self {
        match from {
            embedded_io::SeekFrom::Start(n) => SeekFrom::Start(n),
            embedded_io::SeekFrom::End(n) => SeekFrom::End(n),
            embedded_io::SeekFrom::Current(n) => SeekFrom::Current(n),
        }
    }
}

impl From<SeekFrom> for embedded_io::SeekFrom {
    fn from(from: SeekFrom) -> Self {
        match from {
            SeekFrom::Start(n) => embedded_io::SeekFrom::Start(n),
            SeekFrom::End(n) => embedded_io::SeekFrom::End(n),
            SeekFrom::Current(n) => embedded_io::SeekFrom::Current(n),
        }
    }
}

impl From<std::io::SeekFrom> for SeekFrom {
    fn from(from: std::io::SeekFrom) -> Self {
        match from {
            std::io::SeekFrom::Start(n) => SeekFrom::Start(n),
            std::io::SeekFrom::End(n) => SeekFrom::End(n),
            std::io::SeekFrom::Current(n) => SeekFrom::Current(n),
        }
    }
}

impl From<SeekFrom> for std::io::SeekFrom {
    fn from(from: SeekFrom) -> Self {
        match from {
            SeekFrom::Start(n) => std::io::SeekFrom::Start(n),
            SeekFrom::End(n) => std::io::SeekFrom::End(n),
            SeekFrom::Current(n) => std::io::SeekFrom::Current(n),
        }
    }
}

/// A byte stream with a cursor, a length and explicit disposal.
///
/// # Contract
///
/// - `read` returns the number of bytes actually read; 0 only at end of
///   stream (or for an empty buffer). A short count is not end of stream.
/// - `write` writes the whole buffer or fails.
/// - `seek` returns the new position measured from the start of the stream.
/// - Capability queries report `false` once the stream is disposed; every
///   other operation fails with [`StreamError::Disposed`].
/// - `dispose` is idempotent.
///
/// Instances are not synchronized. Use one from one task at a time.
pub trait Stream {
    /// Whether the stream supports reading.
    fn can_read(&self) -> bool;

    /// Whether the stream supports writing.
    fn can_write(&self) -> bool;

    /// Whether the stream supports seeking.
    fn can_seek(&self) -> bool;

    /// Whether the stream supports read and write timeouts.
    fn can_timeout(&self) -> bool {
        false
    }

    /// Current position of the cursor.
    fn position(&mut self) -> Result<u64>;

    /// Move the cursor to an absolute position.
    fn set_position(&mut self, position: u64) -> Result<()>;

    /// Length of the stream in bytes.
    fn length(&mut self) -> Result<u64>;

    /// Set the length of the stream.
    fn set_length(&mut self, length: u64) -> Result<()>;

    /// Move the cursor, returning the new absolute position.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Read up to `buf.len()` bytes.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Read a single byte; `None` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Write the whole buffer.
    fn write(&mut self, buf: &[u8]) -> Result<()>;

    /// Write a single byte.
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write(&[byte])
    }

    /// Flush buffered writes to the underlying medium.
    fn flush(&mut self) -> Result<()>;

    /// Read timeout, if the stream supports timeouts.
    fn read_timeout(&self) -> Result<Option<Duration>> {
        Err(StreamError::NotSupported("read_timeout"))
    }

    /// Set the read timeout.
    fn set_read_timeout(&mut self, _timeout: Option<Duration>) -> Result<()> {
        Err(StreamError::NotSupported("set_read_timeout"))
    }

    /// Write timeout, if the stream supports timeouts.
    fn write_timeout(&self) -> Result<Option<Duration>> {
        Err(StreamError::NotSupported("write_timeout"))
    }

    /// Set the write timeout.
    fn set_write_timeout(&mut self, _timeout: Option<Duration>) -> Result<()> {
        Err(StreamError::NotSupported("set_write_timeout"))
    }

    /// Release the stream. Calling this more than once is a no-op.
    fn dispose(&mut self) -> Result<()>;

    /// Whether `dispose` has been called.
    fn is_disposed(&self) -> bool;
}

/// Asynchronous read, write and flush.
///
/// The default bodies are those of a stream without native asynchronous
/// I/O: they honor the cancellation token and then run the blocking
/// operation. Decorators override them to forward to the stream they wrap.
///
/// A token that is already cancelled fails the call with
/// [`StreamError::Cancelled`] before any I/O happens.
pub trait AsyncStream: Stream {
    /// Asynchronous counterpart of [`Stream::read`].
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        ensure_not_cancelled(cancel)?;
        self.read(buf)
    }

    /// Asynchronous counterpart of [`Stream::write`].
    async fn write_async(&mut self, buf: &[u8], cancel: &CancellationToken) -> Result<()> {
        ensure_not_cancelled(cancel)?;
        self.write(buf)
    }

    /// Asynchronous counterpart of [`Stream::flush`].
    async fn flush_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        ensure_not_cancelled(cancel)?;
        self.flush()
    }
}

/// Fail with [`StreamError::Cancelled`] if the token has been cancelled.
#[inline]
pub fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(StreamError::Cancelled)
    } else {
        Ok(())
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }

    fn can_write(&self) -> bool {
        (**self).can_write()
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn can_timeout(&self) -> bool {
        (**self).can_timeout()
    }

    fn position(&mut self) -> Result<u64> {
        (**self).position()
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        (**self).set_position(position)
    }

    fn length(&mut self) -> Result<u64> {
        (**self).length()
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        (**self).set_length(length)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek(pos)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn read_timeout(&self) -> Result<Option<Duration>> {
        (**self).read_timeout()
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_read_timeout(timeout)
    }

    fn write_timeout(&self) -> Result<Option<Duration>> {
        (**self).write_timeout()
    }

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_write_timeout(timeout)
    }

    fn dispose(&mut self) -> Result<()> {
        (**self).dispose()
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }

    fn can_write(&self) -> bool {
        (**self).can_write()
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn can_timeout(&self) -> bool {
        (**self).can_timeout()
    }

    fn position(&mut self) -> Result<u64> {
        (**self).position()
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        (**self).set_position(position)
    }

    fn length(&mut self) -> Result<u64> {
        (**self).length()
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        (**self).set_length(length)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek(pos)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        (**self).write(buf)
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn read_timeout(&self) -> Result<Option<Duration>> {
        (**self).read_timeout()
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_read_timeout(timeout)
    }

    fn write_timeout(&self) -> Result<Option<Duration>> {
        (**self).write_timeout()
    }

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        (**self).set_write_timeout(timeout)
    }

    fn dispose(&mut self) -> Result<()> {
        (**self).dispose()
    }

    fn is_disposed(&self) -> bool {
        (**self).is_disposed()
    }
}

impl<S: AsyncStream + ?Sized> AsyncStream for &mut S {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        (**self).read_async(buf, cancel).await
    }

    async fn write_async(&mut self, buf: &[u8], cancel: &CancellationToken) -> Result<()> {
        (**self).write_async(buf, cancel).await
    }

    async fn flush_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        (**self).flush_async(cancel).await
    }
}

impl<S: AsyncStream> AsyncStream for Box<S> {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        (**self).read_async(buf, cancel).await
    }

    async fn write_async(&mut self, buf: &[u8], cancel: &CancellationToken) -> Result<()> {
        (**self).write_async(buf, cancel).await
    }

    async fn flush_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        (**self).flush_async(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_start() {
        assert_eq!(SeekFrom::Start(42).resolve(0, 10).unwrap(), 42);
    }

    #[test]
    fn test_resolve_rejects_negative() {
        let err = SeekFrom::End(-11).resolve(0, 10).unwrap_err();
        assert!(matches!(err, StreamError::InvalidSeek { target: -1 }));
    }

    #[test]
    fn test_resolve_rejects_overflow() {
        let err = SeekFrom::Current(1).resolve(MAX_POSITION, 0).unwrap_err();
        assert!(matches!(err, StreamError::InvalidSeek { .. }));
    }

    #[test]
    fn test_seek_from_conversions() {
        let ours: SeekFrom = std::io::SeekFrom::Current(-3).into();
        assert_eq!(ours, SeekFrom::Current(-3));

        let theirs: embedded_io::SeekFrom = SeekFrom::End(4).into();
        assert_eq!(SeekFrom::from(theirs), SeekFrom::End(4));
    }

    #[test]
    fn test_cancelled_token_is_reported() {
        let token = CancellationToken::new();
        assert!(ensure_not_cancelled(&token).is_ok());

        token.cancel();
        assert!(matches!(ensure_not_cancelled(&token), Err(StreamError::Cancelled)));
    }
}
