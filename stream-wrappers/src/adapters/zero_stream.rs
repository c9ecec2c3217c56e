//! A stream of zeros.

use crate::domain::{AsyncStream, MAX_POSITION, Result, SeekFrom, Stream, StreamError};

/// A self-contained stream whose content is all zero bytes.
///
/// Reads zero-fill the buffer up to the current length. Writes store
/// nothing: they only move the position and grow the length, which makes
/// the stream a cheap stand-in for a sized source or a byte counter.
///
/// # Examples
///
/// ```
/// use stream_wrappers::adapters::ZeroStream;
/// use stream_wrappers::domain::Stream;
///
/// let mut zero = ZeroStream::new();
/// zero.write(&[1, 2, 3]).unwrap();
/// assert_eq!(zero.length().unwrap(), 3);
///
/// zero.set_position(0).unwrap();
/// let mut buf = [0xFF; 8];
/// assert_eq!(zero.read(&mut buf).unwrap(), 3);
/// assert_eq!(&buf[..3], &[0, 0, 0]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct ZeroStream {
    position: u64,
    length: u64,
    disposed: bool,
}

impl ZeroStream {
    /// An empty stream.
    pub const fn new() -> Self {
        Self {
            position: 0,
            length: 0,
            disposed: false,
        }
    }

    /// A stream of `length` zero bytes, positioned at the start.
    pub const fn with_length(length: u64) -> Self {
        Self {
            position: 0,
            length,
            disposed: false,
        }
    }

    /// Current position, readable without `&mut`.
    pub const fn current(&self) -> u64 {
        self.position
    }

    /// Current length, readable without `&mut`.
    pub const fn len(&self) -> u64 {
        self.length
    }

    /// Check if the stream has zero length.
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    fn ensure_open(&self) -> Result<()> {
        if self.disposed {
            Err(StreamError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Stream for ZeroStream {
    fn can_read(&self) -> bool {
        !self.disposed
    }

    fn can_write(&self) -> bool {
        !self.disposed
    }

    fn can_seek(&self) -> bool {
        !self.disposed
    }

    fn position(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.position)
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        self.ensure_open()?;
        if position > MAX_POSITION {
            return Err(StreamError::ArgumentOutOfRange {
                name: "position",
                value: i128::from(position),
            });
        }
        self.position = position;
        Ok(())
    }

    fn length(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.length)
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        self.ensure_open()?;
        if length > MAX_POSITION {
            return Err(StreamError::ArgumentOutOfRange {
                name: "length",
                value: i128::from(length),
            });
        }
        self.length = length;
        self.position = self.position.min(length);
        Ok(())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.ensure_open()?;
        self.position = pos.resolve(self.position, self.length)?;
        Ok(self.position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        let available = self.length.saturating_sub(self.position);
        let count = usize::try_from(available).map_or(buf.len(), |left| buf.len().min(left));
        buf[..count].fill(0);
        self.position += count as u64;
        Ok(count)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.ensure_open()?;
        let end = self
            .position
            .checked_add(buf.len() as u64)
            .filter(|end| *end <= MAX_POSITION)
            .ok_or(StreamError::Overflow)?;
        self.position = end;
        self.length = self.length.max(end);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ensure_open()
    }

    fn dispose(&mut self) -> Result<()> {
        self.disposed = true;
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl AsyncStream for ZeroStream {}
