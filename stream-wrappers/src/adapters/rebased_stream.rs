//! Rebased view - shifts the origin of a stream to its position at wrap time.

use core::time::Duration;

use tokio_util::sync::CancellationToken;

use super::WrappingStreamBase;
use crate::domain::{AsyncStream, Ownership, Result, SeekFrom, Stream, StreamError};

/// A view in which the wrapped stream's position at construction time
/// becomes position 0.
///
/// Positions and lengths are reported relative to that origin, and seeks
/// are translated back into the wrapped stream's coordinates. Seeking to a
/// point before the origin is rejected with [`StreamError::InvalidSeek`]
/// before the wrapped stream is touched.
///
/// # Examples
///
/// ```
/// use stream_wrappers::adapters::{RebasedStream, ZeroStream};
/// use stream_wrappers::domain::{Ownership, SeekFrom, Stream};
///
/// let mut zero = ZeroStream::with_length(1000);
/// zero.set_position(100).unwrap();
///
/// let mut view = RebasedStream::new(&mut zero, Ownership::None).unwrap();
/// assert_eq!(view.position().unwrap(), 0);
/// assert_eq!(view.length().unwrap(), 900);
/// view.seek(SeekFrom::Start(50)).unwrap();
/// drop(view);
/// assert_eq!(zero.position().unwrap(), 150);
/// ```
#[derive(Debug)]
pub struct RebasedStream<S> {
    base: WrappingStreamBase<S>,
    base_offset: u64,
}

impl<S: Stream> RebasedStream<S> {
    /// Wrap `stream`, taking its current position as the new origin.
    ///
    /// # Errors
    ///
    /// Propagates the error if the wrapped stream cannot report its position.
    pub fn new(mut stream: S, ownership: Ownership) -> Result<Self> {
        let base_offset = stream.position()?;
        trace!("rebasing stream at offset {}", base_offset);
        Ok(Self {
            base: WrappingStreamBase::new(stream, ownership),
            base_offset,
        })
    }

    /// Offset in the wrapped stream that maps to position 0.
    pub fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// The shared decorator state.
    pub fn base(&self) -> &WrappingStreamBase<S> {
        &self.base
    }

    /// Give back the wrapped stream without disposing it.
    pub fn into_inner(self) -> Result<S> {
        self.base.into_inner()
    }

    fn to_inner(&self, position: u64) -> Result<u64> {
        position
            .checked_add(self.base_offset)
            .ok_or(StreamError::InvalidSeek {
                target: i128::from(position) + i128::from(self.base_offset),
            })
    }

    fn from_inner(&self, position: u64) -> Result<u64> {
        position
            .checked_sub(self.base_offset)
            .ok_or(StreamError::InvalidSeek {
                target: i128::from(position) - i128::from(self.base_offset),
            })
    }
}

impl<S: Stream> Stream for RebasedStream<S> {
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
        let inner = self.base.position()?;
        self.from_inner(inner)
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        let target = self.to_inner(position)?;
        self.base.set_position(target)
    }

    fn length(&mut self) -> Result<u64> {
        Ok(self.base.length()?.saturating_sub(self.base_offset))
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        let target = self.to_inner(length)?;
        self.base.set_length(target)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let inner_pos = match pos {
            SeekFrom::Start(offset) => SeekFrom::Start(self.to_inner(offset)?),
            SeekFrom::Current(offset) => {
                let current = self.base.position()?;
                let target = i128::from(current) + i128::from(offset);
                if target < i128::from(self.base_offset) {
                    return Err(StreamError::InvalidSeek {
                        target: target - i128::from(self.base_offset),
                    });
                }
                pos
            }
            SeekFrom::End(offset) => {
                let length = self.base.length()?;
                let target = i128::from(length) + i128::from(offset);
                if target < i128::from(self.base_offset) {
                    return Err(StreamError::InvalidSeek {
                        target: target - i128::from(self.base_offset),
                    });
                }
                pos
            }
        };
        let result = self.base.seek(inner_pos)?;
        self.from_inner(result)
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

impl<S: AsyncStream> AsyncStream for RebasedStream<S> {
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
