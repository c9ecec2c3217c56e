//! Bounded sub-views of a stream.

use core::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::adapters::{RebasedStream, TruncatedStream};
use crate::domain::{AsyncStream, Ownership, Result, SeekFrom, Stream};

/// The stream returned by [`create_partial_stream`].
///
/// Which variant comes back depends on which transforms were needed; all of
/// them are used the same way through [`Stream`] and [`AsyncStream`].
#[derive(Debug)]
pub enum PartialStream<S> {
    /// Offset 0 and no length: the stream itself, undecorated.
    Unwrapped(S),
    /// Non-zero offset, no length.
    Rebased(RebasedStream<S>),
    /// Offset 0 with a length.
    Truncated(TruncatedStream<S>),
    /// Non-zero offset and a length.
    RebasedTruncated(TruncatedStream<RebasedStream<S>>),
}

impl<S> PartialStream<S> {
    /// Whether no decorator was applied.
    pub fn is_unwrapped(&self) -> bool {
        matches!(self, PartialStream::Unwrapped(_))
    }

    /// The stream passed in, if no decorator was applied.
    pub fn into_unwrapped(self) -> Option<S> {
        match self {
            PartialStream::Unwrapped(stream) => Some(stream),
            _ => None,
        }
    }
}

/// Create a view of `length` bytes of `stream` starting at `offset`.
///
/// - A non-zero `offset` seeks `stream` to `offset` and rebases it there.
/// - A `length` truncates the (possibly rebased) view to `length` bytes,
///   counted from where the view starts. With offset 0 that is the current
///   position of `stream`.
/// - With neither, `stream` comes back untouched as
///   [`PartialStream::Unwrapped`].
///
/// `ownership` applies to `stream`. When both transforms are applied, the
/// outer truncation always owns the rebased layer it wraps.
///
/// # Examples
///
/// ```
/// use stream_wrappers::adapters::ZeroStream;
/// use stream_wrappers::domain::{Ownership, Stream};
/// use stream_wrappers::infrastructure::create_partial_stream;
///
/// let mut zero = ZeroStream::with_length(1000);
/// let mut part = create_partial_stream(&mut zero, 100, Some(50), Ownership::None).unwrap();
/// assert_eq!(part.position().unwrap(), 0);
/// assert_eq!(part.length().unwrap(), 50);
///
/// let same = create_partial_stream(ZeroStream::new(), 0, None, Ownership::Owns).unwrap();
/// assert!(same.is_unwrapped());
/// ```
pub fn create_partial_stream<S: Stream>(
    mut stream: S,
    offset: u64,
    length: Option<u64>,
    ownership: Ownership,
) -> Result<PartialStream<S>> {
    trace!("partial stream: offset {}, length {:?}", offset, length);
    match (offset, length) {
        (0, None) => Ok(PartialStream::Unwrapped(stream)),
        (0, Some(length)) => Ok(PartialStream::Truncated(TruncatedStream::new(
            stream, length, ownership,
        )?)),
        (offset, length) => {
            stream.seek(SeekFrom::Start(offset))?;
            let rebased = RebasedStream::new(stream, ownership)?;
            match length {
                None => Ok(PartialStream::Rebased(rebased)),
                Some(length) => Ok(PartialStream::RebasedTruncated(TruncatedStream::new(
                    rebased,
                    length,
                    Ownership::Owns,
                )?)),
            }
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            PartialStream::Unwrapped($s) => $body,
            PartialStream::Rebased($s) => $body,
            PartialStream::Truncated($s) => $body,
            PartialStream::RebasedTruncated($s) => $body,
        }
    };
}

impl<S: Stream> Stream for PartialStream<S> {
    fn can_read(&self) -> bool {
        dispatch!(self, s => s.can_read())
    }

    fn can_write(&self) -> bool {
        dispatch!(self, s => s.can_write())
    }

    fn can_seek(&self) -> bool {
        dispatch!(self, s => s.can_seek())
    }

    fn can_timeout(&self) -> bool {
        dispatch!(self, s => s.can_timeout())
    }

    fn position(&mut self) -> Result<u64> {
        dispatch!(self, s => s.position())
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        dispatch!(self, s => s.set_position(position))
    }

    fn length(&mut self) -> Result<u64> {
        dispatch!(self, s => s.length())
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        dispatch!(self, s => s.set_length(length))
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        dispatch!(self, s => s.seek(pos))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        dispatch!(self, s => s.read(buf))
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        dispatch!(self, s => s.read_byte())
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        dispatch!(self, s => s.write(buf))
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        dispatch!(self, s => s.write_byte(byte))
    }

    fn flush(&mut self) -> Result<()> {
        dispatch!(self, s => s.flush())
    }

    fn read_timeout(&self) -> Result<Option<Duration>> {
        dispatch!(self, s => s.read_timeout())
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        dispatch!(self, s => s.set_read_timeout(timeout))
    }

    fn write_timeout(&self) -> Result<Option<Duration>> {
        dispatch!(self, s => s.write_timeout())
    }

    fn set_write_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        dispatch!(self, s => s.set_write_timeout(timeout))
    }

    fn dispose(&mut self) -> Result<()> {
        dispatch!(self, s => s.dispose())
    }

    fn is_disposed(&self) -> bool {
        dispatch!(self, s => s.is_disposed())
    }
}

impl<S: AsyncStream> AsyncStream for PartialStream<S> {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        dispatch!(self, s => s.read_async(buf, cancel).await)
    }

    async fn write_async(&mut self, buf: &[u8], cancel: &CancellationToken) -> Result<()> {
        dispatch!(self, s => s.write_async(buf, cancel).await)
    }

    async fn flush_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        dispatch!(self, s => s.flush_async(cancel).await)
    }
}
