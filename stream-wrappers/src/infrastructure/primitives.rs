//! Read loops and extension methods shared by every stream.
//!
//! A single `read` may return fewer bytes than asked for without being at
//! the end of the stream. The helpers here loop until a request is
//! satisfied or the stream reports end of stream, which is what the
//! decorators (and most callers) actually want.

use tokio_util::sync::CancellationToken;

use crate::domain::{AsyncStream, Result, Stream, StreamError, ensure_not_cancelled};

/// Buffer size used by [`StreamExt::copy_to`] and [`AsyncStreamExt::copy_to_async`].
pub const COPY_BUFFER_SIZE: usize = 81_920;

/// Read until `buf` is full or the stream is exhausted.
///
/// Returns the number of bytes read, which is less than `buf.len()` only
/// when a `read` returned 0.
pub fn read_block<S: Stream + ?Sized>(stream: &mut S, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        let n = stream.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

/// Asynchronous [`read_block`]. The token is checked before every read.
pub async fn read_block_async<S: AsyncStream + ?Sized>(
    stream: &mut S,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        ensure_not_cancelled(cancel)?;
        let n = stream.read_async(&mut buf[total..], cancel).await?;
        if n == 0 {
            break;
        }
        total += n;
    }
    Ok(total)
}

/// Fill `buf` completely.
///
/// # Errors
///
/// Fails with [`StreamError::EndOfStream`] if the stream ends first. The
/// bytes that were read are left in `buf`.
pub fn read_exactly<S: Stream + ?Sized>(stream: &mut S, buf: &mut [u8]) -> Result<()> {
    let actual = read_block(stream, buf)?;
    short_read(buf.len(), actual)
}

/// Asynchronous [`read_exactly`].
pub async fn read_exactly_async<S: AsyncStream + ?Sized>(
    stream: &mut S,
    buf: &mut [u8],
    cancel: &CancellationToken,
) -> Result<()> {
    let actual = read_block_async(stream, buf, cancel).await?;
    short_read(buf.len(), actual)
}

fn short_read(expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        Err(StreamError::EndOfStream { expected, actual })
    } else {
        Ok(())
    }
}

/// Validate an `(offset, count)` window into a buffer of `len` bytes.
///
/// # Errors
///
/// [`StreamError::ArgumentOutOfRange`] if `offset` lies past the buffer,
/// [`StreamError::InvalidArgument`] if the window runs past its end.
pub fn check_range(len: usize, offset: usize, count: usize) -> Result<()> {
    if offset > len {
        return Err(StreamError::ArgumentOutOfRange {
            name: "offset",
            value: offset as i128,
        });
    }
    if count > len - offset {
        return Err(StreamError::InvalidArgument(
            "offset and count exceed the buffer length",
        ));
    }
    Ok(())
}

/// Convenience methods for every [`Stream`].
pub trait StreamExt: Stream {
    /// See [`read_block`].
    fn read_block(&mut self, buf: &mut [u8]) -> Result<usize> {
        read_block(self, buf)
    }

    /// See [`read_exactly`].
    fn read_exactly(&mut self, buf: &mut [u8]) -> Result<()> {
        read_exactly(self, buf)
    }

    /// Read into `buf[offset..offset + count]`.
    ///
    /// The window is validated before the stream is touched.
    fn read_range(&mut self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        check_range(buf.len(), offset, count)?;
        self.read(&mut buf[offset..offset + count])
    }

    /// Write `buf[offset..offset + count]`.
    ///
    /// The window is validated before the stream is touched.
    fn write_range(&mut self, buf: &[u8], offset: usize, count: usize) -> Result<()> {
        check_range(buf.len(), offset, count)?;
        self.write(&buf[offset..offset + count])
    }

    /// Copy everything from the current position to the end of the stream
    /// into `dest`. Returns the number of bytes copied.
    fn copy_to<D: Stream + ?Sized>(&mut self, dest: &mut D) -> Result<u64> {
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut copied = 0u64;
        loop {
            let n = self.read(&mut buf)?;
            if n == 0 {
                return Ok(copied);
            }
            dest.write(&buf[..n])?;
            copied += n as u64;
        }
    }

    /// Read everything from the current position to the end of the stream.
    fn read_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }
}

impl<S: Stream + ?Sized> StreamExt for S {}

/// Convenience methods for every [`AsyncStream`].
pub trait AsyncStreamExt: AsyncStream {
    /// See [`read_block_async`].
    async fn read_block_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        read_block_async(self, buf, cancel).await
    }

    /// See [`read_exactly_async`].
    async fn read_exactly_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<()> {
        read_exactly_async(self, buf, cancel).await
    }

    /// Asynchronous [`StreamExt::copy_to`].
    async fn copy_to_async<D: AsyncStream + ?Sized>(
        &mut self,
        dest: &mut D,
        cancel: &CancellationToken,
    ) -> Result<u64> {
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut copied = 0u64;
        loop {
            let n = self.read_async(&mut buf, cancel).await?;
            if n == 0 {
                return Ok(copied);
            }
            dest.write_async(&buf[..n], cancel).await?;
            copied += n as u64;
        }
    }
}

impl<S: AsyncStream + ?Sized> AsyncStreamExt for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{IoStream, ZeroStream};
    use std::io::{self, Cursor, Read, Seek, Write};

    /// Hands out at most one byte per read.
    struct Trickle(Cursor<Vec<u8>>);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = buf.len().min(1);
            self.0.read(&mut buf[..end])
        }
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for Trickle {
        fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
            self.0.seek(pos)
        }
    }

    fn trickle(len: usize) -> IoStream<Trickle> {
        IoStream::new(Trickle(Cursor::new((1..=len).map(|i| i as u8).collect())))
    }

    #[test]
    fn test_read_block_loops_over_short_reads() {
        let mut stream = trickle(10);
        let mut buf = [0u8; 8];
        assert_eq!(read_block(&mut stream, &mut buf).unwrap(), 8);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);

        assert_eq!(read_block(&mut stream, &mut buf).unwrap(), 2);
        assert_eq!(read_block(&mut stream, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_exactly_reports_short_read() {
        let mut stream = trickle(3);
        let mut buf = [0u8; 5];
        let err = stream.read_exactly(&mut buf).unwrap_err();
        assert!(matches!(err, StreamError::EndOfStream { expected: 5, actual: 3 }));
    }

    #[tokio::test]
    async fn test_read_block_async_matches_sync() {
        let token = CancellationToken::new();
        let mut stream = trickle(10);
        let mut buf = [0u8; 8];
        assert_eq!(stream.read_block_async(&mut buf, &token).await.unwrap(), 8);
        assert_eq!(buf, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(stream.read_exactly_async(&mut buf, &token).await.is_err());
    }

    #[tokio::test]
    async fn test_read_block_async_honors_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let mut stream = trickle(10);
        let err = read_block_async(&mut stream, &mut [0u8; 4], &token).await.unwrap_err();
        assert!(matches!(err, StreamError::Cancelled));
        assert_eq!(stream.position().unwrap(), 0);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(10, 0, 10).is_ok());
        assert!(check_range(10, 10, 0).is_ok());
        assert!(matches!(check_range(10, 11, 0), Err(StreamError::ArgumentOutOfRange { .. })));
        assert!(matches!(check_range(10, 4, 7), Err(StreamError::InvalidArgument(_))));
    }

    #[test]
    fn test_range_methods_validate_before_io() {
        let mut zero = ZeroStream::with_length(100);
        let mut buf = [1u8; 10];
        assert!(zero.read_range(&mut buf, 5, 6).is_err());
        assert_eq!(zero.current(), 0);

        assert_eq!(zero.read_range(&mut buf, 5, 5).unwrap(), 5);
        assert_eq!(buf, [1, 1, 1, 1, 1, 0, 0, 0, 0, 0]);

        zero.write_range(&buf, 2, 3).unwrap();
        assert_eq!(zero.current(), 8);
    }

    #[test]
    fn test_copy_and_read_to_vec() {
        let mut source = trickle(5);
        let mut sink = ZeroStream::new();
        assert_eq!(source.copy_to(&mut sink).unwrap(), 5);
        assert_eq!(sink.len(), 5);

        source.set_position(2).unwrap();
        assert_eq!(source.read_to_vec().unwrap(), vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn test_copy_to_async() {
        let token = CancellationToken::new();
        let mut source = ZeroStream::with_length(100_000);
        let mut sink = ZeroStream::new();
        assert_eq!(source.copy_to_async(&mut sink, &token).await.unwrap(), 100_000);
        assert_eq!(sink.len(), 100_000);
    }
}
