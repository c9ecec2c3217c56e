//! Block-caching decorator.
//!
//! Splits the wrapped stream into [`BLOCK_SIZE`](crate::domain::BLOCK_SIZE) blocks, reads each block
//! the first time it is touched and keeps it for the life of the decorator.
//! The bookkeeping lives in [`BlockCache`]; this adapter only supplies the
//! I/O that fills a block, once for the blocking path and once for the
//! suspending path.

use core::time::Duration;

use tokio_util::sync::CancellationToken;

use super::WrappingStreamBase;
use crate::domain::{
    AsyncStream, BlockCache, BlockIndex, Ownership, Result, SeekFrom, Stream, StreamError,
};
use crate::infrastructure::primitives::{read_block, read_block_async};

/// A read-only decorator that memoizes the wrapped stream block by block.
///
/// The decorator keeps its own logical position. Moving it (through
/// [`set_position`](Stream::set_position) or a seek) does no I/O until a
/// read lands in a block that has not been loaded yet; only then is the
/// wrapped stream repositioned and read.
///
/// Blocks are never evicted. A block whose load fails (an I/O error, or a
/// cancelled asynchronous read) is left unloaded and is retried by the next
/// read that needs it. Reads from a block that starts at or past the end of
/// the wrapped stream return 0 without allocating anything.
///
/// # Examples
///
/// ```
/// use stream_wrappers::adapters::{CachingStream, IoStream};
/// use stream_wrappers::domain::{Ownership, SeekFrom, Stream};
/// use std::io::Cursor;
///
/// let data: Vec<u8> = (0..10_000u32).map(|i| i as u8).collect();
/// let mut cached = CachingStream::new(IoStream::new(Cursor::new(data)), Ownership::Owns).unwrap();
///
/// cached.seek(SeekFrom::Start(5000)).unwrap();
/// assert_eq!(cached.read_byte().unwrap(), Some((5000u32 % 256) as u8));
/// assert_eq!(cached.cached_block_count(), 1);
/// ```
#[derive(Debug)]
pub struct CachingStream<S> {
    base: WrappingStreamBase<S>,
    cache: BlockCache,
    position: u64,
}

impl<S: Stream> CachingStream<S> {
    /// Wrap `stream`, starting at its current position.
    ///
    /// # Errors
    ///
    /// Propagates the error if the wrapped stream cannot report its position.
    pub fn new(mut stream: S, ownership: Ownership) -> Result<Self> {
        let position = stream.position()?;
        Ok(Self {
            base: WrappingStreamBase::new(stream, ownership),
            cache: BlockCache::new(),
            position,
        })
    }

    /// Number of blocks loaded so far.
    pub fn cached_block_count(&self) -> usize {
        self.cache.loaded_count()
    }

    /// Whether block `index` (covering `index * BLOCK_SIZE ..`) is loaded.
    pub fn is_block_loaded(&self, index: u64) -> bool {
        self.cache.is_loaded(BlockIndex::new(index))
    }

    /// The shared decorator state.
    pub fn base(&self) -> &WrappingStreamBase<S> {
        &self.base
    }

    /// Give back the wrapped stream, dropping the cache.
    pub fn into_inner(self) -> Result<S> {
        self.base.into_inner()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.base.is_disposed() {
            Err(StreamError::Disposed)
        } else {
            Ok(())
        }
    }

    fn load_block(&mut self) -> Result<()> {
        let inner = self.base.get_mut()?;
        if self.cache.is_loaded(BlockIndex::containing(self.position))
            || past_end(inner, self.position)?
        {
            return Ok(());
        }
        if let Some(index) = self.cache.missing_block(self.position) {
            inner.seek(SeekFrom::Start(index.start_offset()))?;
            let mut data = BlockCache::block_buffer();
            let filled = read_block(inner, &mut data)?;
            debug!("caching stream: loaded {} ({} bytes)", index, filled);
            self.cache.install(index, data, filled);
        }
        Ok(())
    }

    fn serve(&mut self, buf: &mut [u8]) -> usize {
        let n = self.cache.copy_out(self.position, buf);
        self.position += n as u64;
        n
    }

    fn reject(&self, operation: &'static str) -> StreamError {
        if self.base.is_disposed() {
            StreamError::Disposed
        } else {
            trace!("caching stream rejected {}", operation);
            StreamError::NotSupported(operation)
        }
    }
}

// Blocks starting at or past the end of the wrapped stream are never
// allocated; reads there return 0.
fn past_end<S: Stream>(inner: &mut S, position: u64) -> Result<bool> {
    let start = BlockIndex::containing(position).start_offset();
    let end = inner.length()?;
    if start >= end {
        trace!("caching stream: block at {} is past end {}", start, end);
        return Ok(true);
    }
    Ok(false)
}

impl<S: AsyncStream> CachingStream<S> {
    async fn load_block_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        let inner = self.base.get_mut()?;
        if self.cache.is_loaded(BlockIndex::containing(self.position))
            || past_end(inner, self.position)?
        {
            return Ok(());
        }
        if let Some(index) = self.cache.missing_block(self.position) {
            inner.seek(SeekFrom::Start(index.start_offset()))?;
            let mut data = BlockCache::block_buffer();
            let filled = read_block_async(inner, &mut data, cancel).await?;
            debug!("caching stream: loaded {} ({} bytes)", index, filled);
            self.cache.install(index, data, filled);
        }
        Ok(())
    }
}

impl<S: Stream> Stream for CachingStream<S> {
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
        self.ensure_open()?;
        Ok(self.position)
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        self.ensure_open()?;
        self.position = position;
        Ok(())
    }

    fn length(&mut self) -> Result<u64> {
        self.base.length()
    }

    fn set_length(&mut self, _length: u64) -> Result<()> {
        Err(self.reject("set_length"))
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let inner = self.base.get_mut()?;
        inner.set_position(self.position)?;
        let result = inner.seek(pos)?;
        self.position = result;
        Ok(result)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.load_block()?;
        Ok(self.serve(buf))
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.load_block()?;
        let byte = self.cache.byte_at(self.position);
        if byte.is_some() {
            self.position += 1;
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
        let result = self.base.dispose();
        if self.cache.capacity() > 0 {
            trace!("caching stream: releasing {} cached blocks", self.cache.loaded_count());
        }
        self.cache.clear();
        result
    }

    fn is_disposed(&self) -> bool {
        self.base.is_disposed()
    }
}

impl<S: AsyncStream> AsyncStream for CachingStream<S> {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        self.load_block_async(cancel).await?;
        Ok(self.serve(buf))
    }

    async fn write_async(&mut self, _buf: &[u8], _cancel: &CancellationToken) -> Result<()> {
        Err(self.reject("write_async"))
    }

    async fn flush_async(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.base.get_mut()?.flush_async(cancel).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::IoStream;
    use crate::domain::BLOCK_SIZE;
    use std::cell::Cell;
    use std::io::{self, Cursor, Read, Seek, Write};
    use std::rc::Rc;

    /// Cursor that counts physical reads.
    struct CountingCursor {
        inner: Cursor<Vec<u8>>,
        reads: Rc<Cell<usize>>,
    }

    impl Read for CountingCursor {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.reads.set(self.reads.get() + 1);
            self.inner.read(buf)
        }
    }

    impl Write for CountingCursor {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.inner.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Seek for CountingCursor {
        fn seek(&mut self, pos: io::SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    fn pattern(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    fn counting(len: usize) -> (CachingStream<IoStream<CountingCursor>>, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let cursor = CountingCursor {
            inner: Cursor::new(pattern(len)),
            reads: Rc::clone(&reads),
        };
        let stream = CachingStream::new(IoStream::new(cursor), Ownership::Owns).unwrap();
        (stream, reads)
    }

    #[test]
    fn test_second_read_is_served_from_cache() {
        let (mut stream, reads) = counting(10_000);

        stream.set_position(5000).unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some((5000 % 251) as u8));
        let after_first = reads.get();
        assert!(after_first > 0);
        assert!(stream.is_block_loaded(1));
        assert!(!stream.is_block_loaded(0));

        stream.seek(SeekFrom::Start(5000)).unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some((5000 % 251) as u8));
        assert_eq!(reads.get(), after_first);
    }

    #[test]
    fn test_read_stops_at_block_boundary() {
        let (mut stream, _) = counting(10_000);
        stream.set_position(4090).unwrap();
        let mut buf = [0u8; 100];
        assert_eq!(stream.read(&mut buf).unwrap(), 6);
        assert_eq!(stream.position().unwrap(), BLOCK_SIZE as u64);
        assert_eq!(stream.read(&mut buf).unwrap(), 100);
        assert_eq!(buf[0], (4096 % 251) as u8);
    }

    #[test]
    fn test_terminal_block_is_short() {
        let (mut stream, _) = counting(10_000);
        stream.set_position(9_990).unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(stream.read(&mut buf).unwrap(), 10);
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
        assert_eq!(stream.read_byte().unwrap(), None);
    }

    #[test]
    fn test_position_past_end_reads_nothing() {
        let (mut stream, _) = counting(100);
        stream.set_position(50_000).unwrap();
        assert_eq!(stream.read(&mut [0u8; 8]).unwrap(), 0);
        assert_eq!(stream.position().unwrap(), 50_000);
    }

    #[test]
    fn test_far_position_does_not_grow_cache() {
        let (mut stream, reads) = counting(100);
        stream.set_position(1 << 60).unwrap();
        assert_eq!(stream.read(&mut [0u8; 8]).unwrap(), 0);
        assert_eq!(stream.read_byte().unwrap(), None);
        assert_eq!(stream.cache.capacity(), 0);
        assert_eq!(reads.get(), 0);
    }

    #[test]
    fn test_set_position_does_no_io() {
        let (mut stream, reads) = counting(10_000);
        stream.set_position(8000).unwrap();
        assert_eq!(reads.get(), 0);
        assert_eq!(stream.cached_block_count(), 0);
    }

    #[test]
    fn test_seek_uses_logical_position() {
        let (mut stream, _) = counting(10_000);
        let mut buf = [0u8; 10];
        stream.read(&mut buf).unwrap();
        assert_eq!(stream.seek(SeekFrom::Current(5)).unwrap(), 15);
        assert_eq!(stream.seek(SeekFrom::End(-1)).unwrap(), 9_999);
        assert!(stream.seek(SeekFrom::Current(-10_000)).is_err());
    }

    #[test]
    fn test_writes_rejected() {
        let (mut stream, _) = counting(10);
        assert!(!stream.can_write());
        assert!(stream.write(&[1]).unwrap_err().is_not_supported());
        assert!(stream.set_length(0).unwrap_err().is_not_supported());
    }

    #[test]
    fn test_dispose_releases_cache() {
        let (mut stream, _) = counting(10_000);
        stream.read(&mut [0u8; 4]).unwrap();
        assert_eq!(stream.cached_block_count(), 1);

        stream.dispose().unwrap();
        stream.dispose().unwrap();
        assert_eq!(stream.cached_block_count(), 0);
        assert!(stream.read(&mut [0u8; 4]).unwrap_err().is_disposed());
        assert!(stream.position().unwrap_err().is_disposed());
    }

    #[tokio::test]
    async fn test_cancelled_load_leaves_block_unloaded() {
        let (mut stream, reads) = counting(10_000);
        let token = CancellationToken::new();
        token.cancel();

        let err = stream.read_async(&mut [0u8; 4], &token).await.unwrap_err();
        assert!(matches!(err, StreamError::Cancelled));
        assert!(!stream.is_block_loaded(0));
        assert_eq!(stream.position().unwrap(), 0);
        assert_eq!(reads.get(), 0);

        let mut buf = [0u8; 4];
        let n = stream.read_async(&mut buf, &CancellationToken::new()).await.unwrap();
        assert_eq!(n, 4);
        assert_eq!(buf, [0, 1, 2, 3]);
        assert!(stream.is_block_loaded(0));
    }

    #[tokio::test]
    async fn test_async_far_position_does_not_grow_cache() {
        let (mut stream, reads) = counting(100);
        stream.set_position(1 << 60).unwrap();
        let n = stream.read_async(&mut [0u8; 8], &CancellationToken::new()).await.unwrap();
        assert_eq!(n, 0);
        assert_eq!(stream.cache.capacity(), 0);
        assert_eq!(reads.get(), 0);
    }
}
