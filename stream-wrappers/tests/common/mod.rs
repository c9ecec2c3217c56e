//! Shared test fixtures.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use stream_wrappers::{AsyncStream, CancellationToken, Result, SeekFrom, Stream, StreamError};

/// What an [`InstrumentedStream`] observed.
#[derive(Debug, Default)]
pub struct Stats {
    /// Number of `read`/`read_async` calls that reached the stream.
    pub reads: usize,
    /// Position of each of those reads.
    pub read_positions: Vec<u64>,
    /// Number of `dispose` calls.
    pub disposals: usize,
    /// Cancelled by the next read, to simulate cancellation mid-load.
    pub cancel_on_read: Option<CancellationToken>,
}

/// In-memory stream that counts what happens to it.
pub struct InstrumentedStream {
    data: Vec<u8>,
    position: u64,
    max_chunk: usize,
    disposed: bool,
    stats: Arc<Mutex<Stats>>,
}

/// `len` bytes where byte `i` is `i % 251`.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

impl InstrumentedStream {
    pub fn new(data: Vec<u8>) -> (Self, Arc<Mutex<Stats>>) {
        Self::with_max_chunk(data, usize::MAX)
    }

    /// Each read returns at most `max_chunk` bytes.
    pub fn with_max_chunk(data: Vec<u8>, max_chunk: usize) -> (Self, Arc<Mutex<Stats>>) {
        let stats = Arc::new(Mutex::new(Stats::default()));
        let stream = Self {
            data,
            position: 0,
            max_chunk,
            disposed: false,
            stats: Arc::clone(&stats),
        };
        (stream, stats)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.disposed {
            Err(StreamError::Disposed)
        } else {
            Ok(())
        }
    }
}

impl Stream for InstrumentedStream {
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
        self.position = position;
        Ok(())
    }

    fn length(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.data.len() as u64)
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        self.ensure_open()?;
        self.data.resize(length as usize, 0);
        Ok(())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.ensure_open()?;
        self.position = pos.resolve(self.position, self.data.len() as u64)?;
        Ok(self.position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        {
            let mut stats = self.stats.lock().unwrap();
            stats.reads += 1;
            stats.read_positions.push(self.position);
            if let Some(token) = stats.cancel_on_read.take() {
                token.cancel();
            }
        }
        let start = (self.position as usize).min(self.data.len());
        let count = buf.len().min(self.max_chunk).min(self.data.len() - start);
        buf[..count].copy_from_slice(&self.data[start..start + count]);
        self.position += count as u64;
        Ok(count)
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        self.ensure_open()?;
        let start = self.position as usize;
        let end = start + buf.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[start..end].copy_from_slice(buf);
        self.position = end as u64;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ensure_open()
    }

    fn dispose(&mut self) -> Result<()> {
        self.stats.lock().unwrap().disposals += 1;
        self.disposed = true;
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl AsyncStream for InstrumentedStream {
    async fn read_async(&mut self, buf: &mut [u8], cancel: &CancellationToken) -> Result<usize> {
        tokio::task::yield_now().await;
        if cancel.is_cancelled() {
            return Err(StreamError::Cancelled);
        }
        self.read(buf)
    }
}
