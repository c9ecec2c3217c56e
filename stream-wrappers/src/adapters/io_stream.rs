//! Base stream over `std::io` types.

use std::io::{self, Cursor, Read, Seek, Write};

use crate::domain::{AsyncStream, MAX_POSITION, Result, SeekFrom, Slot, Stream, StreamError};

/// Types whose length can be changed in place.
pub trait SetLen {
    /// Truncate or extend to `len` bytes.
    fn set_len(&mut self, len: u64) -> io::Result<()>;
}

impl SetLen for std::fs::File {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        std::fs::File::set_len(self, len)
    }
}

impl SetLen for Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds address space"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}

type SetLenFn<T> = fn(&mut T, u64) -> io::Result<()>;

/// Adapts any `Read + Write + Seek` value to [`Stream`].
///
/// This is the usual bottom of a decorator stack: a file or an in-memory
/// cursor. Errors from the wrapped value surface as [`StreamError::Io`].
///
/// `dispose` drops the wrapped value (closing a file, freeing a buffer);
/// use [`into_inner`](Self::into_inner) to get it back instead.
#[derive(Debug)]
pub struct IoStream<T> {
    inner: Slot<T>,
    readable: bool,
    writable: bool,
    set_len: Option<SetLenFn<T>>,
}

impl<T: Read + Write + Seek> IoStream<T> {
    /// A readable, writable and seekable stream with a fixed length.
    pub fn new(inner: T) -> Self {
        Self {
            inner: Slot::Open(inner),
            readable: true,
            writable: true,
            set_len: None,
        }
    }

    /// A stream that refuses writes.
    pub fn read_only(inner: T) -> Self {
        Self {
            writable: false,
            ..Self::new(inner)
        }
    }

    /// A writable stream whose length can also be changed.
    pub fn resizable(inner: T) -> Self
    where
        T: SetLen,
    {
        let set_len: SetLenFn<T> = <T as SetLen>::set_len;
        Self {
            set_len: Some(set_len),
            ..Self::new(inner)
        }
    }

    /// Shared access to the wrapped value.
    pub fn get_ref(&self) -> Result<&T> {
        self.inner.get()
    }

    /// Give back the wrapped value.
    pub fn into_inner(self) -> Result<T> {
        self.inner.into_inner()
    }
}

impl<T: Read + Write + Seek> Stream for IoStream<T> {
    fn can_read(&self) -> bool {
        self.readable && !self.inner.is_disposed()
    }

    fn can_write(&self) -> bool {
        self.writable && !self.inner.is_disposed()
    }

    fn can_seek(&self) -> bool {
        !self.inner.is_disposed()
    }

    fn position(&mut self) -> Result<u64> {
        Ok(self.inner.get_mut()?.stream_position()?)
    }

    fn set_position(&mut self, position: u64) -> Result<()> {
        self.seek(SeekFrom::Start(position)).map(|_| ())
    }

    fn length(&mut self) -> Result<u64> {
        let inner = self.inner.get_mut()?;
        let current = inner.stream_position()?;
        let end = inner.seek(io::SeekFrom::End(0))?;
        if end != current {
            inner.seek(io::SeekFrom::Start(current))?;
        }
        Ok(end)
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        let inner = self.inner.get_mut()?;
        let set_len = match self.set_len {
            Some(f) if self.writable => f,
            _ => return Err(StreamError::NotSupported("set_length")),
        };
        if length > MAX_POSITION {
            return Err(StreamError::ArgumentOutOfRange {
                name: "length",
                value: i128::from(length),
            });
        }
        Ok(set_len(inner, length)?)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => SeekFrom::Start(offset).resolve(0, 0)?,
            other => {
                let position = self.position()?;
                let length = self.length()?;
                other.resolve(position, length)?
            }
        };
        Ok(self.inner.get_mut()?.seek(io::SeekFrom::Start(target))?)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let inner = self.inner.get_mut()?;
        if !self.readable {
            return Err(StreamError::NotSupported("read"));
        }
        loop {
            match inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write(&mut self, buf: &[u8]) -> Result<()> {
        let inner = self.inner.get_mut()?;
        if !self.writable {
            return Err(StreamError::NotSupported("write"));
        }
        Ok(inner.write_all(buf)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.inner.get_mut()?.flush()?)
    }

    fn dispose(&mut self) -> Result<()> {
        if self.inner.take().is_some() {
            trace!("io stream disposed");
        }
        Ok(())
    }

    fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

impl<T: Read + Write + Seek> AsyncStream for IoStream<T> {}
