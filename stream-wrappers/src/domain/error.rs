//! Stream errors.
//!
//! Every stream in this crate, base or decorator, reports failures through
//! the one [`StreamError`] type. A decorator that hits an error in the stream
//! it wraps hands it back with `?` untouched, so an error raised five layers
//! down reaches the caller exactly as the innermost stream produced it.

use core::fmt;
use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T, E = StreamError> = core::result::Result<T, E>;

/// Errors that can occur while operating on a stream.
#[derive(Debug)]
#[non_exhaustive]
pub enum StreamError {
    /// The stream has been disposed; no further operations are possible.
    Disposed,

    /// The operation is not supported by this stream.
    ///
    /// Carries the name of the rejected operation (e.g. `"write"`).
    NotSupported(&'static str),

    /// An argument was invalid (e.g. an offset/count pair that does not
    /// describe a range of the buffer).
    InvalidArgument(&'static str),

    /// A numeric argument was outside its allowed range.
    ArgumentOutOfRange {
        /// Name of the offending argument.
        name: &'static str,
        /// The value that was supplied.
        value: i128,
    },

    /// A seek would move the cursor before the start of the stream or past
    /// the largest representable position.
    InvalidSeek {
        /// The position the seek would have produced.
        target: i128,
    },

    /// The stream ended before the requested number of bytes was read.
    EndOfStream {
        /// Number of bytes requested.
        expected: usize,
        /// Number of bytes actually obtained.
        actual: usize,
    },

    /// Position arithmetic overflowed.
    Overflow,

    /// An asynchronous operation observed a cancelled token.
    Cancelled,

    /// Error from an underlying base stream.
    Io(io::Error),
}

impl StreamError {
    /// Returns `true` for the error produced by operations on a disposed stream.
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed)
    }

    /// Returns `true` if the operation was rejected as unsupported.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported(_))
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disposed => write!(f, "Cannot access a disposed stream"),
            Self::NotSupported(op) => write!(f, "Stream does not support {}", op),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::ArgumentOutOfRange { name, value } => {
                write!(f, "Argument '{}' is out of range: {}", name, value)
            }
            Self::InvalidSeek { target } => {
                write!(f, "Invalid seek to position {}", target)
            }
            Self::EndOfStream { expected, actual } => write!(
                f,
                "Unexpected end of stream: expected {} bytes, read {}",
                expected, actual
            ),
            Self::Overflow => write!(f, "Stream position overflow"),
            Self::Cancelled => write!(f, "Operation was cancelled"),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl core::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(inner) => inner,
            other => {
                let kind = match other {
                    StreamError::NotSupported(_) => io::ErrorKind::Unsupported,
                    StreamError::InvalidArgument(_)
                    | StreamError::ArgumentOutOfRange { .. }
                    | StreamError::InvalidSeek { .. } => io::ErrorKind::InvalidInput,
                    StreamError::EndOfStream { .. } => io::ErrorKind::UnexpectedEof,
                    StreamError::Cancelled => io::ErrorKind::Interrupted,
                    _ => io::ErrorKind::Other,
                };
                io::Error::new(kind, other)
            }
        }
    }
}

// Implement embedded_io::Error so our streams can be used with embedded_io and
// embedded_io_async
impl embedded_io::Error for StreamError {
    fn kind(&self) -> embedded_io::ErrorKind {
        use embedded_io::ErrorKind;

        match self {
            Self::NotSupported(_) => ErrorKind::Unsupported,
            Self::InvalidArgument(_)
            | Self::ArgumentOutOfRange { .. }
            | Self::InvalidSeek { .. } => ErrorKind::InvalidInput,
            Self::Overflow => ErrorKind::OutOfMemory,
            Self::Cancelled => ErrorKind::Interrupted,
            Self::Io(e) => match e.kind() {
                io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
                io::ErrorKind::InvalidData => ErrorKind::InvalidData,
                io::ErrorKind::Unsupported => ErrorKind::Unsupported,
                io::ErrorKind::Interrupted => ErrorKind::Interrupted,
                io::ErrorKind::TimedOut => ErrorKind::TimedOut,
                io::ErrorKind::OutOfMemory => ErrorKind::OutOfMemory,
                io::ErrorKind::WriteZero => ErrorKind::WriteZero,
                _ => ErrorKind::Other,
            },
            Self::Disposed | Self::EndOfStream { .. } => ErrorKind::Other,
        }
    }
}
