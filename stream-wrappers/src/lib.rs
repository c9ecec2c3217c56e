//! Composable byte-stream decorators with explicit ownership.
//!
//! This crate provides decorators that change the addressable range,
//! writability or caching behavior of a byte stream while keeping the
//! stream contract intact, structured using hexagonal architecture (ports
//! and adapters pattern).
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! ## Domain Layer (`domain`)
//! Pure logic with no I/O:
//! - **Entities**: `CachedBlock`, `Slot` (open/disposed)
//! - **Value Objects**: `BlockIndex`, `Ownership`
//! - **Services**: `BlockCache` (block bookkeeping for the caching decorator)
//! - **Ports**: `Stream`, `AsyncStream`
//!
//! ## Adapter Layer (`adapters`)
//! Concrete streams implementing the ports:
//! - **`WrappingStream`**, **`RebasedStream`**, **`TruncatedStream`**,
//!   **`ReadOnlyStream`**, **`CachingStream`**: decorators built on
//!   `WrappingStreamBase`
//! - **`ZeroStream`**: a stream of zeros
//! - **`IoStream`**: any `std::io::{Read, Write, Seek}` value
//!
//! ## Infrastructure Layer (`infrastructure`)
//! Utilities built on the other two:
//! - `read_block` / `read_exactly` loops and the `StreamExt` traits
//! - `create_partial_stream` for bounded sub-views
//! - embedded-io and embedded-io-async impls for every stream
//!
//! # Quick Start
//!
//! ```
//! use std::io::Cursor;
//! use stream_wrappers::{
//!     CachingStream, IoStream, Ownership, SeekFrom, Stream, StreamExt, create_partial_stream,
//! };
//!
//! let data: Vec<u8> = (0..=255).collect();
//! let base = IoStream::new(Cursor::new(data));
//!
//! // Bytes 16..48 of the base stream, seen as a 32-byte stream.
//! let part = create_partial_stream(base, 16, Some(32), Ownership::Owns)?;
//! let mut cached = CachingStream::new(part, Ownership::Owns)?;
//!
//! cached.seek(SeekFrom::Start(4))?;
//! assert_eq!(cached.read_byte()?, Some(20));
//!
//! cached.set_position(0)?;
//! assert_eq!(cached.read_to_vec()?.len(), 32);
//!
//! cached.dispose()?;
//! # Ok::<(), stream_wrappers::StreamError>(())
//! ```
//!
//! # Ownership and disposal
//!
//! Every decorator is constructed with an [`Ownership`]. Under
//! [`Ownership::Owns`], disposing the decorator disposes the wrapped stream
//! too; under [`Ownership::None`] the wrapped stream is left open. Disposal
//! is explicit and idempotent; dropping a decorator does not dispose
//! anything. Wrap `&mut stream` to keep using a stream after its decorator
//! is gone.
//!
//! # Features
//!
//! - `log` (default): Enable logging through the `log` facade

#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

#[macro_use]
mod macros;

// Core layers
pub mod adapters;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    AsyncStream, BLOCK_SIZE, BlockCache, BlockIndex, CachedBlock, MAX_POSITION, Ownership, Result,
    SeekFrom, Slot, Stream, StreamError, ensure_not_cancelled,
};

pub use adapters::{
    CachingStream, IoStream, ReadOnlyStream, RebasedStream, SetLen, TruncatedStream,
    WrappingStream, WrappingStreamBase, ZeroStream,
};

// Infrastructure layer exports
pub use infrastructure::{
    AsyncStreamExt, PartialStream, StreamExt, create_partial_stream, read_block, read_block_async,
    read_exactly, read_exactly_async,
};

// Re-export the ecosystem crates that appear in the public API
pub use embedded_io;
pub use embedded_io_async;
pub use tokio_util::sync::CancellationToken;
