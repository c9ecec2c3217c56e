//! Adapter layer - concrete streams implementing the domain's ports.
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - BlockCache (service)          │
//!     │  - Stream, AsyncStream (ports)   │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - decorators over a Stream      │
//!     │  - ZeroStream, IoStream          │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ wraps
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │  Base streams (files, memory)    │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Available Adapters
//!
//! Decorators, all built on [`WrappingStreamBase`]:
//!
//! - **`WrappingStream`**: forwards everything
//! - **`RebasedStream`**: moves the origin to the position at wrap time
//! - **`TruncatedStream`**: hides everything past a boundary
//! - **`ReadOnlyStream`**: rejects writes, never owns its stream
//! - **`CachingStream`**: loads 4 KiB blocks once and serves them from memory
//!
//! Self-contained streams:
//!
//! - **`ZeroStream`**: all zeros, writes only move the cursor
//! - **`IoStream`**: any `std::io::{Read, Write, Seek}` value

mod caching_stream;
mod io_stream;
mod read_only_stream;
mod rebased_stream;
mod truncated_stream;
mod wrapping_stream;
mod wrapping_stream_base;
mod zero_stream;

pub use caching_stream::CachingStream;
pub use io_stream::{IoStream, SetLen};
pub use read_only_stream::ReadOnlyStream;
pub use rebased_stream::RebasedStream;
pub use truncated_stream::TruncatedStream;
pub use wrapping_stream::WrappingStream;
pub use wrapping_stream_base::WrappingStreamBase;
pub use zero_stream::ZeroStream;
