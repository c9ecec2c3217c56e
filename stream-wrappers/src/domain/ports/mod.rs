//! Ports - the interfaces the domain expects from the outside world.
//!
//! - `Stream`: synchronous byte-stream contract
//! - `AsyncStream`: asynchronous read/write/flush with cancellation

pub mod stream;

pub use stream::{ensure_not_cancelled, AsyncStream, SeekFrom, Stream, MAX_POSITION};
