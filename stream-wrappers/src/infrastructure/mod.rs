//! Infrastructure layer - helpers and interop built on the domain and
//! adapter layers.
//!
//! - [`primitives`]: read-until-full loops and the `StreamExt` /
//!   `AsyncStreamExt` extension traits
//! - [`partial`]: bounded sub-views through [`create_partial_stream`]
//! - `embedded_io_impl`: embedded-io and embedded-io-async trait impls for
//!   every stream in the crate

pub mod partial;
pub mod primitives;

mod embedded_io_impl;

pub use partial::{PartialStream, create_partial_stream};
pub use primitives::{
    AsyncStreamExt, COPY_BUFFER_SIZE, StreamExt, check_range, read_block, read_block_async, read_exactly,
    read_exactly_async,
};
