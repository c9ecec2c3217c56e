//! Domain entities.
//!
//! Entities are objects that have identity and lifecycle: a `CachedBlock`
//! moves from not-loaded to loaded once, and a `Slot` moves from open to
//! disposed once.

mod cached_block;
mod slot;

pub use cached_block::CachedBlock;
pub use slot::Slot;
