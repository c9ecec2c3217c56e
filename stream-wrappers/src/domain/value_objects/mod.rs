//! Value objects for the domain layer.
//!
//! Value objects are immutable, validated data types that represent
//! concepts in the domain model.

mod block_index;
mod ownership;

pub use block_index::{BlockIndex, BLOCK_SIZE};
pub use ownership::Ownership;
