//! Cached block entity - one slot of the block cache.

use crate::domain::value_objects::BLOCK_SIZE;

/// A slot in the block cache.
///
/// Slots start out `NotLoaded` and move to `Loaded` exactly once. A loaded
/// block holds at most [`BLOCK_SIZE`] bytes; fewer only for the block that
/// contains the end of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CachedBlock {
    /// The block has not been read from the wrapped stream yet.
    #[default]
    NotLoaded,
    /// The block's bytes, as read from the wrapped stream.
    Loaded(Vec<u8>),
}

impl CachedBlock {
    /// Check if the block has been loaded.
    #[inline]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, CachedBlock::Loaded(_))
    }

    /// The block's bytes, if loaded.
    #[inline]
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            CachedBlock::Loaded(data) => Some(data),
            CachedBlock::NotLoaded => None,
        }
    }

    /// Number of bytes held by the block (zero if not loaded).
    #[inline]
    pub fn len(&self) -> usize {
        self.data().map_or(0, <[u8]>::len)
    }

    /// Check if the block holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if this is a short block, i.e. the one holding the end of the
    /// stream.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_loaded() && self.len() < BLOCK_SIZE
    }
}
