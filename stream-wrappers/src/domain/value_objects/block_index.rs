//! Type-safe block index value object.

use core::fmt;

/// Size in bytes of one cache block.
pub const BLOCK_SIZE: usize = 4096;

/// Index of a fixed-size block of a stream.
///
/// Block `N` covers the stream offsets `N * BLOCK_SIZE .. (N + 1) * BLOCK_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockIndex(u64);

impl BlockIndex {
    /// Create a new block index.
    ///
    /// # Examples
    ///
    /// ```
    /// use stream_wrappers::domain::BlockIndex;
    ///
    /// let block = BlockIndex::new(3);
    /// assert_eq!(block.value(), 3);
    /// ```
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The block containing the given stream offset.
    ///
    /// # Examples
    ///
    /// ```
    /// use stream_wrappers::domain::BlockIndex;
    ///
    /// assert_eq!(BlockIndex::containing(4095).value(), 0);
    /// assert_eq!(BlockIndex::containing(4096).value(), 1);
    /// ```
    #[inline]
    pub const fn containing(offset: u64) -> Self {
        Self(offset / BLOCK_SIZE as u64)
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Stream offset of the first byte of this block.
    #[inline]
    pub const fn start_offset(self) -> u64 {
        self.0 * BLOCK_SIZE as u64
    }

    /// Offset of `offset` relative to the start of its block.
    #[inline]
    pub const fn offset_within(offset: u64) -> usize {
        (offset % BLOCK_SIZE as u64) as usize
    }
}

impl fmt::Display for BlockIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

impl From<u64> for BlockIndex {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<BlockIndex> for u64 {
    fn from(block: BlockIndex) -> Self {
        block.value()
    }
}
