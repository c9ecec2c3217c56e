//! BlockCache domain service - the bookkeeping half of block caching.
//!
//! `BlockCache` decides which block a read needs, stores blocks once they
//! have been filled, and serves bytes out of them. It never touches a
//! stream: the caller fills the block, so a blocking and a suspending read
//! path share everything here and differ only in how the bytes arrive.

use crate::domain::{
    entities::CachedBlock,
    value_objects::{BlockIndex, BLOCK_SIZE},
};

/// Index-addressed, append-only store of stream blocks.
///
/// # Rules
///
/// - A block is filled from the wrapped stream at most once.
/// - The container only grows; there is no eviction.
/// - Only the block holding the end of the stream may be shorter than
///   [`BLOCK_SIZE`].
///
/// # Examples
///
/// ```
/// use stream_wrappers::domain::{BlockCache, BLOCK_SIZE};
///
/// let mut cache = BlockCache::new();
/// let index = cache.missing_block(10).unwrap();
///
/// let mut data = BlockCache::block_buffer();
/// data[10] = 42;
/// cache.install(index, data, BLOCK_SIZE);
///
/// assert!(cache.missing_block(10).is_none());
/// assert_eq!(cache.byte_at(10), Some(42));
/// ```
#[derive(Debug, Default)]
pub struct BlockCache {
    blocks: Vec<CachedBlock>,
}

impl BlockCache {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// A zeroed buffer sized for one block.
    pub fn block_buffer() -> Vec<u8> {
        vec![0u8; BLOCK_SIZE]
    }

    /// Return the block that must be filled before `position` can be served,
    /// or `None` if it is already cached.
    ///
    /// Grows the container with not-loaded slots up to the block that
    /// contains `position`. Positions beyond the addressable range return
    /// `None` and then read as end of stream.
    pub fn missing_block(&mut self, position: u64) -> Option<BlockIndex> {
        let index = BlockIndex::containing(position);
        let slot = Self::slot_of(index)?;

        if self.blocks.len() <= slot {
            self.blocks.resize(slot + 1, CachedBlock::NotLoaded);
        }

        if self.blocks[slot].is_loaded() {
            None
        } else {
            Some(index)
        }
    }

    /// Store a filled block.
    ///
    /// `filled` is the number of bytes actually read into `data`; a short
    /// count marks the terminal block and the buffer is shrunk to fit. An
    /// already-loaded block is never replaced.
    pub fn install(&mut self, index: BlockIndex, mut data: Vec<u8>, filled: usize) {
        let Some(slot) = Self::slot_of(index) else {
            return;
        };

        if self.blocks.len() <= slot {
            self.blocks.resize(slot + 1, CachedBlock::NotLoaded);
        }
        if self.blocks[slot].is_loaded() {
            return;
        }

        if filled < data.len() {
            data.truncate(filled);
            data.shrink_to_fit();
            trace!("block cache: {} is terminal ({} bytes)", index, filled);
        }

        self.blocks[slot] = CachedBlock::Loaded(data);
    }

    /// Copy bytes starting at `position` into `dest`.
    ///
    /// Never crosses a block boundary: the count returned is limited by what
    /// remains of the block containing `position`. Returns 0 if that block is
    /// not loaded or `position` lies past its end.
    pub fn copy_out(&self, position: u64, dest: &mut [u8]) -> usize {
        let Some(data) = self.block_at(position) else {
            return 0;
        };

        let offset = BlockIndex::offset_within(position).min(data.len());
        let count = dest.len().min(data.len() - offset);

        dest[..count].copy_from_slice(&data[offset..offset + count]);
        count
    }

    /// The byte at `position`, or `None` if its block is not loaded or the
    /// position lies past the end of the stream.
    pub fn byte_at(&self, position: u64) -> Option<u8> {
        let data = self.block_at(position)?;
        data.get(BlockIndex::offset_within(position)).copied()
    }

    /// Check if the given block has been loaded.
    pub fn is_loaded(&self, index: BlockIndex) -> bool {
        Self::slot_of(index)
            .and_then(|slot| self.blocks.get(slot))
            .is_some_and(CachedBlock::is_loaded)
    }

    /// Number of blocks that have been loaded.
    pub fn loaded_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_loaded()).count()
    }

    /// Number of slots in the container, loaded or not.
    pub fn capacity(&self) -> usize {
        self.blocks.len()
    }

    /// Release every cached block.
    pub fn clear(&mut self) {
        self.blocks = Vec::new();
    }

    fn block_at(&self, position: u64) -> Option<&[u8]> {
        let slot = Self::slot_of(BlockIndex::containing(position))?;
        self.blocks.get(slot).and_then(CachedBlock::data)
    }

    // Blocks whose index does not fit the address space behave as past the
    // end of the stream.
    fn slot_of(index: BlockIndex) -> Option<usize> {
        usize::try_from(index.value())
            .ok()
            .filter(|slot| *slot < usize::MAX)
    }
}
