/*!
 * Segregated Free List
 * Per-size-class intrusive doubly-linked lists of free blocks
 */

use super::arena::Arena;
use super::size_class::size_to_bin;
use crate::core::limits::NUM_BINS;
use crate::core::types::{BinIndex, Offset, Size};

/// Bin heads; the links themselves live in the free blocks' headers
///
/// - Insertion prepends, so each list is newest-freed-first
/// - Insert and remove are O(1)
/// - Search starts at the request's own bin and only moves to larger ones,
///   since every block in a smaller bin is too small by construction
#[derive(Debug)]
pub(super) struct SegregatedFreeList {
    heads: [Option<Offset>; NUM_BINS],
}

impl SegregatedFreeList {
    pub fn new() -> Self {
        Self {
            heads: [None; NUM_BINS],
        }
    }

    pub fn clear(&mut self) {
        self.heads = [None; NUM_BINS];
    }

    pub fn head(&self, bin: BinIndex) -> Option<Offset> {
        self.heads[bin]
    }

    /// Prepend a free block to the bin matching its size
    pub fn insert(&mut self, arena: &mut Arena, block: Offset) {
        let bin = size_to_bin(arena.block_size(block));
        let old_head = self.heads[bin];

        arena.set_prev_free(block, None);
        arena.set_next_free(block, old_head);
        if let Some(head) = old_head {
            arena.set_prev_free(head, Some(block));
        }
        self.heads[bin] = Some(block);
    }

    /// Unlink a free block from its bin
    ///
    /// The block must still carry the size it was inserted with.
    pub fn remove(&mut self, arena: &mut Arena, block: Offset) {
        debug_assert!(arena.is_free(block), "removing a used block from a free list");

        let bin = size_to_bin(arena.block_size(block));
        let prev = arena.prev_free(block);
        let next = arena.next_free(block);

        match prev {
            Some(prev) => arena.set_next_free(prev, next),
            None => self.heads[bin] = next,
        }
        if let Some(next) = next {
            arena.set_prev_free(next, prev);
        }

        arena.set_prev_free(block, None);
        arena.set_next_free(block, None);
    }

    /// First block of at least `size` bytes, scanning bins upward
    pub fn find_first_fit(&self, arena: &Arena, size: Size) -> Option<Offset> {
        (size_to_bin(size)..NUM_BINS)
            .flat_map(|bin| self.iter_bin(arena, bin))
            .find(|&block| arena.block_size(block) >= size)
    }

    /// Walk one bin in list order
    pub fn iter_bin<'a>(&self, arena: &'a Arena, bin: BinIndex) -> BinIter<'a> {
        BinIter {
            arena,
            current: self.heads[bin],
        }
    }

    #[cfg(test)]
    pub fn len(&self, arena: &Arena) -> usize {
        (0..NUM_BINS).map(|bin| self.iter_bin(arena, bin).count()).sum()
    }
}

/// Iterator over the block offsets of one bin
pub(super) struct BinIter<'a> {
    arena: &'a Arena,
    current: Option<Offset>,
}

impl Iterator for BinIter<'_> {
    type Item = Offset;

    fn next(&mut self) -> Option<Offset> {
        let block = self.current?;
        self.current = self.arena.next_free(block);
        Some(block)
    }
}
