/*!
 * Heap Integrity Checks
 * Full consistency walk over the physical chain and the bins
 */

use super::super::types::{HeapError, HeapResult};
use super::block::block_end;
use super::size_class::{bin_range, size_to_bin};
use super::Heap;
use crate::core::limits::{ALIGNMENT, BLOCK_OVERHEAD, NUM_BINS};
use crate::core::types::Offset;
use std::collections::HashSet;

fn corruption(offset: Offset, reason: impl Into<String>) -> HeapError {
    HeapError::CorruptionDetected {
        offset,
        reason: reason.into(),
    }
}

impl Heap {
    /// Verify every structural invariant of the heap
    ///
    /// - header size equals footer size for every block
    /// - physical links are mutual, contiguous and tile the whole arena
    /// - no two physically adjacent blocks are both free
    /// - the recorded block starts are exactly the walked headers
    /// - every free block sits in exactly the bin for its size, and every
    ///   bin entry is free with consistent back links
    pub fn check_integrity(&self) -> HeapResult<()> {
        if !self.initialized {
            return match (0..NUM_BINS).find_map(|bin| self.free_list.head(bin)) {
                Some(block) => Err(corruption(block, "bin populated before initialization")),
                None => Ok(()),
            };
        }

        let capacity = self.arena.capacity();
        let mut free_blocks = HashSet::new();
        let mut prev: Option<Offset> = None;
        let mut prev_free = false;
        let mut current = Some(0);
        let mut expected = 0;
        let mut walked = 0;

        while let Some(block) = current {
            if block != expected {
                return Err(corruption(block, format!("expected block at 0x{:x}", expected)));
            }
            if block + BLOCK_OVERHEAD > capacity {
                return Err(corruption(block, "header runs past the arena"));
            }
            let size = self.arena.block_size(block);
            if size % ALIGNMENT != 0 || block_end(block, size) > capacity {
                return Err(corruption(block, format!("bad size {}", size)));
            }
            let footer = self.arena.read_footer(block);
            if footer != size {
                return Err(corruption(
                    block,
                    format!("header size {} != footer size {}", size, footer),
                ));
            }
            if !self.block_starts.contains(block) {
                return Err(corruption(block, "block start not recorded"));
            }
            walked += 1;
            if self.arena.prev_phys(block) != prev {
                return Err(corruption(block, "previous physical link mismatch"));
            }

            let free = self.arena.is_free(block);
            if free && prev_free {
                return Err(corruption(block, "adjacent free blocks"));
            }
            if free {
                free_blocks.insert(block);
            }

            prev = Some(block);
            prev_free = free;
            expected = block_end(block, size);
            current = self.arena.next_phys(block);
        }

        if expected != capacity {
            return Err(corruption(expected, "blocks do not cover the arena"));
        }
        if walked != self.block_starts.len() {
            return Err(corruption(
                0,
                format!("{} blocks but {} starts recorded", walked, self.block_starts.len()),
            ));
        }

        let mut listed = 0;
        for bin in 0..NUM_BINS {
            let (low, high) = bin_range(bin);
            let mut back: Option<Offset> = None;
            for block in self.free_list.iter_bin(&self.arena, bin) {
                if !free_blocks.contains(&block) {
                    return Err(corruption(block, format!("bin {} holds a non-free block", bin)));
                }
                let size = self.arena.block_size(block);
                if size < low || size > high || size_to_bin(size) != bin {
                    return Err(corruption(block, format!("size {} filed in bin {}", size, bin)));
                }
                if self.arena.prev_free(block) != back {
                    return Err(corruption(block, "free-list back link mismatch"));
                }
                back = Some(block);
                listed += 1;
                if listed > free_blocks.len() {
                    return Err(corruption(block, "free list cycle"));
                }
            }
        }

        if listed != free_blocks.len() {
            return Err(corruption(
                0,
                format!("{} free blocks but {} listed", free_blocks.len(), listed),
            ));
        }
        Ok(())
    }
}
