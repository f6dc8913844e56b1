/*!
 * Coalescing Engine
 * Release with forward and backward boundary-tag merging
 */

use super::super::types::{HeapError, HeapResult};
use super::Heap;
use crate::core::limits::BLOCK_OVERHEAD;
use crate::core::types::{Address, Offset, NULL_ADDRESS};
use tracing::{trace, warn};

impl Heap {
    /// Release the allocation at `address`
    ///
    /// The null address is a no-op. Misuse (`OutOfRange`, `InvalidAddress`,
    /// `DoubleFree`) is logged and returned without touching any state.
    pub fn release(&mut self, address: Address) -> HeapResult<()> {
        if address == NULL_ADDRESS {
            return Ok(());
        }

        let block = self.recover_block(address)?;
        if self.arena.is_free(block) {
            warn!(address, "Double free detected");
            return Err(HeapError::DoubleFree(address));
        }

        let size = self.arena.block_size(block);
        self.arena.set_free(block, true);
        self.tracking.record_release(size);

        let merged = self.coalesce(block);
        self.free_list.insert(&mut self.arena, merged);

        trace!(
            address,
            size,
            merged,
            merged_size = self.arena.block_size(merged),
            "Released block"
        );
        Ok(())
    }

    /// Merge a newly freed block with free physical neighbours
    ///
    /// Forward first, so a backward merge absorbs the already extended size.
    /// Returns the surviving block, not yet on any free list.
    fn coalesce(&mut self, mut block: Offset) -> Offset {
        if let Some(next) = self.arena.next_phys(block) {
            if self.arena.is_free(next) {
                self.free_list.remove(&mut self.arena, next);
                self.absorb_next(block, next);
                trace!(block, absorbed = next, "Coalesced with next block");
            }
        }

        if let Some(prev) = self.arena.prev_phys(block) {
            if self.arena.is_free(prev) {
                self.free_list.remove(&mut self.arena, prev);
                self.absorb_next(prev, block);
                trace!(block = prev, absorbed = block, "Coalesced with previous block");
                block = prev;
            }
        }

        block
    }

    /// Grow `block` over its physical successor `next`
    fn absorb_next(&mut self, block: Offset, next: Offset) {
        let size =
            self.arena.block_size(block) + BLOCK_OVERHEAD + self.arena.block_size(next);
        let after = self.arena.next_phys(next);

        self.block_starts.remove(next);
        self.arena.set_block_size(block, size);
        self.arena.set_next_phys(block, after);
        if let Some(after) = after {
            self.arena.set_prev_phys(after, Some(block));
        }
        self.arena.write_footer(block);
    }
}
