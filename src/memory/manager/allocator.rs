/*!
 * Allocation Engine
 * First fit over segregated bins, with block splitting
 */

use super::super::types::{HeapError, HeapResult, MemoryPressure};
use super::block::{block_end, payload_of};
use super::Heap;
use crate::core::limits::{ALIGNMENT, BLOCK_OVERHEAD, MIN_FRAGMENT, MIN_PAYLOAD};
use crate::core::types::{Address, Offset, Size};
use tracing::{trace, warn};

/// Round a request up to the alignment, treating zero as one minimal unit
///
/// `None` when rounding would overflow.
pub(super) fn align_request(size: Size) -> Option<Size> {
    size.max(MIN_PAYLOAD)
        .checked_add(ALIGNMENT - 1)
        .map(|padded| padded & !(ALIGNMENT - 1))
}

impl Heap {
    /// Allocate `requested` bytes and return the payload address
    ///
    /// Initializes the arena on first use. Fails with `OutOfMemory` when no
    /// free block is large enough; existing allocations are untouched.
    pub fn allocate(&mut self, requested: Size) -> HeapResult<Address> {
        self.initialize();

        let Some(size) = align_request(requested) else {
            warn!(requested, "Allocation size overflows alignment");
            return Err(HeapError::OutOfMemory {
                requested,
                largest_free: self.largest_free(),
            });
        };

        let Some(block) = self.free_list.find_first_fit(&self.arena, size) else {
            let largest_free = self.largest_free();
            warn!(
                requested,
                aligned = size,
                largest_free,
                "OOM: no free block large enough"
            );
            return Err(HeapError::OutOfMemory {
                requested,
                largest_free,
            });
        };

        self.free_list.remove(&mut self.arena, block);
        self.split_block(block, size);
        self.arena.set_free(block, false);
        self.arena.write_footer(block);

        let granted = self.arena.block_size(block);
        self.tracking.record_allocation(granted);

        let address = payload_of(block);
        trace!(requested, granted, address, "Allocated block");
        self.warn_on_pressure(granted, address);

        Ok(address)
    }

    /// Carve `size` bytes off the front of `block`, freeing the tail
    ///
    /// The tail must be able to hold a minimal block; otherwise the whole
    /// block is handed out and the slack stays as internal fragmentation.
    fn split_block(&mut self, block: Offset, size: Size) {
        let current = self.arena.block_size(block);
        let remaining = current - size;
        if remaining < MIN_FRAGMENT {
            return;
        }

        let tail = block_end(block, size);
        let tail_size = remaining - BLOCK_OVERHEAD;
        let next = self.arena.next_phys(block);

        self.arena
            .write_block(tail, tail_size, true, Some(block), next);
        if let Some(next) = next {
            self.arena.set_prev_phys(next, Some(tail));
        }
        self.arena.set_next_phys(block, Some(tail));
        self.block_starts.insert(tail);
        self.arena.set_block_size(block, size);
        self.arena.write_footer(block);
        self.free_list.insert(&mut self.arena, tail);

        trace!(block, size, tail, tail_size, "Split block");
    }

    fn warn_on_pressure(&self, granted: Size, address: Address) {
        let used = self.tracking.used_bytes;
        let ratio = used as f64 / self.arena.capacity() as f64;
        let level = MemoryPressure::from_ratio(ratio);
        if level >= MemoryPressure::High {
            warn!(
                "Memory pressure {}: allocated {} bytes at 0x{:x} ({:.1}% used: {} / {})",
                level,
                granted,
                address,
                ratio * 100.0,
                used,
                self.arena.capacity()
            );
        }
    }
}
