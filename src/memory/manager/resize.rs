/*!
 * Resize and Zero-Fill
 * Reallocation and zeroed allocation on top of allocate/release
 */

use super::super::types::{HeapError, HeapResult};
use super::block::{header_of, payload_of};
use super::Heap;
use crate::core::types::{Address, Size, NULL_ADDRESS};
use tracing::{trace, warn};

impl Heap {
    /// Resize the allocation at `address` to hold `new_size` bytes
    ///
    /// A block that already fits is returned unchanged, shrinking included.
    /// Otherwise the payload moves to a new block and the old one is
    /// released. On `OutOfMemory` the original allocation is left as is.
    /// The null address behaves like `allocate`.
    pub fn resize(&mut self, address: Address, new_size: Size) -> HeapResult<Address> {
        if address == NULL_ADDRESS {
            return self.allocate(new_size);
        }

        let block = self.live_block(address)?;
        let old_size = self.arena.block_size(block);
        if new_size <= old_size {
            trace!(address, old_size, new_size, "Resize fits in place");
            return Ok(address);
        }

        let new_address = self.allocate(new_size)?;
        let new_block = header_of(new_address);
        let copied = old_size.min(self.arena.block_size(new_block));
        self.arena
            .copy_within(payload_of(block), payload_of(new_block), copied);
        self.release(address)?;

        trace!(address, new_address, old_size, new_size, "Resized by moving");
        Ok(new_address)
    }

    /// Allocate `count * elem_size` bytes with the whole payload zeroed
    ///
    /// Overflow of the product is rejected before anything is allocated.
    pub fn zero_allocate(&mut self, count: Size, elem_size: Size) -> HeapResult<Address> {
        let Some(total) = count.checked_mul(elem_size) else {
            warn!(count, elem_size, "Zero-allocate size overflow");
            return Err(HeapError::SizeOverflow { count, elem_size });
        };

        let address = self.allocate(total)?;
        let size = self.arena.block_size(header_of(address));
        self.arena.fill(address, size, 0);
        Ok(address)
    }
}
