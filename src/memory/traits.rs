/*!
 * Memory Traits
 * Heap management abstractions
 */

use super::types::*;
use crate::core::types::{Address, Size};

/// Allocator interface for heaps shared across threads
pub trait Allocator: Send + Sync {
    /// Allocate `size` bytes, returning the payload address
    fn allocate(&self, size: Size) -> HeapResult<Address>;

    /// Release an allocation; the null address is a no-op
    fn deallocate(&self, address: Address) -> HeapResult<()>;

    /// Grow or keep an allocation; the original stays valid on failure
    fn reallocate(&self, address: Address, new_size: Size) -> HeapResult<Address>;

    /// Allocate `count * elem_size` zeroed bytes
    fn zero_allocate(&self, count: Size, elem_size: Size) -> HeapResult<Address>;

    /// Check if an address is a live allocation
    fn is_valid(&self, address: Address) -> bool;

    /// Get the recorded payload size of a live allocation
    fn block_size(&self, address: Address) -> Option<Size>;
}

/// Heap statistics and diagnostics provider
pub trait HeapInfo: Send + Sync {
    /// Get overall heap statistics
    fn stats(&self) -> HeapStats;

    /// Textual per-bin listing of free block sizes
    fn dump_state(&self) -> String;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
