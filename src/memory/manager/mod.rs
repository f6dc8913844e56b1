/*!
 * Heap Management
 *
 * Segregated-fit allocator over a single fixed arena.
 *
 * ## Layout
 *
 * Every block, free or used, carries a 48-byte header and an 8-byte footer
 * repeating its payload size (boundary tag). Blocks tile the arena in
 * address order and are chained through `prev_phys`/`next_phys`.
 *
 * ## Size classes
 *
 * Free blocks sit in one of six bins: <=64, <=128, <=256, <=512, <=1024
 * and >1024 bytes. Each bin is an intrusive doubly-linked list whose links
 * live in the free blocks' own headers.
 *
 * ## Operations
 *
 * - **Allocate**: first fit, scanning from the request's bin upward;
 *   oversized blocks are split when the tail can hold a minimal block
 * - **Release**: forward then backward coalescing, so no two physically
 *   adjacent blocks are ever both free between calls
 * - **Resize**: in place when the block is already big enough, otherwise
 *   allocate-copy-release
 * - **Zero allocate**: overflow-checked `count * elem_size`, zero-filled
 *
 * Addresses are payload offsets from the arena base. The heap is
 * single-threaded; `SharedHeap` wraps it in one coarse lock.
 */

mod allocator;
mod arena;
mod block;
mod coalesce;
mod dump;
mod free_list;
mod integrity;
mod resize;
mod shared;
mod size_class;
mod storage;
mod tracking;

pub use shared::SharedHeap;
pub use size_class::{bin_range, size_to_bin};

use super::types::{HeapError, HeapResult};
use crate::core::limits::{
    ALIGNMENT, ARENA_CAPACITY, BLOCK_OVERHEAD, HEADER_SIZE, MIN_ARENA, NUM_BINS,
};
use crate::core::types::{Address, Offset, Size};
use arena::Arena;
use block::{block_end, header_of, BlockStarts};
use free_list::SegregatedFreeList;
use tracing::{info, warn};
use tracking::HeapTracking;

/// Heap over a fixed arena
pub struct Heap {
    arena: Arena,
    free_list: SegregatedFreeList,
    block_starts: BlockStarts,
    initialized: bool,
    tracking: HeapTracking,
}

impl Heap {
    /// Heap with the default 1MB arena
    pub fn new() -> Self {
        Self::from_arena(Arena::new(ARENA_CAPACITY))
    }

    /// Create a heap with a custom arena size (useful for testing)
    ///
    /// The capacity is rounded down to the alignment.
    pub fn with_capacity(capacity: Size) -> HeapResult<Self> {
        let capacity = capacity & !(ALIGNMENT - 1);
        if capacity < MIN_ARENA {
            return Err(HeapError::CapacityTooSmall {
                capacity,
                minimum: MIN_ARENA,
            });
        }
        Ok(Self::from_arena(Arena::new(capacity)))
    }

    fn from_arena(arena: Arena) -> Self {
        Self {
            block_starts: BlockStarts::new(arena.capacity()),
            arena,
            free_list: SegregatedFreeList::new(),
            initialized: false,
            tracking: HeapTracking::default(),
        }
    }

    /// Lay out a single free block spanning the arena
    ///
    /// Idempotent; `allocate` calls it on first use.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }

        let size = self.arena.capacity() - BLOCK_OVERHEAD;
        self.arena.write_block(0, size, true, None, None);
        self.block_starts.clear();
        self.block_starts.insert(0);
        self.free_list.clear();
        self.free_list.insert(&mut self.arena, 0);
        self.initialized = true;

        info!(
            capacity = self.arena.capacity(),
            initial_block = size,
            "Heap arena initialized with one free block"
        );
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn capacity(&self) -> Size {
        self.arena.capacity()
    }

    /// Resolve a payload address to its block header
    ///
    /// Rejects addresses outside the arena, misaligned addresses, and
    /// addresses that do not sit right after a recorded block start. An
    /// address inside an already-free block (typically a payload that was
    /// released and then merged into a neighbour) reports `DoubleFree`.
    pub(super) fn recover_block(&self, address: Address) -> HeapResult<Offset> {
        let capacity = self.arena.capacity();
        if address < HEADER_SIZE || address >= capacity {
            warn!(address, capacity, "Address outside the heap arena");
            return Err(HeapError::OutOfRange { address, capacity });
        }
        if !self.initialized || address % ALIGNMENT != 0 {
            warn!(address, "Address does not name a heap block");
            return Err(HeapError::InvalidAddress(address));
        }

        let block = header_of(address);
        if self.block_starts.contains(block) {
            return Ok(block);
        }

        match self.containing_block(address) {
            Some(owner) if self.arena.is_free(owner) => {
                warn!(address, block = owner, "Address lies inside a free block");
                Err(HeapError::DoubleFree(address))
            }
            _ => {
                warn!(address, "Address does not name a heap block");
                Err(HeapError::InvalidAddress(address))
            }
        }
    }

    /// Block whose extent (header to footer) contains `address`
    pub(super) fn containing_block(&self, address: Address) -> Option<Offset> {
        if !self.initialized {
            return None;
        }
        let mut current = Some(0);
        while let Some(block) = current {
            let end = block_end(block, self.arena.block_size(block));
            if address < end {
                return Some(block);
            }
            current = self.arena.next_phys(block);
        }
        None
    }

    /// Resolve an address that must name a live allocation
    pub(super) fn live_block(&self, address: Address) -> HeapResult<Offset> {
        let block = self.recover_block(address)?;
        if self.arena.is_free(block) {
            warn!(address, "Address names a free block");
            return Err(HeapError::InvalidAddress(address));
        }
        Ok(block)
    }

    /// Largest free payload currently available
    pub(super) fn largest_free(&self) -> Size {
        (0..NUM_BINS)
            .flat_map(|bin| self.free_list.iter_bin(&self.arena, bin))
            .map(|block| self.arena.block_size(block))
            .max()
            .unwrap_or(0)
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Heap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Heap")
            .field("capacity", &self.arena.capacity())
            .field("initialized", &self.initialized)
            .field("free_list", &self.free_list)
            .field("blocks", &self.block_starts.len())
            .field("tracking", &self.tracking)
            .finish()
    }
}
