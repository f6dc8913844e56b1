/*!
 * segheap
 * Segregated-fit heap allocator over a fixed byte arena
 *
 * ```text
 *   arena (1MB)
 *   ┌────────────┬───────────┬──────────────────────┬──────────────────────┐
 *   │ used 64    │ free 128  │ used 300             │ free (rest)          │
 *   └────────────┴───────────┴──────────────────────┴──────────────────────┘
 *                     │                                   │
 *   bins:  [<=64] [<=128] ◄┘ [<=256] [<=512] [<=1024] [>1024] ◄┘
 * ```
 *
 * Blocks carry a header and a boundary-tag footer; free blocks are kept
 * in six size-class lists, released blocks are coalesced with free
 * neighbours immediately.
 */

pub mod core;
pub mod memory;
pub mod monitoring;

// Re-exports
pub use crate::core::limits;
pub use crate::core::types::{Address, Size, NULL_ADDRESS};
pub use memory::{
    Allocator, BlockInfo, Heap, HeapError, HeapInfo, HeapResult, HeapStats, MemoryPressure,
    SharedHeap,
};
pub use monitoring::{init_tracing, span_heap_op};
