/*!
 * Heap Limits and Constants
 *
 * Centralized location for the allocator's fixed policy constants.
 * None of these are runtime-configurable; tests use `Heap::with_capacity`
 * to get smaller arenas.
 *
 * ## Conventions
 * - Values are grouped by domain (arena, block layout, size classes, pressure)
 * - Performance-relevant constants are marked with [PERF]
 */

// =============================================================================
// ARENA
// =============================================================================

/// Default arena capacity (1MB)
pub const ARENA_CAPACITY: usize = 1024 * 1024;

/// Payload alignment in bytes
/// Block sizes and header offsets are multiples of this, so every payload is too
pub const ALIGNMENT: usize = 8;

// =============================================================================
// BLOCK LAYOUT
// =============================================================================

/// Width of one header word
pub const WORD_SIZE: usize = 8;

/// Header words: size, flags, prev/next physical, prev/next free
pub const HEADER_WORDS: usize = 6;

/// Block header size (48 bytes)
pub const HEADER_SIZE: usize = HEADER_WORDS * WORD_SIZE;

/// Block footer size: one size word (boundary tag)
pub const FOOTER_SIZE: usize = WORD_SIZE;

/// Per-block metadata overhead
pub const BLOCK_OVERHEAD: usize = HEADER_SIZE + FOOTER_SIZE;

/// Smallest remainder worth splitting off into its own free block
/// Room for a header, a footer and one alignment unit of payload
pub const MIN_FRAGMENT: usize = BLOCK_OVERHEAD + ALIGNMENT;

/// Smallest payload handed out; zero-byte requests are rounded up to this
pub const MIN_PAYLOAD: usize = ALIGNMENT;

/// Smallest arena that can hold one minimal block
pub const MIN_ARENA: usize = BLOCK_OVERHEAD + MIN_PAYLOAD;

// =============================================================================
// SIZE CLASSES
// =============================================================================

/// Upper bounds (inclusive) of the bounded bins; the last bin is unbounded
/// [PERF] Starting the search near the right class bounds the scan cost
pub const BIN_THRESHOLDS: [usize; 5] = [64, 128, 256, 512, 1024];

/// Number of segregated free lists
pub const NUM_BINS: usize = BIN_THRESHOLDS.len() + 1;

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Usage ratio reported as medium pressure
pub const PRESSURE_MEDIUM: f64 = 0.60;

/// Usage ratio reported as high pressure (warn on allocation)
pub const PRESSURE_HIGH: f64 = 0.80;

/// Usage ratio reported as critical pressure
pub const PRESSURE_CRITICAL: f64 = 0.95;
