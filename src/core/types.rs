/*!
 * Core Types
 * Common scalar types used across the heap
 */

/// Payload address: byte offset of a payload from the arena base
pub type Address = usize;

/// Byte offset of a block header inside the arena
pub type Offset = usize;

/// Size type for memory operations
pub type Size = usize;

/// Bin (size class) index
pub type BinIndex = usize;

/// The null payload address.
///
/// Every payload sits behind a block header, so offset 0 never names a payload.
pub const NULL_ADDRESS: Address = 0;
