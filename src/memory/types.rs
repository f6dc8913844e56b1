/*!
 * Memory Types
 * Common types for heap management
 */

use crate::core::limits::{PRESSURE_CRITICAL, PRESSURE_HIGH, PRESSURE_MEDIUM};
use crate::core::types::{Address, Offset, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Heap operation result
pub type HeapResult<T> = Result<T, HeapError>;

/// Heap errors
///
/// Every variant is reported to the caller; none of them leave the heap unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeapError {
    #[error("Out of memory: requested {requested} bytes, largest free block {largest_free} bytes")]
    OutOfMemory { requested: usize, largest_free: usize },

    #[error("Address 0x{address:x} is outside the arena (capacity {capacity} bytes)")]
    OutOfRange { address: usize, capacity: usize },

    #[error("Double free of address 0x{0:x}")]
    DoubleFree(usize),

    #[error("Size overflow: {count} elements of {elem_size} bytes")]
    SizeOverflow { count: usize, elem_size: usize },

    #[error("Invalid heap address: 0x{0:x}")]
    InvalidAddress(usize),

    #[error("Heap corruption detected at block 0x{offset:x}: {reason}")]
    CorruptionDetected { offset: usize, reason: String },

    #[error("Arena capacity {capacity} bytes is below the minimum of {minimum} bytes")]
    CapacityTooSmall { capacity: usize, minimum: usize },
}

/// Snapshot of one block from a physical-order walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Header offset
    pub offset: Offset,
    /// Payload address
    pub address: Address,
    /// Payload size
    pub size: Size,
    pub free: bool,
}

/// Heap statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeapStats {
    pub capacity: usize,
    pub used_bytes: usize,
    pub free_bytes: usize,
    pub used_blocks: usize,
    pub free_blocks: usize,
    pub largest_free: usize,
    pub bin_counts: Vec<usize>,
    pub allocation_count: u64,
    pub release_count: u64,
    pub peak_used_bytes: usize,
    pub usage_percentage: f64,
}

impl HeapStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }

    /// Free bytes not usable by the largest single request
    pub fn fragmented_bytes(&self) -> usize {
        self.free_bytes - self.largest_free
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= PRESSURE_CRITICAL {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
