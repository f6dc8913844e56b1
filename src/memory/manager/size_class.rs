/*!
 * Size-Class Index
 * Maps a payload size to one of the segregated bins
 */

use crate::core::limits::{BIN_THRESHOLDS, NUM_BINS};
use crate::core::types::{BinIndex, Size};

/// Bin for a block or request of `size` bytes
///
/// Monotonic step function over the thresholds; anything above the last
/// threshold lands in the unbounded final bin.
pub fn size_to_bin(size: Size) -> BinIndex {
    BIN_THRESHOLDS
        .iter()
        .position(|&limit| size <= limit)
        .unwrap_or(NUM_BINS - 1)
}

/// Inclusive size range held by a bin
pub fn bin_range(bin: BinIndex) -> (Size, Size) {
    let low = match bin {
        0 => 0,
        _ => BIN_THRESHOLDS[bin - 1] + 1,
    };
    let high = BIN_THRESHOLDS.get(bin).copied().unwrap_or(Size::MAX);
    (low, high)
}
