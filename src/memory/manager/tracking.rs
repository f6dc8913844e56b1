/*!
 * Heap Usage Tracking
 * Running counters behind `Heap::stats`
 */

use crate::core::types::Size;

/// Live payload bytes plus lifetime counters
#[derive(Debug, Clone, Default)]
pub(super) struct HeapTracking {
    pub used_bytes: Size,
    pub peak_used_bytes: Size,
    pub allocation_count: u64,
    pub release_count: u64,
}

impl HeapTracking {
    pub fn record_allocation(&mut self, size: Size) {
        self.used_bytes += size;
        self.allocation_count += 1;
        self.peak_used_bytes = self.peak_used_bytes.max(self.used_bytes);
    }

    pub fn record_release(&mut self, size: Size) {
        self.used_bytes = self.used_bytes.saturating_sub(size);
        self.release_count += 1;
    }
}
