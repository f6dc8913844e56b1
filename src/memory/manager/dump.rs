/*!
 * Heap Diagnostics
 * Read-only free-list dump, physical walk and statistics
 */

use super::super::types::{BlockInfo, HeapStats};
use super::block::payload_of;
use super::Heap;
use crate::core::limits::NUM_BINS;
use crate::core::types::Size;

impl Heap {
    /// Per-bin listing of free block sizes in free-list order
    ///
    /// Every bin line keeps the space after the colon, empty bins included.
    ///
    /// ```text
    /// === Heap bins ===
    /// Bin[0]: [8]
    /// Bin[1]: 
    /// Bin[2]: [240]->[136]
    /// ...
    /// ```
    pub fn dump_state(&self) -> String {
        let mut out = String::from("=== Heap bins ===\n");
        for (index, sizes) in self.bins().iter().enumerate() {
            let entries: Vec<String> = sizes.iter().map(|size| format!("[{}]", size)).collect();
            out.push_str(&format!("Bin[{}]: {}\n", index, entries.join("->")));
        }
        out
    }

    /// Free block sizes per bin, in list order
    pub fn bins(&self) -> Vec<Vec<Size>> {
        (0..NUM_BINS)
            .map(|bin| {
                self.free_list
                    .iter_bin(&self.arena, bin)
                    .map(|block| self.arena.block_size(block))
                    .collect()
            })
            .collect()
    }

    /// Every block in address order; empty before initialization
    pub fn blocks(&self) -> Vec<BlockInfo> {
        let mut blocks = Vec::new();
        let mut current = self.initialized.then_some(0);
        while let Some(block) = current {
            blocks.push(BlockInfo {
                offset: block,
                address: payload_of(block),
                size: self.arena.block_size(block),
                free: self.arena.is_free(block),
            });
            current = self.arena.next_phys(block);
        }
        blocks
    }

    /// Get heap statistics
    pub fn stats(&self) -> HeapStats {
        let blocks = self.blocks();
        let (free, used): (Vec<&BlockInfo>, Vec<&BlockInfo>) =
            blocks.iter().partition(|block| block.free);
        let used_bytes: Size = used.iter().map(|block| block.size).sum();
        let capacity = self.arena.capacity();

        HeapStats {
            capacity,
            used_bytes,
            free_bytes: free.iter().map(|block| block.size).sum(),
            used_blocks: used.len(),
            free_blocks: free.len(),
            largest_free: free.iter().map(|block| block.size).max().unwrap_or(0),
            bin_counts: self.bins().iter().map(Vec::len).collect(),
            allocation_count: self.tracking.allocation_count,
            release_count: self.tracking.release_count,
            peak_used_bytes: self.tracking.peak_used_bytes,
            usage_percentage: used_bytes as f64 / capacity as f64 * 100.0,
        }
    }
}
