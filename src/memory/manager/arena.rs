/*!
 * Arena
 * The fixed byte region backing every block of a heap
 */

use crate::core::limits::WORD_SIZE;
use crate::core::types::{Offset, Size};

/// Fixed-size backing store addressed by byte offsets
///
/// All header, footer and payload access goes through offset-relative reads
/// and writes; nothing outside the heap ever holds a reference into it.
pub(super) struct Arena {
    bytes: Box<[u8]>,
}

impl Arena {
    pub fn new(capacity: Size) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> Size {
        self.bytes.len()
    }

    pub fn read_word(&self, offset: Offset) -> u64 {
        let mut word = [0u8; WORD_SIZE];
        word.copy_from_slice(&self.bytes[offset..offset + WORD_SIZE]);
        u64::from_le_bytes(word)
    }

    pub fn write_word(&mut self, offset: Offset, value: u64) {
        self.bytes[offset..offset + WORD_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    pub fn slice(&self, offset: Offset, len: Size) -> &[u8] {
        &self.bytes[offset..offset + len]
    }

    pub fn slice_mut(&mut self, offset: Offset, len: Size) -> &mut [u8] {
        &mut self.bytes[offset..offset + len]
    }

    /// Copy `len` bytes from `src` to `dst`; the ranges may overlap
    pub fn copy_within(&mut self, src: Offset, dst: Offset, len: Size) {
        self.bytes.copy_within(src..src + len, dst);
    }

    pub fn fill(&mut self, offset: Offset, len: Size, value: u8) {
        self.bytes[offset..offset + len].fill(value);
    }
}
