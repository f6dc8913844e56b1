/*!
 * Block Layout
 * Header and footer (boundary tag) access over the arena
 *
 * ```text
 *   block offset b
 *   ┌──────┬───────┬───────────┬───────────┬───────────┬───────────┬─────────────┬────────┐
 *   │ size │ flags │ prev_phys │ next_phys │ prev_free │ next_free │   payload   │ footer │
 *   └──────┴───────┴───────────┴───────────┴───────────┴───────────┴─────────────┴────────┘
 *   b      +8      +16         +24         +32         +40         +48           +48+size
 * ```
 *
 * Links are header offsets, with `NIL` for "none". The footer repeats the
 * size so a block's extent can be checked from either end.
 */

use super::arena::Arena;
use crate::core::limits::{ALIGNMENT, FOOTER_SIZE, HEADER_SIZE, WORD_SIZE};
use crate::core::types::{Address, Offset, Size};

const SIZE_FIELD: usize = 0;
const FLAGS_FIELD: usize = WORD_SIZE;
const PREV_PHYS_FIELD: usize = 2 * WORD_SIZE;
const NEXT_PHYS_FIELD: usize = 3 * WORD_SIZE;
const PREV_FREE_FIELD: usize = 4 * WORD_SIZE;
const NEXT_FREE_FIELD: usize = 5 * WORD_SIZE;

const FLAG_FREE: u64 = 1;
const NIL: u64 = u64::MAX;

fn encode(link: Option<Offset>) -> u64 {
    link.map_or(NIL, |offset| offset as u64)
}

fn decode(word: u64) -> Option<Offset> {
    (word != NIL).then_some(word as Offset)
}

/// Payload address of the block whose header sits at `block`
#[inline]
pub(super) fn payload_of(block: Offset) -> Address {
    block + HEADER_SIZE
}

/// Header offset of the block owning payload `address`
#[inline]
pub(super) fn header_of(address: Address) -> Offset {
    address - HEADER_SIZE
}

/// Offset one past the footer of a block with the given payload size
#[inline]
pub(super) fn block_end(block: Offset, size: Size) -> Offset {
    block + HEADER_SIZE + size + FOOTER_SIZE
}

/// Offsets where a block header currently begins, one bit per alignment unit
///
/// Headers are only trusted when their offset is recorded here; bytes that
/// merely look like a header inside some payload are never followed.
#[derive(Debug)]
pub(super) struct BlockStarts {
    words: Vec<u64>,
}

impl BlockStarts {
    pub fn new(capacity: Size) -> Self {
        Self {
            words: vec![0; (capacity / ALIGNMENT).div_ceil(64)],
        }
    }

    fn slot(block: Offset) -> (usize, u64) {
        let unit = block / ALIGNMENT;
        (unit / 64, 1 << (unit % 64))
    }

    pub fn insert(&mut self, block: Offset) {
        let (word, bit) = Self::slot(block);
        self.words[word] |= bit;
    }

    pub fn remove(&mut self, block: Offset) {
        let (word, bit) = Self::slot(block);
        self.words[word] &= !bit;
    }

    pub fn contains(&self, block: Offset) -> bool {
        if block % ALIGNMENT != 0 {
            return false;
        }
        let (word, bit) = Self::slot(block);
        self.words.get(word).is_some_and(|w| w & bit != 0)
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl Arena {
    /// Lay down a fresh header (free links cleared) and matching footer
    pub fn write_block(
        &mut self,
        block: Offset,
        size: Size,
        free: bool,
        prev_phys: Option<Offset>,
        next_phys: Option<Offset>,
    ) {
        self.set_block_size(block, size);
        self.set_free(block, free);
        self.set_prev_phys(block, prev_phys);
        self.set_next_phys(block, next_phys);
        self.set_prev_free(block, None);
        self.set_next_free(block, None);
        self.write_footer(block);
    }

    pub fn block_size(&self, block: Offset) -> Size {
        self.read_word(block + SIZE_FIELD) as Size
    }

    /// Update the header size only; callers refresh the footer afterwards
    pub fn set_block_size(&mut self, block: Offset, size: Size) {
        self.write_word(block + SIZE_FIELD, size as u64);
    }

    pub fn flags(&self, block: Offset) -> u64 {
        self.read_word(block + FLAGS_FIELD)
    }

    pub fn is_free(&self, block: Offset) -> bool {
        self.flags(block) & FLAG_FREE != 0
    }

    pub fn set_free(&mut self, block: Offset, free: bool) {
        self.write_word(block + FLAGS_FIELD, if free { FLAG_FREE } else { 0 });
    }

    pub fn prev_phys(&self, block: Offset) -> Option<Offset> {
        decode(self.read_word(block + PREV_PHYS_FIELD))
    }

    pub fn set_prev_phys(&mut self, block: Offset, link: Option<Offset>) {
        self.write_word(block + PREV_PHYS_FIELD, encode(link));
    }

    pub fn next_phys(&self, block: Offset) -> Option<Offset> {
        decode(self.read_word(block + NEXT_PHYS_FIELD))
    }

    pub fn set_next_phys(&mut self, block: Offset, link: Option<Offset>) {
        self.write_word(block + NEXT_PHYS_FIELD, encode(link));
    }

    pub fn prev_free(&self, block: Offset) -> Option<Offset> {
        decode(self.read_word(block + PREV_FREE_FIELD))
    }

    pub fn set_prev_free(&mut self, block: Offset, link: Option<Offset>) {
        self.write_word(block + PREV_FREE_FIELD, encode(link));
    }

    pub fn next_free(&self, block: Offset) -> Option<Offset> {
        decode(self.read_word(block + NEXT_FREE_FIELD))
    }

    pub fn set_next_free(&mut self, block: Offset, link: Option<Offset>) {
        self.write_word(block + NEXT_FREE_FIELD, encode(link));
    }

    pub fn footer_offset(&self, block: Offset) -> Offset {
        block + HEADER_SIZE + self.block_size(block)
    }

    pub fn read_footer(&self, block: Offset) -> Size {
        self.read_word(self.footer_offset(block)) as Size
    }

    pub fn write_footer(&mut self, block: Offset) {
        let size = self.block_size(block);
        let footer = self.footer_offset(block);
        self.write_word(footer, size as u64);
    }
}
