/*!
 * Payload Storage Operations
 * Read/write access to allocated payload bytes
 */

use super::super::types::{HeapError, HeapResult};
use super::block::header_of;
use super::Heap;
use crate::core::limits::{ALIGNMENT, HEADER_SIZE};
use crate::core::types::{Address, Offset, Size};
use tracing::warn;

impl Heap {
    /// Full payload of a live allocation (its recorded size, not the request)
    pub fn payload(&self, address: Address) -> HeapResult<&[u8]> {
        let block = self.live_block(address)?;
        let size = self.arena.block_size(block);
        Ok(self.arena.slice(address, size))
    }

    /// Mutable payload of a live allocation
    ///
    /// Block metadata lies outside the returned slice.
    pub fn payload_mut(&mut self, address: Address) -> HeapResult<&mut [u8]> {
        let block = self.live_block(address)?;
        let size = self.arena.block_size(block);
        Ok(self.arena.slice_mut(address, size))
    }

    /// Write `data` at the start of a live allocation
    pub fn write_bytes(&mut self, address: Address, data: &[u8]) -> HeapResult<()> {
        let payload = self.payload_mut(address)?;
        if data.len() > payload.len() {
            warn!(
                address,
                len = data.len(),
                capacity = payload.len(),
                "Write exceeds block payload"
            );
            return Err(HeapError::InvalidAddress(address));
        }
        payload[..data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Read `size` bytes from the start of a live allocation
    pub fn read_bytes(&self, address: Address, size: Size) -> HeapResult<Vec<u8>> {
        let payload = self.payload(address)?;
        match payload.get(..size) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => {
                warn!(
                    address,
                    len = size,
                    capacity = payload.len(),
                    "Read exceeds block payload"
                );
                Err(HeapError::InvalidAddress(address))
            }
        }
    }

    /// Check if an address is a live allocation
    pub fn is_valid(&self, address: Address) -> bool {
        self.live_block_quiet(address).is_some()
    }

    /// Recorded payload size of a live allocation
    pub fn block_size(&self, address: Address) -> Option<Size> {
        self.live_block_quiet(address)
            .map(|block| self.arena.block_size(block))
    }

    /// `live_block` for queries, where a miss is an answer rather than misuse
    fn live_block_quiet(&self, address: Address) -> Option<Offset> {
        if !self.initialized
            || address < HEADER_SIZE
            || address >= self.arena.capacity()
            || address % ALIGNMENT != 0
        {
            return None;
        }
        let block = header_of(address);
        (self.block_starts.contains(block) && !self.arena.is_free(block)).then_some(block)
    }
}
