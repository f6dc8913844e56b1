/*!
 * Shared Heap
 * Coarse-locked handle for using one heap from several threads
 */

use super::super::traits::{Allocator, HeapInfo};
use super::super::types::{HeapResult, HeapStats};
use super::Heap;
use crate::core::types::{Address, Size};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to a heap behind a single mutex
///
/// Every entry point takes the same lock: coalescing touches free lists of
/// several bins and the physical chain at once, so per-bin locks would need
/// a lock order across bins.
#[derive(Clone)]
pub struct SharedHeap {
    inner: Arc<Mutex<Heap>>,
}

impl SharedHeap {
    pub fn new(heap: Heap) -> Self {
        Self {
            inner: Arc::new(Mutex::new(heap)),
        }
    }

    pub fn initialize(&self) {
        self.inner.lock().initialize();
    }

    pub fn write_bytes(&self, address: Address, data: &[u8]) -> HeapResult<()> {
        self.inner.lock().write_bytes(address, data)
    }

    pub fn read_bytes(&self, address: Address, size: Size) -> HeapResult<Vec<u8>> {
        self.inner.lock().read_bytes(address, size)
    }

    pub fn check_integrity(&self) -> HeapResult<()> {
        self.inner.lock().check_integrity()
    }

    /// Run `f` with exclusive access to the heap
    pub fn with_heap<R>(&self, f: impl FnOnce(&mut Heap) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl Default for SharedHeap {
    fn default() -> Self {
        Self::new(Heap::new())
    }
}

impl Allocator for SharedHeap {
    fn allocate(&self, size: Size) -> HeapResult<Address> {
        self.inner.lock().allocate(size)
    }

    fn deallocate(&self, address: Address) -> HeapResult<()> {
        self.inner.lock().release(address)
    }

    fn reallocate(&self, address: Address, new_size: Size) -> HeapResult<Address> {
        self.inner.lock().resize(address, new_size)
    }

    fn zero_allocate(&self, count: Size, elem_size: Size) -> HeapResult<Address> {
        self.inner.lock().zero_allocate(count, elem_size)
    }

    fn is_valid(&self, address: Address) -> bool {
        self.inner.lock().is_valid(address)
    }

    fn block_size(&self, address: Address) -> Option<Size> {
        self.inner.lock().block_size(address)
    }
}

impl HeapInfo for SharedHeap {
    fn stats(&self) -> HeapStats {
        self.inner.lock().stats()
    }

    fn dump_state(&self) -> String {
        self.inner.lock().dump_state()
    }
}
