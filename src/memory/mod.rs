/*!
 * Memory Module
 * Segregated-fit heap over a fixed arena
 */

pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::{Heap, SharedHeap};
pub use traits::*;
pub use types::*;
