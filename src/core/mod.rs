/*!
 * Core Module
 * Fundamental heap types and policy constants
 */

pub mod limits;
pub mod types;

// Re-export for convenience
pub use types::*;
