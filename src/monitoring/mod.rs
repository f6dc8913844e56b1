/*!
 * Monitoring
 * Structured logging setup and operation spans
 */

mod tracer;

pub use tracer::{init_tracing, span_heap_op, HeapSpan};
