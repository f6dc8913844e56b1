/*!
 * Tracing Setup
 * Structured logging for the heap using the tracing crate
 *
 * Features:
 * - `RUST_LOG` driven filtering (default: info)
 * - JSON-formatted logs for structured parsing
 * - Timed spans around heap operations
 */

use std::time::Instant;
use tracing::{debug, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SEGHEAP_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SEGHEAP_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .init();
    }
}

/// Span around one heap operation, logging its duration when dropped
pub struct HeapSpan {
    span: tracing::Span,
    start: Instant,
    operation: &'static str,
}

impl HeapSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = span!(
            Level::DEBUG,
            "heap_op",
            operation = operation,
            result = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            operation,
        }
    }

    /// Record whether the operation succeeded
    pub fn record_result(&self, success: bool) {
        self.span
            .record("result", if success { "success" } else { "error" });
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for HeapSpan {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        debug!(
            operation = self.operation,
            duration_us = self.start.elapsed().as_micros() as u64,
            "heap operation completed"
        );
    }
}

/// Open a timed span for a heap operation
pub fn span_heap_op(operation: &'static str) -> HeapSpan {
    HeapSpan::new(operation)
}
