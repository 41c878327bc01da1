/*!
 * Performance Monitoring
 * Diagnostic metrics and structured tracing for the VFS
 */

mod metrics;
mod tracer;

pub use metrics::{HistogramStats, MetricsSnapshot, OpTimer, OperationStats, PerfMonitor};
pub use tracer::{generate_trace_id, init_tracing, OperationSpan};
