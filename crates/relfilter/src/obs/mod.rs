//! Observability: compile counters and the sink abstraction.

pub mod metrics;
pub mod sink;


pub use metrics::{CompileMetrics, report as metrics_report, reset as metrics_reset};
pub use sink::{CompileEvent, CompileSink, with_compile_sink};
