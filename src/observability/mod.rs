//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! upload verifier / attempt tracker:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges via the `metrics` facade)
//! ```
//!
//! # Design Decisions
//! - Library code only emits; the binary decides where output goes
//! - No exporter is bundled: metric calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
