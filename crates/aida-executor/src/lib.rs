//! Core replay pipeline (§4.4): drives the extension chain, the archive
//! prepper, and the processor over a block range, in either sequential or
//! (simulated) parallel-worker order.

mod engine;
mod executor;
mod metrics;
mod records;

pub use engine::{Engine, ExecError};
pub use executor::Executor;
pub use metrics::{ENGINE_METRICS, EngineMetrics};
