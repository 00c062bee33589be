//! The shared per-run execution context (§3): the active state view, the
//! currently acquired archive view, the aux-db handle, and the bounded
//! continue-on-failure error sink.

mod error;
mod error_sink;
mod run_config;
mod run_context;

pub use error::RunError;
pub use error_sink::ErrorSink;
pub use run_config::RunConfig;
pub use run_context::RunContext;
