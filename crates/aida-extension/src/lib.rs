//! Pluggable pre/post lifecycle hooks invoked around each run, block, and
//! transaction (§4.3), composed into an ordered [`ExtensionChain`].

mod chain;
mod extension;
mod noop;

pub use chain::ExtensionChain;
pub use extension::Extension;
pub use noop::NoopExtension;
