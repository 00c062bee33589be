//! Read-only auxiliary key/value store contract (`aidaDb` in spec.md):
//! recorded state roots, exceptions, update sets, and substates consumed by
//! the primer, corrector, and state-hash validator.

mod exception;
mod in_memory;
mod traits;
mod update_set;

pub use exception::{ExceptionBlock, TxException};
pub use in_memory::InMemoryAuxDb;
pub use traits::{AuxDb, Substate};
pub use update_set::UpdateSet;
