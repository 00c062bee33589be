//! The pluggable state-database contract consumed by the core engine
//! (spec.md §6). Every concrete persistent backend is an external
//! collaborator; this crate only specifies the capability set.

mod archive;
mod bulk_load;
mod conduit;
mod error;
mod state_db;

pub use archive::ArchiveView;
pub use bulk_load::BulkLoad;
pub use conduit::{ChainConduit, EndOfTxAction};
pub use error::StateDbError;
pub use state_db::{AccessListEntry, StateDb};
