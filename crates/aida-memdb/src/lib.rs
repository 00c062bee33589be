//! A single-threaded, non-durable [`StateDb`](aida_statedb::StateDb)
//! implementation, kept entirely in memory. Serves as the reference backend
//! for unit tests and small synthetic replay fixtures.

mod archive;
mod bulk_load;
mod hashing;
mod state_db;

pub use archive::MemArchive;
pub use bulk_load::MemBulkLoad;
pub use state_db::MemStateDb;
