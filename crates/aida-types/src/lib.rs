//! Immutable per-transaction data views shared by every crate in the replay
//! engine: [`Account`], [`WorldState`], [`BlockEnvironment`], [`Message`],
//! [`ExecutionResult`], [`TxContext`] and [`TxInfo`].

mod account;
mod block_env;
mod message;
mod receipt;
mod tx_context;
mod tx_info;
mod world_state;

pub use account::Account;
pub use block_env::BlockEnvironment;
pub use message::{AccessListEntry, Message, SetCodeAuthorization};
pub use receipt::{ExecutionResult, Log};
pub use tx_context::TxContext;
pub use tx_info::{PSEUDO_TX, TxInfo, derive_block_hash, derive_tx_hash};
pub use world_state::WorldState;
