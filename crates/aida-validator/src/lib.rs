//! Validation extensions (§4.7, §6 `ValidateTxState`/`ValidateStateHashes`/
//! `Validate`): per-block live and archive state-root cross-checks against
//! the roots recorded in the auxiliary DB, and per-transaction world-state
//! cross-checks against the live state DB.

mod error;
mod metrics;
mod validator;
mod world_state_validator;

pub use error::ValidationError;
pub use metrics::{VALIDATOR_METRICS, ValidatorMetrics};
pub use validator::StateHashValidator;
pub use world_state_validator::WorldStateValidator;
