use crate::block_env::BlockEnvironment;
use crate::message::Message;
use crate::receipt::ExecutionResult;
use crate::world_state::WorldState;

/// Bundles the four projections of one historical transaction: the world
/// state it read, the world state it produced, the block it executed in,
/// and the message/result pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxContext {
    pub input_state: WorldState,
    pub output_state: WorldState,
    pub block_environment: BlockEnvironment,
    pub message: Message,
    pub result: ExecutionResult,
}
