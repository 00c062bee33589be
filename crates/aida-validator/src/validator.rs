use crate::error::ValidationError;
use crate::metrics::VALIDATOR_METRICS;
use aida_context::{RunContext, RunError};
use aida_extension::Extension;
use aida_statedb::{ArchiveView, StateDb};
use std::time::Duration;

/// Cross-checks live and (in archive mode) archive state roots against the
/// recorded roots in the auxiliary DB (§4.7). A mismatch is always fatal —
/// `RunError::HashMismatch` is never tolerated by `ErrorSink`, since every
/// later root would also mismatch once one diverges.
pub struct StateHashValidator {
    archive_mode: bool,
    next_archive_block_to_check: u64,
}

impl StateHashValidator {
    pub fn new(archive_mode: bool, starting_archive_block: u64) -> Self {
        Self { archive_mode, next_archive_block_to_check: starting_archive_block }
    }

    fn check_live_root<S: StateDb>(&self, block: u64, ctx: &mut RunContext<S>) -> Result<(), ValidationError> {
        let expected = ctx.aida_db.state_root(block);
        let actual = ctx.state.get_hash().map_err(|e| ValidationError::StateDb(e.to_string()))?;
        match expected {
            Some(expected_root) if expected_root != actual => Err(ValidationError::LiveRootMismatch { block }),
            _ => Ok(()),
        }
    }

    /// Advances `next_archive_block_to_check` up through the archive's
    /// current height, comparing each archive root against the recorded
    /// one. A mismatch on a block with no transactions is tolerated (it may
    /// be trailing an exception whose root was never meant to match) and
    /// the pointer jumps ahead to `height - 1`; any other mismatch is fatal.
    fn catch_up_archive<S: StateDb>(&mut self, ctx: &mut RunContext<S>) -> Result<(), ValidationError> {
        if !self.archive_mode {
            return Ok(());
        }
        let (height, is_empty) =
            ctx.state.get_archive_block_height().map_err(|e| ValidationError::StateDb(e.to_string()))?;
        if is_empty {
            return Ok(());
        }

        while self.next_archive_block_to_check <= height {
            let block = self.next_archive_block_to_check;
            let expected = ctx.aida_db.state_root(block);

            let archive =
                ctx.state.get_archive_state(block).map_err(|e| ValidationError::StateDb(e.to_string()))?;
            let actual = archive.get_hash().map_err(|e| ValidationError::StateDb(e.to_string()));
            archive.release();
            let actual = actual?;

            match expected {
                Some(expected_root) if expected_root == actual => {
                    self.next_archive_block_to_check = block + 1;
                }
                Some(_) => {
                    if ctx.aida_db.block_has_no_transactions(block) {
                        tracing::warn!(block, height, "archive root mismatch on trailing empty block, skipping ahead");
                        self.next_archive_block_to_check = height.saturating_sub(1).max(block + 1);
                    } else {
                        return Err(ValidationError::ArchiveRootMismatch { block });
                    }
                }
                None => {
                    self.next_archive_block_to_check = block + 1;
                }
            }
        }
        Ok(())
    }
}

fn into_run_error(error: ValidationError) -> RunError {
    match error {
        ValidationError::LiveRootMismatch { .. } | ValidationError::ArchiveRootMismatch { .. } => {
            VALIDATOR_METRICS.mismatches.inc();
            RunError::HashMismatch(error.to_string())
        }
        ValidationError::WorldStateMismatch { .. } => {
            VALIDATOR_METRICS.mismatches.inc();
            RunError::Validation(error.to_string())
        }
        ValidationError::StateDb(_) => RunError::Resource(error.to_string()),
    }
}

impl<S: StateDb> Extension<S> for StateHashValidator {
    fn post_block(&mut self, block: u64, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        self.check_live_root(block, ctx).map_err(into_run_error)?;
        self.catch_up_archive(ctx).map_err(into_run_error)
    }

    /// Polls until the archive catches up to the last processed block, 10ms
    /// between attempts, unless the run already aborted.
    fn post_run(&mut self, ctx: &mut RunContext<S>, run_result: Option<&RunError>) -> Result<(), RunError> {
        if run_result.is_some() || !self.archive_mode {
            return Ok(());
        }
        loop {
            let (height, is_empty) =
                ctx.state.get_archive_block_height().map_err(|e| RunError::Resource(e.to_string()))?;
            if is_empty || self.next_archive_block_to_check > height {
                return Ok(());
            }
            self.catch_up_archive(ctx).map_err(into_run_error)?;
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}
