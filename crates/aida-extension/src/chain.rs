use crate::extension::Extension;
use aida_context::{RunContext, RunError};
use aida_statedb::StateDb;
use aida_types::TxInfo;

/// An ordered list of extensions (§4.3). Pre-hooks run in list order;
/// post-hooks run in reverse list order, so the first extension wraps the
/// whole stack. The symmetric guarantee — every successfully-returning
/// `PreX` gets its matching `PostX` — is enforced by having `pre_block`/
/// `pre_transaction` report how many extensions succeeded, so the caller's
/// paired `post_block`/`post_transaction` only unwinds that prefix.
pub struct ExtensionChain<S: StateDb> {
    extensions: Vec<Box<dyn Extension<S>>>,
}

impl<S: StateDb> ExtensionChain<S> {
    pub fn new(extensions: Vec<Box<dyn Extension<S>>>) -> Self {
        Self { extensions }
    }

    pub fn pre_run(&mut self, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        for extension in self.extensions.iter_mut() {
            extension.pre_run(ctx)?;
        }
        Ok(())
    }

    pub fn post_run(&mut self, ctx: &mut RunContext<S>, run_result: Option<&RunError>) -> Result<(), RunError> {
        let mut errors = Vec::new();
        for extension in self.extensions.iter_mut().rev() {
            if let Err(error) = extension.post_run(ctx, run_result) {
                errors.push(error);
            }
        }
        join(errors)
    }

    /// Runs `pre_block` in list order, stopping at the first failure.
    /// Returns the number of extensions whose hook succeeded, which the
    /// caller must pass to `post_block`.
    pub fn pre_block(&mut self, block: u64, ctx: &mut RunContext<S>) -> (usize, Result<(), RunError>) {
        for (index, extension) in self.extensions.iter_mut().enumerate() {
            if let Err(error) = extension.pre_block(block, ctx) {
                return (index, Err(error));
            }
        }
        (self.extensions.len(), Ok(()))
    }

    pub fn post_block(&mut self, succeeded: usize, block: u64, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        let mut errors = Vec::new();
        for extension in self.extensions[..succeeded].iter_mut().rev() {
            if let Err(error) = extension.post_block(block, ctx) {
                errors.push(error);
            }
        }
        join(errors)
    }

    pub fn pre_transaction(
        &mut self,
        tx: &TxInfo,
        ctx: &mut RunContext<S>,
    ) -> (usize, Result<(), RunError>) {
        for (index, extension) in self.extensions.iter_mut().enumerate() {
            if let Err(error) = extension.pre_transaction(tx, ctx) {
                return (index, Err(error));
            }
        }
        (self.extensions.len(), Ok(()))
    }

    pub fn post_transaction(
        &mut self,
        succeeded: usize,
        tx: &TxInfo,
        ctx: &mut RunContext<S>,
    ) -> Result<(), RunError> {
        let mut errors = Vec::new();
        for extension in self.extensions[..succeeded].iter_mut().rev() {
            if let Err(error) = extension.post_transaction(tx, ctx) {
                errors.push(error);
            }
        }
        join(errors)
    }
}

/// Folds multiple post-hook errors into a single composite, as the executor
/// does when surfacing the run's final error (§7).
fn join(mut errors: Vec<RunError>) -> Result<(), RunError> {
    if errors.is_empty() {
        return Ok(());
    }
    let mut accumulated = errors.remove(0);
    for next in errors {
        accumulated = match accumulated {
            RunError::Resource(m) => RunError::Resource(format!("{m}; {next}")),
            RunError::Ordering(m) => RunError::Ordering(format!("{m}; {next}")),
            RunError::Validation(m) => RunError::Validation(format!("{m}; {next}")),
            RunError::Execution(m) => RunError::Execution(format!("{m}; {next}")),
            RunError::HashMismatch(m) => RunError::HashMismatch(format!("{m}; {next}")),
        };
    }
    Err(accumulated)
}
