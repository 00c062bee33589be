use crate::extension::Extension;
use aida_statedb::StateDb;

/// The default base for partial extension implementations (§4.3); every
/// hook is a no-op.
#[derive(Debug, Default)]
pub struct NoopExtension;

impl<S: StateDb> Extension<S> for NoopExtension {}
