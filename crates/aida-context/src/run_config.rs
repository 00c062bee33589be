/// Recognized run options (spec.md §6 "Configuration"), effect-only — no
/// on-disk syntax is mandated, so this is a flat struct an embedder is
/// expected to populate however it likes (env vars, a config file, CLI
/// flags), matching the style of `L1WatcherConfig`/`GasAdjusterConfig`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RunConfig {
    /// Inclusive first block to process.
    pub first: u64,
    /// Exclusive last block to process.
    pub last: u64,
    /// Concurrency level; 1 selects sequential mode.
    pub workers: usize,

    pub archive_mode: bool,
    pub archive_variant: String,
    pub archive_query_rate: f64,
    pub archive_max_query_age: u64,

    pub validate_tx_state: bool,
    pub validate_state_hashes: bool,
    pub validate: bool,

    pub continue_on_failure: bool,
    /// 0 means endless (no cap on tolerated errors).
    pub max_num_errors: u64,

    pub prime_random: bool,
    pub random_seed: u64,
    pub prime_threshold: usize,
    pub update_buffer_size: usize,

    pub chain_id: u64,
    pub vm_impl: String,

    pub keep_db: bool,
    pub state_db_src: Option<String>,
    pub state_db_src_read_only: bool,
    pub state_db_src_direct_access: bool,
    pub db_tmp: Option<String>,
    pub is_existing_state_db: bool,

    pub shadow_db: bool,
    pub shadow_impl: Option<String>,
    pub shadow_variant: Option<String>,

    pub trace_file: Option<String>,
    pub delta_logging: bool,
}

impl RunConfig {
    /// Cap handed to `ErrorSink` (spec.md §6, §7, invariant I7): with
    /// `continue_on_failure` off, a single tolerable error is already
    /// fatal. With it on, `max_num_errors == 0` means endless tolerance;
    /// otherwise it's the exact count of non-fatal errors the sink allows
    /// before the next one turns fatal.
    pub fn effective_max_errors(&self) -> u64 {
        if !self.continue_on_failure {
            0
        } else if self.max_num_errors == 0 {
            u64::MAX
        } else {
            self.max_num_errors
        }
    }
}
