/// Knobs recognized under `PrimeRandom`, `RandomSeed`, `PrimeThreshold`,
/// `UpdateBufferSize` (spec.md §6).
#[derive(Debug, Clone)]
pub struct PrimerConfig {
    /// Shuffle addresses with a seeded PRNG before each bulk-load flush.
    /// Changes insertion order only — the resulting root MUST be unchanged.
    pub prime_random: bool,
    pub random_seed: u64,
    /// Flush the accumulation buffer early once it holds this many
    /// accounts, in addition to the byte-size trigger.
    pub prime_threshold: usize,
    pub update_buffer_size: usize,
}

impl Default for PrimerConfig {
    fn default() -> Self {
        Self { prime_random: false, random_seed: 0, prime_threshold: usize::MAX, update_buffer_size: 16 * 1024 * 1024 }
    }
}
