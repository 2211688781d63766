//! Run counters for reporting and the JSON summary. No persistence;
//! the Generator ticks them as it works.

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Fresh SHA-256 evaluations fed into stage 0.
    pub hashes: u64,
    /// Stage-0 refills.
    pub batches: u64,
    /// Stage expand passes across all stages.
    pub expands: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) {
        eprintln!(
            "Generated {} hashes over {} batches, {} expand passes",
            self.hashes, self.batches, self.expands
        );
    }
}
