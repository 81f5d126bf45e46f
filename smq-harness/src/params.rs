//! Standard experimental parameters, promoted from file-scope constants
//! (as in the original `generate_multiqueue_data.cc`) to overridable CLI
//! defaults.

use clap::Args;

#[derive(Args, Debug, Clone, Copy)]
pub struct Params {
    /// Number of tracked blocks.
    #[arg(long, default_value_t = 8192)]
    pub nr_blocks: usize,

    /// Hits drawn from the sampler per generation.
    #[arg(long, default_value_t = 10_000)]
    pub hits_per_generation: usize,

    /// Number of generations to run.
    #[arg(long, default_value_t = 100)]
    pub nr_generations: usize,

    /// Default level count for single-multiqueue experiments.
    #[arg(long, default_value_t = 64)]
    pub nr_levels: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            nr_blocks: 8192,
            hits_per_generation: 10_000,
            nr_generations: 100,
            nr_levels: 64,
        }
    }
}
