//! Seedable random number generation.
//!
//! Every run owns exactly one master generator. Work that may execute on
//! the rayon pool receives a private generator seeded from a sub-seed drawn
//! sequentially from the master, so the random stream of a run does not
//! depend on whether it executes in parallel.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from `seed`, or from fresh entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Draws `count` sub-seeds from `rng`, one per independent unit of work.
pub fn sub_seeds<R: Rng>(rng: &mut R, count: usize) -> Vec<u64> {
    (0..count).map(|_| rng.random()).collect()
}
