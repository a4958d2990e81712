//! Permutation-preserving genetic operators.
//!
//! # Crossover
//!
//! - [`breed`]: Ordered Crossover (OX), Davis (1985): a contiguous slice of
//!   one parent followed by the other parent's remaining points in order.
//! - [`breed_population`]: elite carry-over plus symmetric pairing of one
//!   shuffle of the mating pool.
//!
//! # Mutation
//!
//! - [`mutate`]: per-position swap with a uniformly random position.
//! - [`mutate_population`]: [`mutate`] applied to every route.
//!
//! # Randomness
//!
//! The population-level operators draw one sub-seed per unit of work from
//! the caller's generator before dispatching, so the output is the same
//! whether the units run sequentially or on the rayon pool.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::random::{create_rng, sub_seeds};
use crate::tour::Route;

// ============================================================================
// Crossover
// ============================================================================

/// Ordered crossover of two parents of equal length.
///
/// Draws two cut points in `[0, n)`; the child is `parent_a[start..end]`
/// followed by every point of `parent_b` not in that slice, in
/// `parent_b`'s order. Equal cut points give a copy of `parent_b`.
///
/// # Complexity
/// O(n) time, O(n) space
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn breed<R: Rng>(parent_a: &Route, parent_b: &Route, rng: &mut R) -> Route {
    let n = parent_a.len();
    assert_eq!(n, parent_b.len(), "parents must have equal length");
    if n == 0 {
        return Route::default();
    }

    let (start, end) = random_cut(n, rng);
    Route::new(ox_child(parent_a.order(), parent_b.order(), start, end))
}

/// Build one OX child: slice `[start, end)` of `template`, then `donor`.
fn ox_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let segment = &template[start..end];
    let mut in_segment = vec![false; template.len()];
    for &id in segment {
        in_segment[id] = true;
    }

    let mut child = Vec::with_capacity(template.len());
    child.extend_from_slice(segment);
    child.extend(donor.iter().copied().filter(|&id| !in_segment[id]));
    child
}

/// Two independent uniform draws from `0..n`, ordered.
fn random_cut<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.random_range(0..n);
    let b = rng.random_range(0..n);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Produces the next generation's offspring from a mating pool.
///
/// The first `elite_size` routes of the pool are copied unchanged. The pool
/// is then shuffled once and route `i` of the shuffle is bred with route
/// `len - 1 - i`, for `i` in `0..len - elite_size`, so the output has the
/// same length as the pool.
///
/// # Panics
/// Panics if `elite_size > pool.len()`.
pub fn breed_population<R: Rng>(
    pool: &[Route],
    elite_size: usize,
    rng: &mut R,
    parallel: bool,
) -> Vec<Route> {
    assert!(
        elite_size <= pool.len(),
        "elite_size must not exceed the mating pool"
    );
    let n = pool.len();
    let mut children: Vec<Route> = pool[..elite_size].to_vec();
    if elite_size == n {
        return children;
    }

    let mut shuffled: Vec<&Route> = pool.iter().collect();
    shuffled.shuffle(rng);
    let seeds = sub_seeds(rng, n - elite_size);

    let pair = |(i, seed): (usize, u64)| {
        let mut pair_rng = create_rng(seed);
        breed(shuffled[i], shuffled[n - 1 - i], &mut pair_rng)
    };

    if parallel {
        children.par_extend(seeds.into_par_iter().enumerate().map(pair));
    } else {
        children.extend(seeds.into_iter().enumerate().map(pair));
    }
    children
}

// ============================================================================
// Mutation
// ============================================================================

/// Swap mutation applied once per position.
///
/// Each position `i` is, with probability `rate`, swapped with a uniformly
/// random position `j` in `[0, n)` (possibly `i` itself).
pub fn mutate<R: Rng>(route: &mut Route, rate: f64, rng: &mut R) {
    let n = route.len();
    for i in 0..n {
        if rng.random::<f64>() < rate {
            let j = rng.random_range(0..n);
            route.swap(i, j);
        }
    }
}

/// Applies [`mutate`] to every route independently.
pub fn mutate_population<R: Rng>(routes: &mut [Route], rate: f64, rng: &mut R, parallel: bool) {
    let seeds = sub_seeds(rng, routes.len());
    let apply = |(route, seed): (&mut Route, u64)| {
        let mut route_rng = create_rng(seed);
        mutate(route, rate, &mut route_rng);
    };

    if parallel {
        routes.par_iter_mut().zip(seeds).for_each(apply);
    } else {
        routes.iter_mut().zip(seeds).for_each(apply);
    }
}

// ============================================================================
// Tests
// ============================================================================
