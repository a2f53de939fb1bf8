//! Static structure factor S(q) = |sum_j exp(i q.r_j)|^2 as a two-stage
//! worker-group reduction: `compute_ssf` leaves one (sin, cos) pair per
//! wavevector and group, `finalize_ssf` folds the groups and squares.

mod engine;
mod finalize;
mod phase;

pub use engine::*;
pub use finalize::*;
pub use phase::*;

use ssfconsts::PARALLEL_MIN_WORK;

#[inline]
fn use_parallel_for_work(work: usize, ngroup: usize) -> bool {
    ngroup > 1 && work >= PARALLEL_MIN_WORK && rayon::current_num_threads() > 1
}
