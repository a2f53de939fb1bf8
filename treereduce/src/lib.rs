//! Two-channel tree reduction inside one worker group.
//!
//! Lanes of a group are stepped phase by phase: every active lane finishes
//! its add before the next halving starts. `GroupSync::sync` marks the
//! points where a group running lanes concurrently needs a barrier.

use num_traits::Float;
use ssfconsts::*;
use ssftypes::*;

pub trait GroupSync {
    fn sync(&mut self);
}

/// Barrier for lane-stepped groups; nothing is in flight at a phase boundary.
#[derive(Debug, Default, Clone, Copy)]
pub struct LaneSync;

impl GroupSync for LaneSync {
    #[inline]
    fn sync(&mut self) {}
}

/// Counts barriers instead of waiting on them.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncCounter {
    count: usize,
}

impl SyncCounter {
    pub fn new() -> SyncCounter {
        SyncCounter::default()
    }

    pub fn get_count(&self) -> usize {
        self.count
    }
}

impl GroupSync for SyncCounter {
    fn sync(&mut self) {
        self.count += 1;
    }
}

/// Sums `sin[0..2 * threads]` and `cos[0..2 * threads]` into slot 0.
///
/// `threads` is zero or a power of two. Each step lane `i < threads` adds
/// slot `i + threads` into slot `i` on both channels, then `threads` halves.
/// Steps wider than `LOCKSTEP_WIDTH` end with a group barrier.
pub fn tree_reduce<T: Float, S: GroupSync>(
    sin: &mut [T],
    cos: &mut [T],
    threads: usize,
    sync: &mut S,
) {
    debug_assert!(threads == 0 || threads.is_power_of_two());
    debug_assert!(sin.len() >= 2 * threads);
    debug_assert!(cos.len() >= 2 * threads);

    let mut threads = threads;

    while threads > 0 {
        let (sin_lo, sin_hi) = sin.split_at_mut(threads);
        let (cos_lo, cos_hi) = cos.split_at_mut(threads);

        for lane in 0..threads {
            sin_lo[lane] = sin_lo[lane] + sin_hi[lane];
            cos_lo[lane] = cos_lo[lane] + cos_hi[lane];
        }

        if threads > LOCKSTEP_WIDTH {
            sync.sync();
        }

        threads >>= 1;
    }
}

#[inline]
fn reduce_unrolled<T: Float, S: GroupSync, const GROUP_SIZE: usize>(
    sin: &mut [T],
    cos: &mut [T],
    sync: &mut S,
) {
    tree_reduce(sin, cos, GROUP_SIZE / 2, sync);
}

/// Reduction over the full scratch of a group with a fixed size.
pub type ReduceFn<T, S> = fn(&mut [T], &mut [T], &mut S);

/// Picks the reduction specialised for `group_size`.
pub fn reducer_for<T: Float, S: GroupSync>(group_size: usize) -> SsfResult<ReduceFn<T, S>> {
    check_group_size(group_size)?;

    let f = match group_size {
        1 => reduce_unrolled::<T, S, 1> as ReduceFn<T, S>,
        2 => reduce_unrolled::<T, S, 2> as ReduceFn<T, S>,
        4 => reduce_unrolled::<T, S, 4> as ReduceFn<T, S>,
        8 => reduce_unrolled::<T, S, 8> as ReduceFn<T, S>,
        16 => reduce_unrolled::<T, S, 16> as ReduceFn<T, S>,
        32 => reduce_unrolled::<T, S, 32> as ReduceFn<T, S>,
        64 => reduce_unrolled::<T, S, 64> as ReduceFn<T, S>,
        128 => reduce_unrolled::<T, S, 128> as ReduceFn<T, S>,
        256 => reduce_unrolled::<T, S, 256> as ReduceFn<T, S>,
        512 => reduce_unrolled::<T, S, 512> as ReduceFn<T, S>,
        _ => {
            return Err(SsfError::InvalidGroupSize(format!(
                "no reduction for group size {}",
                group_size
            )))
        }
    };

    Ok(f)
}

/// Group-local accumulator slots, one (sin, cos) pair per lane.
#[derive(Debug, Clone)]
pub struct GroupScratch<T> {
    sin: Vec<T>,
    cos: Vec<T>,
}

impl<T: Float> GroupScratch<T> {
    pub fn new(group_size: usize) -> SsfResult<GroupScratch<T>> {
        check_group_size(group_size)?;

        Ok(GroupScratch {
            sin: vec![T::zero(); group_size],
            cos: vec![T::zero(); group_size],
        })
    }

    pub fn group_size(&self) -> usize {
        self.sin.len()
    }

    #[inline]
    pub fn set(&mut self, lane: usize, sin: T, cos: T) {
        self.sin[lane] = sin;
        self.cos[lane] = cos;
    }

    pub fn reduce<S: GroupSync>(&mut self, reduce: ReduceFn<T, S>, sync: &mut S) -> (T, T) {
        reduce(&mut self.sin, &mut self.cos, sync);

        (self.sin[0], self.cos[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(n: usize) -> (Vec<f64>, Vec<f64>) {
        let sin = (0..n).map(|i| i as f64).collect();
        let cos = (0..n).map(|i| 1.0 - 2.0 * i as f64).collect();

        (sin, cos)
    }

    #[test]
    fn test_tree_reduce_sums_both_channels() {
        for &n in SUPPORTED_GROUP_SIZES.iter() {
            let (mut sin, mut cos) = fill(2 * n);

            let sin_sum: f64 = sin.iter().sum();
            let cos_sum: f64 = cos.iter().sum();

            tree_reduce(&mut sin, &mut cos, n, &mut LaneSync);

            assert_eq!(sin[0], sin_sum, "sin, n = {}", n);
            assert_eq!(cos[0], cos_sum, "cos, n = {}", n);
        }
    }

    #[test]
    fn test_tree_reduce_zero_threads_is_terminal() {
        let mut sin = vec![3.0f32, 4.0];
        let mut cos = vec![5.0f32, 6.0];

        let mut counter = SyncCounter::new();
        tree_reduce(&mut sin, &mut cos, 0, &mut counter);

        assert_eq!(sin, vec![3.0, 4.0]);
        assert_eq!(cos, vec![5.0, 6.0]);
        assert_eq!(counter.get_count(), 0);
    }

    #[test]
    fn test_barriers_only_above_lockstep_width() {
        // 256, 128, 64 need a barrier; 32 and below run in lock-step
        let (mut sin, mut cos) = fill(512);
        let mut counter = SyncCounter::new();
        tree_reduce(&mut sin, &mut cos, 256, &mut counter);
        assert_eq!(counter.get_count(), 3);

        let (mut sin, mut cos) = fill(64);
        let mut counter = SyncCounter::new();
        tree_reduce(&mut sin, &mut cos, 32, &mut counter);
        assert_eq!(counter.get_count(), 0);
    }

    #[test]
    fn test_reducer_dispatch() {
        for &n in SUPPORTED_GROUP_SIZES.iter() {
            let reduce = reducer_for::<f64, LaneSync>(n).unwrap();

            let mut scratch = GroupScratch::<f64>::new(n).unwrap();
            for lane in 0..n {
                scratch.set(lane, 1.0, lane as f64);
            }

            let (s, c) = scratch.reduce(reduce, &mut LaneSync);

            assert_eq!(s, n as f64);
            assert_eq!(c, (n * (n - 1) / 2) as f64);
        }

        assert!(reducer_for::<f64, LaneSync>(0).is_err());
        assert!(reducer_for::<f64, LaneSync>(96).is_err());
        assert!(reducer_for::<f32, LaneSync>(1024).is_err());
    }

    #[test]
    fn test_scratch_rejects_bad_size() {
        assert!(GroupScratch::<f64>::new(100).is_err());
        assert_eq!(GroupScratch::<f64>::new(128).unwrap().group_size(), 128);
    }
}
