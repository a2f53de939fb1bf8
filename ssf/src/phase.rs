use crate::use_parallel_for_work;
use log::debug;
use num_traits::Float;
use rayon::prelude::*;
use ssftypes::*;
use treereduce::*;

/// Phase-sum stage into a fresh `nq x group_count` buffer.
pub fn compute_ssf<T: Float + Send + Sync>(
    positions: &ParticlePositions<T>,
    wavevectors: &Wavevectors<T>,
    params: &SsfParams,
    grid: &LaunchGrid,
) -> SsfResult<PartialSums<T>> {
    let mut partials = PartialSums::new(0, 0);

    compute_ssf_into(positions, wavevectors, params, grid, &mut partials)?;

    Ok(partials)
}

/// Phase-sum stage reusing `partials`, which is reshaped to `nq x group_count`.
///
/// Every group walks all wavevectors; lane `t` of the grid visits particles
/// `t, t + T, t + 2T, ...` where `T` is the grid's thread count.
pub fn compute_ssf_into<T: Float + Send + Sync>(
    positions: &ParticlePositions<T>,
    wavevectors: &Wavevectors<T>,
    params: &SsfParams,
    grid: &LaunchGrid,
    partials: &mut PartialSums<T>,
) -> SsfResult<()> {
    params.check_positions(positions)?;
    params.check_wavevectors(wavevectors)?;

    let nq = params.get_nq();
    let group_count = grid.group_count();

    partials.reshape(nq, group_count);

    if nq == 0 {
        return Ok(());
    }

    let reduce = reducer_for::<T, LaneSync>(grid.get_group_size())?;
    let scratch = GroupScratch::<T>::new(grid.get_group_size())?;

    debug!(
        "phase sums: npart = {}, nq = {}, dim = {}, groups = {} x {} of {}",
        params.get_npart(),
        nq,
        params.get_dim(),
        grid.get_grid_width(),
        grid.get_grid_height(),
        grid.get_group_size()
    );

    let run_group = |ig: usize| {
        let mut scratch = scratch.clone();

        phase_sums_for_group(
            ig,
            positions,
            wavevectors,
            params,
            grid,
            &mut scratch,
            reduce,
            &mut LaneSync,
        )
    };

    let columns: Vec<Vec<(T, T)>> = if use_parallel_for_work(params.get_npart() * nq, group_count)
    {
        (0..group_count).into_par_iter().map(run_group).collect()
    } else {
        (0..group_count).map(run_group).collect()
    };

    for (ig, column) in columns.iter().enumerate() {
        for (iq, &(s, c)) in column.iter().enumerate() {
            partials.set(iq, ig, s, c);
        }
    }

    Ok(())
}

/// One group's (sin, cos) sums for every wavevector.
pub(crate) fn phase_sums_for_group<T: Float, S: GroupSync>(
    group: usize,
    positions: &ParticlePositions<T>,
    wavevectors: &Wavevectors<T>,
    params: &SsfParams,
    grid: &LaunchGrid,
    scratch: &mut GroupScratch<T>,
    reduce: ReduceFn<T, S>,
    sync: &mut S,
) -> Vec<(T, T)> {
    let npart = params.get_npart();
    let dim = params.get_dim();
    let group_size = grid.get_group_size();
    let nthreads = grid.total_threads();

    let mut sums = Vec::with_capacity(params.get_nq());

    for iq in 0..params.get_nq() {
        let q = wavevectors.row(iq);

        for lane in 0..group_size {
            let mut sin_sum = T::zero();
            let mut cos_sum = T::zero();

            for ipart in strided_indices(npart, nthreads, group * group_size + lane) {
                let mut q_r = T::zero();

                for k in 0..dim {
                    q_r = q_r + q[k] * positions.coord(k, ipart);
                }

                let (s, c) = q_r.sin_cos();

                sin_sum = sin_sum + s;
                cos_sum = cos_sum + c;
            }

            scratch.set(lane, sin_sum, cos_sum);
        }

        sync.sync();

        sums.push(scratch.reduce(reduce, sync));

        // slots are rewritten for the next wavevector
        sync.sync();
    }

    sums
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssfconsts::*;

    #[test]
    fn test_phase_sums_single_group_matches_direct_sum() {
        // 5 particles in 1d
        let r = vec![0.1, 0.7, 1.3, 2.9, 4.2];
        let q = vec![1.5, -0.4];

        let params = SsfParams::new(5, 2, 1).unwrap();
        let positions = ParticlePositions::new(&r, 5, 1).unwrap();
        let wavevectors = Wavevectors::new(&q, 2, 1).unwrap();
        let grid = LaunchGrid::new(4, 1, 1).unwrap();

        let partials = compute_ssf(&positions, &wavevectors, &params, &grid).unwrap();

        assert_eq!(partials.get_nq(), 2);
        assert_eq!(partials.get_group_count(), 1);

        for iq in 0..2 {
            let s: f64 = r.iter().map(|x| (q[iq] * x).sin()).sum();
            let c: f64 = r.iter().map(|x| (q[iq] * x).cos()).sum();

            let (ps, pc) = partials.get(iq, 0);

            assert!((ps - s).abs() < EPS12);
            assert!((pc - c).abs() < EPS12);
        }
    }

    #[test]
    fn test_phase_sums_split_over_groups() {
        // one lane per particle, groups hold disjoint particles
        let r = vec![0.0, 1.0, 2.0, 3.0];
        let q = vec![0.5];

        let params = SsfParams::new(4, 1, 1).unwrap();
        let positions = ParticlePositions::new(&r, 4, 1).unwrap();
        let wavevectors = Wavevectors::new(&q, 1, 1).unwrap();
        let grid = LaunchGrid::new(2, 2, 1).unwrap();

        let partials = compute_ssf(&positions, &wavevectors, &params, &grid).unwrap();

        let (s0, c0) = partials.get(0, 0);
        let (s1, c1) = partials.get(0, 1);

        assert!((s0 - (0.0f64.sin() + 0.5f64.sin())).abs() < EPS14);
        assert!((c0 - (0.0f64.cos() + 0.5f64.cos())).abs() < EPS14);
        assert!((s1 - (1.0f64.sin() + 1.5f64.sin())).abs() < EPS14);
        assert!((c1 - (1.0f64.cos() + 1.5f64.cos())).abs() < EPS14);
    }

    #[test]
    fn test_phase_sums_no_wavevectors() {
        let r = vec![0.0; 6];
        let q: Vec<f64> = Vec::new();

        let params = SsfParams::new(3, 0, 2).unwrap();
        let positions = ParticlePositions::new(&r, 3, 2).unwrap();
        let wavevectors = Wavevectors::new(&q, 0, 2).unwrap();
        let grid = LaunchGrid::new(64, 8, 1).unwrap();

        let partials = compute_ssf(&positions, &wavevectors, &params, &grid).unwrap();

        assert_eq!(partials.get_nq(), 0);
        assert_eq!(partials.get_group_count(), 8);
    }

    #[test]
    fn test_phase_sums_rejects_mismatch() {
        let r = vec![0.0; 6];
        let q = vec![1.0; 6];

        let params = SsfParams::new(3, 2, 3).unwrap();
        let positions = ParticlePositions::new(&r, 3, 2).unwrap();
        let wavevectors = Wavevectors::new(&q, 2, 3).unwrap();
        let grid = LaunchGrid::new(8, 1, 1).unwrap();

        assert!(compute_ssf(&positions, &wavevectors, &params, &grid).is_err());
    }

    #[test]
    fn test_phase_group_barriers() {
        // per wavevector: accumulate/reduce, reduce steps 64 (>32), reuse
        let r = vec![0.25; 10];
        let q = vec![1.0, 2.0, 3.0];

        let params = SsfParams::new(10, 3, 1).unwrap();
        let positions = ParticlePositions::new(&r, 10, 1).unwrap();
        let wavevectors = Wavevectors::new(&q, 3, 1).unwrap();
        let grid = LaunchGrid::new(128, 1, 1).unwrap();

        let reduce = reducer_for::<f64, SyncCounter>(128).unwrap();
        let mut scratch = GroupScratch::new(128).unwrap();
        let mut counter = SyncCounter::new();

        let sums = phase_sums_for_group(
            0,
            &positions,
            &wavevectors,
            &params,
            &grid,
            &mut scratch,
            reduce,
            &mut counter,
        );

        assert_eq!(sums.len(), 3);
        assert_eq!(counter.get_count(), 3 * 3);

        for (iq, (s, c)) in sums.iter().enumerate() {
            assert!((s - 10.0 * (0.25 * q[iq]).sin()).abs() < EPS12);
            assert!((c - 10.0 * (0.25 * q[iq]).cos()).abs() < EPS12);
        }
    }
}
