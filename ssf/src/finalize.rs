use crate::use_parallel_for_work;
use log::{debug, warn};
use num_traits::Float;
use rayon::prelude::*;
use ssftypes::*;
use treereduce::*;

/// Folds the per-group partial sums of every wavevector and squares them.
///
/// `group_count` is the group count of the phase-sum grid that produced
/// `partials`. Finalize group `h` of `G` handles wavevectors `h, h + G, ...`
/// and writes `sum (sin^2 + cos^2)` over them to slot `h`, so the result has
/// one value per wavevector only when `G == nq`.
pub fn finalize_ssf<T: Float + Send + Sync>(
    partials: &PartialSums<T>,
    group_count: usize,
    fgrid: &FinalizeGrid,
) -> SsfResult<StructureFactor<T>> {
    if group_count != partials.get_group_count() {
        return Err(SsfError::GroupCountMismatch(format!(
            "partial sums hold {} groups, caller passed {}",
            partials.get_group_count(),
            group_count
        )));
    }

    let nq = partials.get_nq();
    let layout = fgrid.get_layout();

    if nq == 0 {
        return Ok(StructureFactor::empty(layout));
    }

    let reduce = reducer_for::<T, LaneSync>(fgrid.get_group_size())?;
    let scratch = GroupScratch::<T>::new(fgrid.get_group_size())?;

    let nfinal = fgrid.group_count(nq);

    if nfinal > nq {
        warn!(
            "{} of {} finalize groups have no wavevector and yield 0",
            nfinal - nq,
            nfinal
        );
    }

    debug!(
        "finalize: nq = {}, partial groups = {}, finalize groups = {} of {}",
        nq,
        group_count,
        nfinal,
        fgrid.get_group_size()
    );

    let run_group = |ih: usize| {
        let mut scratch = scratch.clone();

        finalize_group(ih, nfinal, partials, &mut scratch, reduce, &mut LaneSync)
    };

    let values: Vec<T> = if use_parallel_for_work(nq * group_count, nfinal) {
        (0..nfinal).into_par_iter().map(run_group).collect()
    } else {
        (0..nfinal).map(run_group).collect()
    };

    Ok(StructureFactor::new(values, layout))
}

pub(crate) fn finalize_group<T: Float, S: GroupSync>(
    group: usize,
    nfinal: usize,
    partials: &PartialSums<T>,
    scratch: &mut GroupScratch<T>,
    reduce: ReduceFn<T, S>,
    sync: &mut S,
) -> T {
    let group_size = scratch.group_size();
    let group_count = partials.get_group_count();

    let mut result = T::zero();

    for iq in strided_indices(partials.get_nq(), nfinal, group) {
        let (sin_row, cos_row) = partials.row(iq);

        for lane in 0..group_size {
            let mut sin_sum = T::zero();
            let mut cos_sum = T::zero();

            for ig in strided_indices(group_count, group_size, lane) {
                sin_sum = sin_sum + sin_row[ig];
                cos_sum = cos_sum + cos_row[ig];
            }

            scratch.set(lane, sin_sum, cos_sum);
        }

        sync.sync();

        let (s, c) = scratch.reduce(reduce, sync);

        result = result + s * s + c * c;

        sync.sync();
    }

    result
}
