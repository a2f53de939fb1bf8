use crate::{compute_ssf_into, finalize_ssf};
use num_traits::Float;
use ssftypes::*;

/// Runs the phase-sum and finalize stages back to back over one
/// `PartialSums` buffer that is kept between calls.
#[derive(Debug, Clone)]
pub struct SsfEngine<T> {
    grid: LaunchGrid,
    fgrid: FinalizeGrid,
    partials: PartialSums<T>,
}

impl<T: Float + Send + Sync> SsfEngine<T> {
    pub fn new(grid: LaunchGrid, fgrid: FinalizeGrid) -> SsfEngine<T> {
        SsfEngine {
            grid,
            fgrid,
            partials: PartialSums::new(0, 0),
        }
    }

    pub fn get_launch_grid(&self) -> &LaunchGrid {
        &self.grid
    }

    pub fn get_finalize_grid(&self) -> &FinalizeGrid {
        &self.fgrid
    }

    pub fn get_partial_sums(&self) -> &PartialSums<T> {
        &self.partials
    }

    pub fn compute(
        &mut self,
        params: &SsfParams,
        positions: &ParticlePositions<T>,
        wavevectors: &Wavevectors<T>,
    ) -> SsfResult<StructureFactor<T>> {
        compute_ssf_into(positions, wavevectors, params, &self.grid, &mut self.partials)?;

        finalize_ssf(&self.partials, self.grid.group_count(), &self.fgrid)
    }
}
