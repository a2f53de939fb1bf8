use crate::error::{SsfError, SsfResult};
use ssfconsts::*;

/// A group size is usable when it is a power of two no larger than
/// `MAX_GROUP_SIZE`; the tree reduction halves it down to one lane.
pub fn check_group_size(group_size: usize) -> SsfResult<()> {
    if group_size == 0 || !group_size.is_power_of_two() {
        return Err(SsfError::InvalidGroupSize(format!(
            "{} is not a power of two",
            group_size
        )));
    }

    if group_size > MAX_GROUP_SIZE {
        return Err(SsfError::InvalidGroupSize(format!(
            "{} exceeds the maximum of {}",
            group_size, MAX_GROUP_SIZE
        )));
    }

    Ok(())
}

/// Indices `worker, worker + nworker, worker + 2 * nworker, ...` below `n`.
pub fn strided_indices(n: usize, nworker: usize, worker: usize) -> impl Iterator<Item = usize> {
    (worker..n).step_by(nworker.max(1))
}

/// Geometry of the phase-sum dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchGrid {
    group_size: usize,
    grid_width: usize,
    grid_height: usize,
}

impl LaunchGrid {
    pub fn new(group_size: usize, grid_width: usize, grid_height: usize) -> SsfResult<LaunchGrid> {
        check_group_size(group_size)?;

        if grid_width == 0 || grid_height == 0 {
            return Err(SsfError::InvalidGrid(format!(
                "grid {} x {} has no groups",
                grid_width, grid_height
            )));
        }

        Ok(LaunchGrid {
            group_size,
            grid_width,
            grid_height,
        })
    }

    /// One lane per particle on a single grid row, at least one group.
    pub fn covering(npart: usize, group_size: usize) -> SsfResult<LaunchGrid> {
        check_group_size(group_size)?;

        let width = ((npart + group_size - 1) / group_size).max(1);

        LaunchGrid::new(group_size, width, 1)
    }

    pub fn get_group_size(&self) -> usize {
        self.group_size
    }

    pub fn get_grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn get_grid_height(&self) -> usize {
        self.grid_height
    }

    pub fn group_count(&self) -> usize {
        self.grid_width * self.grid_height
    }

    pub fn total_threads(&self) -> usize {
        self.group_count() * self.group_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeLayout {
    /// one group per wavevector, one scalar per wavevector
    PerWavevector,

    /// `groups` groups sharing the wavevectors round-robin, one scalar per group
    Strided { groups: usize },
}

/// Geometry of the finalize dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeGrid {
    group_size: usize,
    layout: FinalizeLayout,
}

impl FinalizeGrid {
    pub fn per_wavevector(group_size: usize) -> SsfResult<FinalizeGrid> {
        check_group_size(group_size)?;

        Ok(FinalizeGrid {
            group_size,
            layout: FinalizeLayout::PerWavevector,
        })
    }

    pub fn strided(group_size: usize, groups: usize) -> SsfResult<FinalizeGrid> {
        check_group_size(group_size)?;

        if groups == 0 {
            return Err(SsfError::InvalidGrid(
                "strided finalize needs at least one group".to_string(),
            ));
        }

        Ok(FinalizeGrid {
            group_size,
            layout: FinalizeLayout::Strided { groups },
        })
    }

    pub fn get_group_size(&self) -> usize {
        self.group_size
    }

    pub fn get_layout(&self) -> FinalizeLayout {
        self.layout
    }

    pub fn group_count(&self, nq: usize) -> usize {
        match self.layout {
            FinalizeLayout::PerWavevector => nq,
            FinalizeLayout::Strided { groups } => groups,
        }
    }

    pub fn is_per_wavevector(&self, nq: usize) -> bool {
        self.group_count(nq) == nq
    }
}
