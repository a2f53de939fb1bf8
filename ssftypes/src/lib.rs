mod error;
mod grid;

pub use error::*;
pub use grid::*;

use num_traits::Float;
use ssfconsts::*;

/// Sizes fixed for one phase-sum/finalize pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SsfParams {
    npart: usize,
    nq: usize,
    dim: usize,
}

impl SsfParams {
    pub fn new(npart: usize, nq: usize, dim: usize) -> SsfResult<SsfParams> {
        if dim == 0 || dim > MAX_DIM {
            return Err(SsfError::InvalidDimension(format!(
                "dim = {} is outside 1..={}",
                dim, MAX_DIM
            )));
        }

        Ok(SsfParams { npart, nq, dim })
    }

    pub fn get_npart(&self) -> usize {
        self.npart
    }

    pub fn get_nq(&self) -> usize {
        self.nq
    }

    pub fn get_dim(&self) -> usize {
        self.dim
    }

    pub fn check_positions<T: Copy>(&self, positions: &ParticlePositions<T>) -> SsfResult<()> {
        if positions.get_npart() != self.npart || positions.get_dim() != self.dim {
            return Err(SsfError::LengthMismatch(format!(
                "positions are {} x {}, expected {} x {}",
                positions.get_npart(),
                positions.get_dim(),
                self.npart,
                self.dim
            )));
        }

        Ok(())
    }

    pub fn check_wavevectors<T: Copy>(&self, wavevectors: &Wavevectors<T>) -> SsfResult<()> {
        if wavevectors.get_nq() != self.nq || wavevectors.get_dim() != self.dim {
            return Err(SsfError::LengthMismatch(format!(
                "wavevectors are {} x {}, expected {} x {}",
                wavevectors.get_nq(),
                wavevectors.get_dim(),
                self.nq,
                self.dim
            )));
        }

        Ok(())
    }
}

/// Particle coordinates in coordinate-major order: x0 x1 .. xN, y0 y1 .. yN, ...
#[derive(Debug, Clone, Copy)]
pub struct ParticlePositions<'a, T> {
    data: &'a [T],
    npart: usize,
    dim: usize,
}

impl<'a, T: Copy> ParticlePositions<'a, T> {
    pub fn new(data: &'a [T], npart: usize, dim: usize) -> SsfResult<ParticlePositions<'a, T>> {
        if data.len() != npart * dim {
            return Err(SsfError::LengthMismatch(format!(
                "{} position values for {} particles in {} dimensions",
                data.len(),
                npart,
                dim
            )));
        }

        Ok(ParticlePositions { data, npart, dim })
    }

    pub fn get_npart(&self) -> usize {
        self.npart
    }

    pub fn get_dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn coord(&self, axis: usize, ipart: usize) -> T {
        self.data[ipart + axis * self.npart]
    }

    pub fn axis(&self, axis: usize) -> &'a [T] {
        &self.data[axis * self.npart..(axis + 1) * self.npart]
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }
}

/// Transposes particle-major rows (x0 y0 z0 x1 y1 z1 ...) into coordinate-major order.
pub fn to_coord_major<T: Copy>(rows: &[T], dim: usize) -> SsfResult<Vec<T>> {
    if dim == 0 || rows.len() % dim != 0 {
        return Err(SsfError::LengthMismatch(format!(
            "{} values do not split into rows of {}",
            rows.len(),
            dim
        )));
    }

    let npart = rows.len() / dim;

    let mut out = Vec::with_capacity(rows.len());

    for axis in 0..dim {
        out.extend((0..npart).map(|ipart| rows[ipart * dim + axis]));
    }

    Ok(out)
}

/// Wavevectors, one row of `dim` components per wavevector.
#[derive(Debug, Clone, Copy)]
pub struct Wavevectors<'a, T> {
    data: &'a [T],
    nq: usize,
    dim: usize,
}

impl<'a, T: Copy> Wavevectors<'a, T> {
    pub fn new(data: &'a [T], nq: usize, dim: usize) -> SsfResult<Wavevectors<'a, T>> {
        if data.len() != nq * dim {
            return Err(SsfError::LengthMismatch(format!(
                "{} wavevector components for {} wavevectors in {} dimensions",
                data.len(),
                nq,
                dim
            )));
        }

        Ok(Wavevectors { data, nq, dim })
    }

    pub fn get_nq(&self) -> usize {
        self.nq
    }

    pub fn get_dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn row(&self, iq: usize) -> &'a [T] {
        &self.data[iq * self.dim..(iq + 1) * self.dim]
    }
}

/// Per (wavevector, group) sums of sin(q.r) and cos(q.r), index `iq * group_count + ig`.
#[derive(Debug, Clone)]
pub struct PartialSums<T> {
    sin: Vec<T>,
    cos: Vec<T>,
    nq: usize,
    group_count: usize,
}

impl<T: Float> PartialSums<T> {
    pub fn new(nq: usize, group_count: usize) -> PartialSums<T> {
        PartialSums {
            sin: vec![T::zero(); nq * group_count],
            cos: vec![T::zero(); nq * group_count],
            nq,
            group_count,
        }
    }

    /// Resizes to `nq x group_count` keeping the allocation where possible.
    pub fn reshape(&mut self, nq: usize, group_count: usize) {
        let n = nq * group_count;

        self.sin.clear();
        self.sin.resize(n, T::zero());
        self.cos.clear();
        self.cos.resize(n, T::zero());

        self.nq = nq;
        self.group_count = group_count;
    }

    pub fn get_nq(&self) -> usize {
        self.nq
    }

    pub fn get_group_count(&self) -> usize {
        self.group_count
    }

    #[inline]
    pub fn get(&self, iq: usize, ig: usize) -> (T, T) {
        let i = iq * self.group_count + ig;

        (self.sin[i], self.cos[i])
    }

    #[inline]
    pub fn set(&mut self, iq: usize, ig: usize, sin: T, cos: T) {
        let i = iq * self.group_count + ig;

        self.sin[i] = sin;
        self.cos[i] = cos;
    }

    pub fn row(&self, iq: usize) -> (&[T], &[T]) {
        let range = iq * self.group_count..(iq + 1) * self.group_count;

        (&self.sin[range.clone()], &self.cos[range])
    }
}

/// Final S(q) values, one per wavevector or one per finalize group.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureFactor<T> {
    values: Vec<T>,
    layout: FinalizeLayout,
}

impl<T: Float> StructureFactor<T> {
    pub fn new(values: Vec<T>, layout: FinalizeLayout) -> StructureFactor<T> {
        StructureFactor { values, layout }
    }

    pub fn empty(layout: FinalizeLayout) -> StructureFactor<T> {
        StructureFactor {
            values: Vec::new(),
            layout,
        }
    }

    pub fn get_layout(&self) -> FinalizeLayout {
        self.layout
    }

    pub fn is_per_wavevector(&self) -> bool {
        self.layout == FinalizeLayout::PerWavevector
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum over all values; combines per-group output into the full sum over wavevectors.
    pub fn total(&self) -> T {
        self.values.iter().fold(T::zero(), |acc, v| acc + *v)
    }
}
