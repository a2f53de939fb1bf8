//! Runs the structure factor engine over a series of snapshots, averages
//! the results and optionally checks every snapshot against the host sum.

mod report;
pub use report::*;

use control::Control;
use itertools::multizip;
use log::{debug, info, warn};
use num_traits::Float;
use ssf::SsfEngine;
use ssfhost::{compute_structure_factor_host, relative_deviation};
use ssftypes::*;
use std::time::Instant;

/// Folds per-wavevector values into the layout the finalize stage produced.
pub fn fold_to_layout(values: &[f64], layout: FinalizeLayout) -> Vec<f64> {
    match layout {
        FinalizeLayout::PerWavevector => values.to_vec(),

        FinalizeLayout::Strided { groups } => {
            let mut folded = vec![0.0; groups];

            for (iq, v) in values.iter().enumerate() {
                folded[iq % groups] += *v;
            }

            folded
        }
    }
}

#[derive(Debug, Clone)]
pub struct SsfDriver {
    control: Control,
}

impl SsfDriver {
    pub fn new(control: Control) -> SsfDriver {
        SsfDriver { control }
    }

    pub fn get_control(&self) -> &Control {
        &self.control
    }

    /// `snapshots` are coordinate-major positions, all with the same particle
    /// count. The engine runs in the precision the control asks for.
    pub fn run(
        &self,
        snapshots: &[Vec<f64>],
        wavevectors: &[f64],
        dim: usize,
    ) -> SsfResult<SsfReport> {
        if self.control.is_single_precision() {
            let snapshots: Vec<Vec<f32>> = snapshots
                .iter()
                .map(|r| r.iter().map(|x| *x as f32).collect())
                .collect();

            let wavevectors: Vec<f32> = wavevectors.iter().map(|x| *x as f32).collect();

            self.run_with::<f32>(&snapshots, &wavevectors, dim)
        } else {
            self.run_with::<f64>(snapshots, wavevectors, dim)
        }
    }

    pub fn run_with<T: Float + Send + Sync>(
        &self,
        snapshots: &[Vec<T>],
        wavevectors: &[T],
        dim: usize,
    ) -> SsfResult<SsfReport> {
        let first = snapshots
            .first()
            .ok_or_else(|| SsfError::InvalidParameter("no snapshots to average".to_string()))?;

        let npart = first.len() / dim.max(1);
        let nq = wavevectors.len() / dim.max(1);

        let params = SsfParams::new(npart, nq, dim)?;
        let wavevectors = Wavevectors::new(wavevectors, nq, dim)?;

        let grid = self.control.launch_grid(npart)?;
        let fgrid = self.control.finalize_grid()?;
        let layout = fgrid.get_layout();

        info!(
            "ssf: npart = {}, nq = {}, dim = {}, samples = {}, groups = {} x {}",
            npart,
            nq,
            dim,
            snapshots.len(),
            grid.group_count(),
            grid.get_group_size()
        );

        let mut engine = SsfEngine::<T>::new(grid, fgrid);

        let mut host = if self.control.get_host_check() {
            Some(HostCheck::new(self.control.get_check_tolerance()))
        } else {
            None
        };

        let mut sfact: Vec<f64> = Vec::new();
        let mut engine_seconds = 0.0;

        for (isample, r) in snapshots.iter().enumerate() {
            let positions = ParticlePositions::new(r, npart, dim)?;

            let stopwatch = Instant::now();

            let sf = engine.compute(&params, &positions, &wavevectors)?;

            engine_seconds += stopwatch.elapsed().as_secs_f64();

            let values: Vec<f64> = sf
                .as_slice()
                .iter()
                .map(|x| x.to_f64().unwrap_or(0.0))
                .collect();

            if sfact.is_empty() {
                sfact = vec![0.0; values.len()];
            }

            for (s, v) in multizip((sfact.iter_mut(), values.iter())) {
                *s += *v;
            }

            if let Some(check) = host.as_mut() {
                let stopwatch = Instant::now();

                let reference = compute_structure_factor_host(&positions, &wavevectors);

                check.add_time(stopwatch.elapsed().as_secs_f64());

                let reference = fold_to_layout(&reference, sf.get_layout());

                check.add_deviations(isample, &relative_deviation(&values, &reference));
            }

            debug!("sample {} : total S = {:.6E}", isample, sf.total().to_f64().unwrap_or(0.0));
        }

        let nsample = snapshots.len();

        for s in sfact.iter_mut() {
            *s /= nsample as f64;
        }

        let report = SsfReport::new(sfact, layout, npart, nq, nsample, engine_seconds, host);

        info!(
            "ssf: S / (nq * npart) = {:.6}, engine time = {:.3} s",
            report.normalized(),
            report.get_engine_seconds()
        );

        if let Some(check) = report.get_host_check() {
            info!(
                "ssf: host time = {:.3} s, speedup = {:.1}",
                check.get_host_seconds(),
                report.speedup().unwrap_or(0.0)
            );

            if !check.is_ok() {
                warn!(
                    "{} values deviate from the host sum by more than {:.3E}, max {:.3E}",
                    check.get_mismatches().len(),
                    check.get_tolerance(),
                    check.get_max_deviation()
                );
            }
        }

        if self.control.get_verbosity() == "high" {
            report.display();
        }

        Ok(report)
    }
}
