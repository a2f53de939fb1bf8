use itertools::multizip;
use num_traits::Float;
use ssftypes::*;

pub fn compute_structure_factor_host<T: Float>(
    positions: &ParticlePositions<T>,
    wavevectors: &Wavevectors<T>,
) -> Vec<f64> {
    let nq = wavevectors.get_nq();
    let npart = positions.get_npart();
    let dim = positions.get_dim().min(wavevectors.get_dim());

    let mut sfact = vec![0.0; nq];

    for (iq, s) in sfact.iter_mut().enumerate() {
        let q: Vec<f64> = wavevectors
            .row(iq)
            .iter()
            .map(|x| x.to_f64().unwrap_or(0.0))
            .collect();

        let mut sin_sum = 0.0;
        let mut cos_sum = 0.0;

        for ipart in 0..npart {
            let mut q_r = 0.0;

            for k in 0..dim {
                q_r += q[k] * positions.coord(k, ipart).to_f64().unwrap_or(0.0);
            }

            sin_sum += q_r.sin();
            cos_sum += q_r.cos();
        }

        *s = sin_sum * sin_sum + cos_sum * cos_sum;
    }

    sfact
}

/// |a - b| / |b| per entry, or |a - b| where b is zero.
pub fn relative_deviation(values: &[f64], reference: &[f64]) -> Vec<f64> {
    assert_eq!(values.len(), reference.len());

    multizip((values.iter(), reference.iter()))
        .map(|(a, b)| {
            if *b == 0.0 {
                (a - b).abs()
            } else {
                ((a - b) / b).abs()
            }
        })
        .collect()
}
