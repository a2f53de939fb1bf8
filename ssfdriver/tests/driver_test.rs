use control::Control;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ssfconsts::*;
use ssfdriver::*;
use ssfhost::compute_structure_factor_host;
use ssftypes::*;

const BOX_LENGTH: f64 = 6.0;

fn random_snapshots(nsample: usize, npart: usize, dim: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(17);

    (0..nsample)
        .map(|_| {
            (0..npart * dim)
                .map(|_| BOX_LENGTH * rng.gen::<f64>())
                .collect()
        })
        .collect()
}

fn wavevectors(nq: usize, dim: usize) -> Vec<f64> {
    let dq = TWOPI / BOX_LENGTH;

    (0..nq * dim)
        .map(|i| if i % (dim + 1) == 0 { (1 + i / dim) as f64 * dq } else { 0.5 * dq })
        .collect()
}

fn control(lines: &[&str]) -> Control {
    let mut control = Control::new();
    control.read_lines(&["verbosity = low"]).unwrap();
    control.read_lines(lines).unwrap();
    control
}

#[test]
fn test_average_matches_host_mean() {
    let (nsample, npart, dim, nq) = (3, 900, 3, 7);

    let snapshots = random_snapshots(nsample, npart, dim);
    let q = wavevectors(nq, dim);

    let driver = SsfDriver::new(control(&["block_size = 32", "host_check = true"]));
    let report = driver.run(&snapshots, &q, dim).unwrap();

    let mut mean = vec![0.0; nq];

    for r in snapshots.iter() {
        let positions = ParticlePositions::new(r, npart, dim).unwrap();
        let wv = Wavevectors::new(&q, nq, dim).unwrap();

        for (m, s) in mean.iter_mut().zip(compute_structure_factor_host(&positions, &wv)) {
            *m += s / nsample as f64;
        }
    }

    for (a, b) in report.get_sfact().iter().zip(mean.iter()) {
        assert!((a - b).abs() < EPS9 * npart as f64, "{} vs {}", a, b);
    }

    let expected = mean.iter().sum::<f64>() / (nq * npart) as f64;
    assert!((report.normalized() - expected).abs() < EPS9);

    let check = report.get_host_check().unwrap();
    assert!(check.is_ok(), "{:?}", check.get_mismatches());
    assert!(report.get_engine_seconds() >= 0.0);
}

#[test]
fn test_normalized_value_independent_of_launch_shape() {
    let (nsample, npart, dim, nq) = (2, 500, 2, 5);

    let snapshots = random_snapshots(nsample, npart, dim);
    let q = wavevectors(nq, dim);

    let reference = SsfDriver::new(control(&[]))
        .run(&snapshots, &q, dim)
        .unwrap()
        .normalized();

    let settings: Vec<Vec<&str>> = vec![
        vec!["block_size = 1", "grid_width = 3"],
        vec!["block_size = 16", "grid_height = 3"],
        vec!["block_size = 512", "finalize_block = 8"],
        vec!["finalize_groups = 2"],
        vec!["finalize_groups = 9", "finalize_block = 1"],
    ];

    for lines in settings.iter() {
        let report = SsfDriver::new(control(lines)).run(&snapshots, &q, dim).unwrap();

        assert!(
            (report.normalized() - reference).abs() < EPS9,
            "{:?}: {} vs {}",
            lines,
            report.normalized(),
            reference
        );
    }
}

#[test]
fn test_single_precision_tracks_double() {
    let (nsample, npart, dim, nq) = (2, 2000, 3, 4);

    let snapshots = random_snapshots(nsample, npart, dim);
    let q = wavevectors(nq, dim);

    let double = SsfDriver::new(control(&[])).run(&snapshots, &q, dim).unwrap();
    let single = SsfDriver::new(control(&["precision = single"]))
        .run(&snapshots, &q, dim)
        .unwrap();

    for (a, b) in single.get_sfact().iter().zip(double.get_sfact().iter()) {
        assert!((a - b).abs() < EPS3 * npart as f64, "{} vs {}", a, b);
    }
}

#[test]
fn test_bad_dimension_is_rejected() {
    let snapshots = random_snapshots(1, 10, 4);
    let q = vec![1.0; 8];

    match SsfDriver::new(control(&[])).run(&snapshots, &q, 4) {
        Err(SsfError::InvalidDimension(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}
