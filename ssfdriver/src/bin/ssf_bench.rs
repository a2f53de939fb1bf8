use control::Control;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ssfconsts::*;
use ssfdriver::SsfDriver;
use ssftypes::to_coord_major;
use std::time::Instant;

const OUT_WIDTH1: usize = 28;

const NPART: usize = 50_000;
const NSAMPLE: usize = 4;
const NHARM: usize = 16;
const DIM: usize = 3;
const DENSITY: f64 = 0.8;

fn display_parallel_runtime_info() {
    let rayon_threads = rayon::current_num_threads();
    let rayon_env = std::env::var("RAYON_NUM_THREADS").unwrap_or_else(|_| "unset".to_string());
    let host_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(0);

    println!(
        "   {:<width1$} = {:>4} (RAYON_NUM_THREADS={}, host_threads={})",
        "rayon_threads",
        rayon_threads,
        rayon_env,
        host_threads,
        width1 = OUT_WIDTH1
    );
}

// particle-major rows, uniform in a cubic box
fn random_snapshot(rng: &mut StdRng, box_length: f64) -> Vec<f64> {
    (0..NPART * DIM)
        .map(|_| box_length * rng.gen::<f64>())
        .collect()
}

// harmonics of 2*pi/L along each box axis
fn axis_wavevectors(box_length: f64) -> Vec<f64> {
    let dq = TWOPI / box_length;
    let mut q = Vec::with_capacity(NHARM * DIM * DIM);

    for n in 1..=NHARM {
        for axis in 0..DIM {
            for k in 0..DIM {
                q.push(if k == axis { n as f64 * dq } else { 0.0 });
            }
        }
    }

    q
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut control = Control::new();

    if let Some(inpfile) = std::env::args().nth(1) {
        if let Err(e) = control.read_file(&inpfile) {
            eprintln!("{} : {}", inpfile, e);
            std::process::exit(1);
        }
    }

    control.display();
    display_parallel_runtime_info();
    println!();

    let box_length = (NPART as f64 / DENSITY).powf(1.0 / DIM as f64);

    let mut rng = StdRng::seed_from_u64(2008);

    let mut snapshots = Vec::with_capacity(NSAMPLE);

    for _ in 0..NSAMPLE {
        match to_coord_major(&random_snapshot(&mut rng, box_length), DIM) {
            Ok(r) => snapshots.push(r),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
    }

    let q = axis_wavevectors(box_length);

    println!(
        "Running ssf benchmark: npart = {}, nq = {}, samples = {}, box = {:.3}",
        NPART,
        q.len() / DIM,
        NSAMPLE,
        box_length
    );

    let driver = SsfDriver::new(control);

    let start = Instant::now();

    let report = match driver.run(&snapshots, &q, DIM) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let elapsed = start.elapsed();

    println!("engine time: {:.6} sec", report.get_engine_seconds());

    if let Some(speedup) = report.speedup() {
        println!("speedup over host sum: {:.1}", speedup);
    }

    println!("total time: {:.6} sec", elapsed.as_secs_f64());
}
