use std::f64;

// pi

pub const PI: f64 = f64::consts::PI;
pub const TWOPI: f64 = 2.0 * f64::consts::PI;

// worker groups

pub const MAX_GROUP_SIZE: usize = 512;
pub const LOCKSTEP_WIDTH: usize = 32; // lanes that execute without a barrier
pub const SUPPORTED_GROUP_SIZES: [usize; 10] = [1, 2, 4, 8, 16, 32, 64, 128, 256, 512];

pub const DEFAULT_BLOCK_SIZE: usize = 64;
pub const DEFAULT_FINALIZE_BLOCK_SIZE: usize = 64;

// particle coordinates

pub const MAX_DIM: usize = 3;

// below this many phase evaluations (npart * nq) the groups run on one thread

pub const PARALLEL_MIN_WORK: usize = 1 << 16;

// numerical tolerances

pub const EPS0: f64 = 1E0;
pub const EPS1: f64 = 1E-1;
pub const EPS2: f64 = 1E-2;
pub const EPS3: f64 = 1E-3;
pub const EPS4: f64 = 1E-4;
pub const EPS5: f64 = 1E-5;
pub const EPS6: f64 = 1E-6;
pub const EPS7: f64 = 1E-7;
pub const EPS8: f64 = 1E-8;
pub const EPS9: f64 = 1E-9;
pub const EPS10: f64 = 1E-10;
pub const EPS12: f64 = 1E-12;
pub const EPS14: f64 = 1E-14;

#[test]
fn test_supported_group_sizes() {
    for (i, n) in SUPPORTED_GROUP_SIZES.iter().enumerate() {
        assert_eq!(*n, 1 << i);
        assert!(*n <= MAX_GROUP_SIZE);
    }

    assert!(LOCKSTEP_WIDTH.is_power_of_two());
}
