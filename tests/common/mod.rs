//! Synthetic volumes shared by the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use ndarray::{Array3, Array4};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn nii(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.nii"))
}

/// 2x2x1 volume with two components, voxel `n` in scan order holds
/// `(10 * n + 1, 10 * n + 2)`.
pub fn two_component_u8() -> Array4<u8> {
    let mut data = Array4::<u8>::zeros((2, 2, 1, 2));
    for y in 0..2 {
        for x in 0..2 {
            let n = (y * 2 + x) as u8;
            data[[x, y, 0, 0]] = 10 * n + 1;
            data[[x, y, 0, 1]] = 10 * n + 2;
        }
    }
    data
}

/// 2x2x1 mask with only the voxel at (x, y) set.
pub fn single_voxel_mask(x: usize, y: usize) -> Array3<i16> {
    let mut mask = Array3::<i16>::zeros((2, 2, 1));
    mask[[x, y, 0]] = 1;
    mask
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}
