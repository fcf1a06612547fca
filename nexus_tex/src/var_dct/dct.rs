// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::f64::consts::{FRAC_1_SQRT_2, PI};
use std::sync::OnceLock;

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    error::{Error, Result},
};

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// `alpha(u) * cos((2x + 1) * u * pi / 16)`, indexed as `[u][x]`.
fn dct_coefficients() -> &'static [[f64; BLOCK_DIM]; BLOCK_DIM] {
    static COEFFICIENTS: OnceLock<[[f64; BLOCK_DIM]; BLOCK_DIM]> = OnceLock::new();
    COEFFICIENTS.get_or_init(|| {
        let mut matrix = [[0.0f64; BLOCK_DIM]; BLOCK_DIM];
        for (u, row) in matrix.iter_mut().enumerate() {
            let alpha_u = alpha(u);
            for (x, element) in row.iter_mut().enumerate() {
                *element = alpha_u
                    * ((2 * x + 1) as f64 * u as f64 * PI / (2 * BLOCK_DIM) as f64).cos();
            }
        }
        matrix
    })
}

fn check_region(data: &[i32], offset: usize, stride: usize) -> Result<()> {
    if stride < BLOCK_DIM || offset + (BLOCK_DIM - 1) * stride + BLOCK_DIM > data.len() {
        return Err(Error::BlockOutOfBounds {
            offset,
            stride,
            len: data.len(),
        });
    }
    Ok(())
}

fn load(data: &[i32], offset: usize, stride: usize) -> [f64; BLOCK_SIZE] {
    let mut block = [0.0; BLOCK_SIZE];
    for y in 0..BLOCK_DIM {
        let row = &data[offset + y * stride..][..BLOCK_DIM];
        for x in 0..BLOCK_DIM {
            block[y * BLOCK_DIM + x] = row[x] as f64;
        }
    }
    block
}

fn store(block: &[f64; BLOCK_SIZE], data: &mut [i32], offset: usize, stride: usize) {
    for y in 0..BLOCK_DIM {
        let row = &mut data[offset + y * stride..][..BLOCK_DIM];
        for x in 0..BLOCK_DIM {
            row[x] = (block[y * BLOCK_DIM + x] / 4.0).round() as i32;
        }
    }
}

/// Applies `weight(k, j)` as a 1D transform to every row, or every column, of an 8x8 block.
fn transform_1d(
    input: &[f64; BLOCK_SIZE],
    along_rows: bool,
    weight: impl Fn(usize, usize) -> f64,
) -> [f64; BLOCK_SIZE] {
    let mut out = [0.0; BLOCK_SIZE];
    for a in 0..BLOCK_DIM {
        for k in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for j in 0..BLOCK_DIM {
                let value = if along_rows {
                    input[a * BLOCK_DIM + j]
                } else {
                    input[j * BLOCK_DIM + a]
                };
                sum += weight(k, j) * value;
            }
            if along_rows {
                out[a * BLOCK_DIM + k] = sum;
            } else {
                out[k * BLOCK_DIM + a] = sum;
            }
        }
    }
    out
}

/// In-place forward 2D DCT of the 8x8 region starting at `offset`, with rows
/// `stride` samples apart. Coefficients are stored row-major with the
/// horizontal frequency varying fastest and rounded to the nearest integer.
pub fn forward_dct(data: &mut [i32], offset: usize, stride: usize) -> Result<()> {
    check_region(data, offset, stride)?;
    let c = dct_coefficients();
    let pixels = load(data, offset, stride);
    let rows = transform_1d(&pixels, true, |u, x| c[u][x]);
    let coefficients = transform_1d(&rows, false, |v, y| c[v][y]);
    store(&coefficients, data, offset, stride);
    Ok(())
}

/// In-place inverse of [`forward_dct`], rounded to the nearest integer.
pub fn inverse_dct(data: &mut [i32], offset: usize, stride: usize) -> Result<()> {
    check_region(data, offset, stride)?;
    let c = dct_coefficients();
    let coefficients = load(data, offset, stride);
    let rows = transform_1d(&coefficients, true, |x, u| c[u][x]);
    let pixels = transform_1d(&rows, false, |y, v| c[v][y]);
    store(&pixels, data, offset, stride);
    Ok(())
}
