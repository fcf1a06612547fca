// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{BLOCK_DIM, BLOCK_SIZE};

/// Scan position of each coefficient, indexed by its row-major position in the block.
pub const NATURAL_TO_SCAN: [u8; BLOCK_SIZE] = [
    0, 1, 5, 6, 14, 15, 27, 28, 2, 4, 7, 13, 16, 26, 29, 42, 3, 8, 12, 17, 25, 30, 41, 43, 9, 11,
    18, 24, 31, 40, 44, 53, 10, 19, 23, 32, 39, 45, 52, 54, 20, 22, 33, 38, 46, 51, 55, 60, 21, 34,
    37, 47, 50, 56, 59, 61, 35, 36, 48, 49, 57, 58, 62, 63,
];

/// Row-major position of each coefficient, indexed by its scan position.
pub const SCAN_TO_NATURAL: [u8; BLOCK_SIZE] = invert(&NATURAL_TO_SCAN);

const fn invert(order: &[u8; BLOCK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut inverse = [0u8; BLOCK_SIZE];
    let mut i = 0;
    while i < BLOCK_SIZE {
        inverse[order[i] as usize] = i as u8;
        i += 1;
    }
    inverse
}

/// Reorders a row-major block into scan order.
pub fn to_scan_order<T: Copy>(natural: &[T; BLOCK_SIZE], scan: &mut [T; BLOCK_SIZE]) {
    for (n, &value) in natural.iter().enumerate() {
        scan[NATURAL_TO_SCAN[n] as usize] = value;
    }
}

/// Reorders a scan order block into row-major order.
pub fn to_natural_order<T: Copy>(scan: &[T; BLOCK_SIZE], natural: &mut [T; BLOCK_SIZE]) {
    for (n, value) in natural.iter_mut().enumerate() {
        *value = scan[NATURAL_TO_SCAN[n] as usize];
    }
}

/// Generates the zigzag scan: anti-diagonals, alternating direction.
#[cfg(test)]
fn zigzag_scan() -> Vec<usize> {
    let mut out = Vec::with_capacity(BLOCK_SIZE);
    for diagonal in 0..(2 * BLOCK_DIM - 1) {
        let mut cells: Vec<_> = (0..=diagonal)
            .map(|x| (x, diagonal - x))
            .filter(|&(x, y)| x < BLOCK_DIM && y < BLOCK_DIM)
            .collect();
        if diagonal % 2 == 1 {
            cells.reverse();
        }
        out.extend(cells.into_iter().map(|(x, y)| y * BLOCK_DIM + x));
    }
    out
}
