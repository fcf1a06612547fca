// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

#[rustfmt::skip]
pub const LUMA_QUANT_TABLE: [u8; BLOCK_SIZE] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

#[rustfmt::skip]
pub const CHROMA_QUANT_TABLE: [u8; BLOCK_SIZE] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// A base table scaled for a quality factor, in row-major block order.
pub type QuantTable = [f32; BLOCK_SIZE];

fn quality_scale(quality: i32) -> f32 {
    if quality <= 0 {
        0.02
    } else if quality >= 100 {
        1.0
    } else {
        (200 - quality * 2) as f32 * 0.01
    }
}

/// Scales `base` for a quality factor in `0..=100`. Quality factors up to 50,
/// and 100 itself, keep the base table unchanged.
pub fn adjust_quant_table(base: &[u8; BLOCK_SIZE], quality: i32) -> QuantTable {
    let scale = quality_scale(quality);
    if scale >= 1.0 {
        return base.map(f32::from);
    }
    base.map(|q| (q as f32 * scale).clamp(1.0, 255.0))
}

/// Divides each coefficient by its table entry, rounding half to even.
pub fn quantize(coefficients: &mut [i32; BLOCK_SIZE], table: &QuantTable) {
    for (c, q) in coefficients.iter_mut().zip(table.iter()) {
        *c = (*c as f32 / q).round_ties_even() as i32;
    }
}

/// Multiplies each coefficient by its table entry, truncating toward zero.
pub fn dequantize(coefficients: &mut [i32; BLOCK_SIZE], table: &QuantTable) {
    for (c, q) in coefficients.iter_mut().zip(table.iter()) {
        *c = (*c as f32 * q) as i32;
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::util::test::assert_almost_eq;

    #[test]
    fn full_quality_keeps_base() {
        assert_eq!(
            adjust_quant_table(&LUMA_QUANT_TABLE, 100),
            LUMA_QUANT_TABLE.map(f32::from)
        );
        assert_eq!(
            adjust_quant_table(&CHROMA_QUANT_TABLE, 250),
            CHROMA_QUANT_TABLE.map(f32::from)
        );
        assert_eq!(
            adjust_quant_table(&LUMA_QUANT_TABLE, 25),
            LUMA_QUANT_TABLE.map(f32::from)
        );
    }

    #[test]
    fn zero_quality_is_clamped() {
        for quality in [0, -5] {
            let table = adjust_quant_table(&LUMA_QUANT_TABLE, quality);
            for (scaled, &base) in table.iter().zip(LUMA_QUANT_TABLE.iter()) {
                assert_eq!(*scaled, (base as f32 * 0.02).clamp(1.0, 255.0));
            }
            assert_eq!(table[0], 1.0);
            assert_almost_eq!(table[37], 109.0 * 0.02, 1e-5);
        }
    }

    #[test]
    fn intermediate_quality() {
        let table = adjust_quant_table(&CHROMA_QUANT_TABLE, 75);
        assert_almost_eq!(table[0], 8.5, 1e-5);
        assert_almost_eq!(table[63], 49.5, 1e-5);
        let table = adjust_quant_table(&CHROMA_QUANT_TABLE, 99);
        assert!(table.iter().all(|&q| q >= 1.0));
    }

    #[test]
    fn quantize_rounds_half_to_even() {
        let mut table = [2.0; BLOCK_SIZE];
        table[3] = 3.0;
        let mut coefficients = [0; BLOCK_SIZE];
        coefficients[0] = 5;
        coefficients[1] = 7;
        coefficients[2] = -5;
        coefficients[3] = 10;
        quantize(&mut coefficients, &table);
        assert_eq!(&coefficients[..4], &[2, 4, -2, 3]);
    }

    #[test]
    fn dequantize_truncates() {
        let table = [2.5; BLOCK_SIZE];
        let mut coefficients = [0; BLOCK_SIZE];
        coefficients[0] = 3;
        coefficients[1] = -3;
        coefficients[2] = 4;
        dequantize(&mut coefficients, &table);
        assert_eq!(&coefficients[..3], &[7, -7, 10]);
    }
}
