// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_SIZE,
    bit_writer::BitWriter,
    entropy_coding::{
        decode::{END_OF_BLOCK, ZERO_RUN_16},
        huffman::{HuffmanCode, HuffmanTable},
    },
    error::{Error, Result},
};

/// Largest number of raw bits an AC coefficient may use.
pub const MAX_AC_BITS: usize = 15;

/// Number of bits needed to represent `|value|`.
pub fn magnitude_bits(value: i32) -> usize {
    (32 - value.unsigned_abs().leading_zeros()) as usize
}

/// Inverse of [`extend_sign`](super::decode::extend_sign).
pub fn fold_sign(value: i32, num_bits: usize) -> u32 {
    if value < 0 {
        (value + (1 << num_bits) - 1) as u32
    } else {
        value as u32
    }
}

fn write_code(bw: &mut BitWriter, code: HuffmanCode) -> Result<()> {
    bw.write(code.code as u32, code.length as usize)
}

/// Encodes the coefficients of one block, given in scan order.
///
/// `dc_predictor` holds the DC value of the previous block of the same
/// channel and is updated with the DC value of this block.
pub fn encode_block(
    bw: &mut BitWriter,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    dc_predictor: &mut i32,
    coefficients: &[i32; BLOCK_SIZE],
) -> Result<()> {
    let difference = coefficients[0] - *dc_predictor;
    *dc_predictor = coefficients[0];
    let num_bits = magnitude_bits(difference);
    let code = u8::try_from(num_bits)
        .ok()
        .and_then(|symbol| dc_table.encode(symbol))
        .ok_or(Error::NoDcEncoding(difference))?;
    write_code(bw, code)?;
    bw.write(fold_sign(difference, num_bits), num_bits)?;

    let mut zeros = 0;
    for &value in &coefficients[1..] {
        if value == 0 {
            zeros += 1;
            continue;
        }
        while zeros >= 16 {
            let code = ac_table
                .encode(ZERO_RUN_16)
                .ok_or(Error::NoAcEncoding(ZERO_RUN_16))?;
            write_code(bw, code)?;
            zeros -= 16;
        }
        let num_bits = magnitude_bits(value);
        if num_bits > MAX_AC_BITS {
            return Err(Error::AcValueTooLarge(value));
        }
        let symbol = ((zeros << 4) | num_bits) as u8;
        let code = ac_table
            .encode(symbol)
            .ok_or(Error::NoAcEncoding(symbol))?;
        write_code(bw, code)?;
        bw.write(fold_sign(value, num_bits), num_bits)?;
        zeros = 0;
    }
    if zeros > 0 {
        let code = ac_table
            .encode(END_OF_BLOCK)
            .ok_or(Error::NoAcEncoding(END_OF_BLOCK))?;
        write_code(bw, code)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng};
    use test_log::test;

    use super::*;
    use crate::{
        bit_reader::BitReader,
        entropy_coding::{
            decode::{decode_block, extend_sign},
            huffman::HuffmanTables,
        },
    };

    #[test]
    fn magnitudes() {
        assert_eq!(magnitude_bits(0), 0);
        assert_eq!(magnitude_bits(1), 1);
        assert_eq!(magnitude_bits(-1), 1);
        assert_eq!(magnitude_bits(-2), 2);
        assert_eq!(magnitude_bits(255), 8);
        assert_eq!(magnitude_bits(-1024), 11);
    }

    #[test]
    fn fold_sign_inverts_extend_sign() {
        arbtest::arbtest(|u| {
            let value = u.int_in_range(-32767..=32767)?;
            let num_bits = magnitude_bits(value);
            assert_eq!(extend_sign(fold_sign(value, num_bits), num_bits), value);
            Ok(())
        });
    }

    #[test]
    fn sparse_blocks_decode_back() -> Result<()> {
        let tables = HuffmanTables::standard()?;
        let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(0);
        let mut blocks = vec![];
        for _ in 0..32 {
            let mut block = [0i32; BLOCK_SIZE];
            block[0] = rng.random_range(-1000..1000);
            for _ in 0..rng.random_range(0..12) {
                let index = rng.random_range(1..BLOCK_SIZE);
                block[index] = rng.random_range(-500..500);
            }
            blocks.push(block);
        }
        // A trailing non-zero coefficient needs no end of block marker.
        blocks[0][BLOCK_SIZE - 1] = 3;

        let mut bw = BitWriter::new();
        let mut predictor = 0;
        for block in &blocks {
            encode_block(
                &mut bw,
                &tables.luma_dc,
                &tables.luma_ac,
                &mut predictor,
                block,
            )?;
        }
        let data = bw.into_bytes()?;

        let mut br = BitReader::new(&data);
        let mut predictor = 0;
        let mut decoded = [0i32; BLOCK_SIZE];
        for block in &blocks {
            decode_block(
                &mut br,
                &tables.luma_dc,
                &tables.luma_ac,
                &mut predictor,
                &mut decoded,
            )?;
            assert_eq!(&decoded, block);
        }
        assert!(br.total_bits_available() < 8);
        Ok(())
    }

    #[test]
    fn long_zero_runs() -> Result<()> {
        let tables = HuffmanTables::standard()?;
        let mut block = [0i32; BLOCK_SIZE];
        block[40] = -7;
        let mut bw = BitWriter::new();
        encode_block(
            &mut bw,
            &tables.chroma_dc,
            &tables.chroma_ac,
            &mut 0,
            &block,
        )?;
        let data = bw.into_bytes()?;
        let mut decoded = [0i32; BLOCK_SIZE];
        decode_block(
            &mut BitReader::new(&data),
            &tables.chroma_dc,
            &tables.chroma_ac,
            &mut 0,
            &mut decoded,
        )?;
        assert_eq!(decoded, block);
        Ok(())
    }

    #[test]
    fn dc_out_of_range() -> Result<()> {
        let tables = HuffmanTables::standard()?;
        let mut block = [0i32; BLOCK_SIZE];
        block[0] = 4096;
        let mut bw = BitWriter::new();
        assert_eq!(
            encode_block(
                &mut bw,
                &tables.luma_dc,
                &tables.luma_ac,
                &mut 0,
                &block
            ),
            Err(Error::NoDcEncoding(4096))
        );
        Ok(())
    }

    #[test]
    fn ac_out_of_range() -> Result<()> {
        let tables = HuffmanTables::standard()?;
        let mut block = [0i32; BLOCK_SIZE];
        block[1] = 1 << 15;
        assert_eq!(
            encode_block(
                &mut BitWriter::new(),
                &tables.luma_dc,
                &tables.luma_ac,
                &mut 0,
                &block
            ),
            Err(Error::AcValueTooLarge(1 << 15))
        );
        // Fits in 15 bits, but the standard tables stop at 10.
        block[1] = 1 << 12;
        assert_eq!(
            encode_block(
                &mut BitWriter::new(),
                &tables.luma_dc,
                &tables.luma_ac,
                &mut 0,
                &block
            ),
            Err(Error::NoAcEncoding(0x0D))
        );
        Ok(())
    }
}
