// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_SIZE,
    bit_reader::BitReader,
    entropy_coding::huffman::HuffmanTable,
    error::{Error, Result},
};

pub const END_OF_BLOCK: u8 = 0x00;
pub const ZERO_RUN_16: u8 = 0xF0;

/// Reads one Huffman coded symbol, one bit at a time past the shortest code length.
pub fn read_symbol(br: &mut BitReader, table: &HuffmanTable) -> Result<u8> {
    let mut length = table.min_decodable_length();
    let mut code = br.read(length)?;
    loop {
        if table.has_codes_of_length(length) {
            if let Some(symbol) = table.decode(code, length) {
                return Ok(symbol);
            }
        }
        if length >= table.max_decodable_length() {
            return Err(Error::InvalidHuffmanCode { code, length });
        }
        code = (code << 1) | br.read(1)?;
        length += 1;
    }
}

/// Maps `num_bits` raw bits to a signed value: the upper half of the range is
/// positive, the lower half negative.
/// ```
/// # use nexus_tex::entropy_coding::decode::extend_sign;
/// assert_eq!(extend_sign(0b101, 3), 5);
/// assert_eq!(extend_sign(0b010, 3), -5);
/// assert_eq!(extend_sign(0, 0), 0);
/// ```
pub fn extend_sign(value: u32, num_bits: usize) -> i32 {
    if num_bits == 0 {
        return 0;
    }
    let value = value as i32;
    if value < (1 << (num_bits - 1)) {
        value - ((1 << num_bits) - 1)
    } else {
        value
    }
}

/// Decodes the coefficients of one block, in scan order, into `coefficients`.
///
/// `dc_predictor` holds the DC value of the previous block of the same
/// channel and is updated with the DC value of this block.
pub fn decode_block(
    br: &mut BitReader,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable,
    dc_predictor: &mut i32,
    coefficients: &mut [i32; BLOCK_SIZE],
) -> Result<()> {
    coefficients.fill(0);

    let num_bits = read_symbol(br, dc_table)? as usize;
    let difference = extend_sign(br.read(num_bits)?, num_bits);
    *dc_predictor = dc_predictor
        .checked_add(difference)
        .ok_or(Error::DcOverflow(*dc_predictor, difference))?;
    coefficients[0] = *dc_predictor;

    let mut position = 1;
    while position < BLOCK_SIZE {
        let symbol = read_symbol(br, ac_table)?;
        match symbol {
            END_OF_BLOCK => break,
            ZERO_RUN_16 => {
                if position + 16 > BLOCK_SIZE {
                    return Err(Error::CoefficientOverflow(position + 16));
                }
                position += 16;
            }
            _ => {
                position += (symbol >> 4) as usize;
                if position >= BLOCK_SIZE {
                    return Err(Error::CoefficientOverflow(position));
                }
                let num_bits = (symbol & 0xF) as usize;
                coefficients[position] = extend_sign(br.read(num_bits)?, num_bits);
                position += 1;
            }
        }
    }
    Ok(())
}
