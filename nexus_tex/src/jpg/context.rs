// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    bit_reader::BitReader,
    bit_writer::BitWriter,
    coeff_order::{to_natural_order, to_scan_order},
    entropy_coding::{decode::decode_block, encode::encode_block, huffman::HuffmanTables},
    error::{Error, Result},
    jpg::{CompressionType, JpgChannel, JpgParameters, JpgType},
    var_dct::quant_weights::{QuantTable, adjust_quant_table, dequantize, quantize},
};

/// State of one of the four channels.
#[derive(Debug)]
pub struct Component {
    pub compression: CompressionType,
    pub quant_table: QuantTable,
    pub default_value: Option<u8>,
    /// Samples of the padded plane, row-major.
    pub pixels: Vec<i32>,
    /// DC value of the last block coded in this channel.
    pub dc_predictor: i32,
}

impl Component {
    fn new(compression: CompressionType, channel: &JpgChannel, len: usize) -> Component {
        Component {
            compression,
            quant_table: adjust_quant_table(compression.base_quant_table(), channel.quality as i32),
            default_value: channel.default_value,
            pixels: vec![channel.default_value.map_or(0, i32::from); len],
            dc_predictor: 0,
        }
    }

    /// Whether the channel is present in the stream.
    pub fn is_coded(&self) -> bool {
        self.default_value.is_none()
    }

    /// Maps reconstructed values to stored samples.
    pub fn shift_and_clamp(&mut self, offset: usize, stride: usize) {
        shift_and_clamp(self.compression, &mut self.pixels, offset, stride);
    }

    /// Maps stored samples to signed values ready for the forward transform.
    pub fn unshift_and_clamp(&mut self, offset: usize, stride: usize) {
        unshift_and_clamp(self.compression, &mut self.pixels, offset, stride);
    }
}

pub(crate) fn shift_and_clamp(
    compression: CompressionType,
    data: &mut [i32],
    offset: usize,
    stride: usize,
) {
    let shift = compression.level_shift();
    let range = compression.sample_range();
    for_each_in_block(data, offset, stride, |v| {
        (v + shift).clamp(*range.start(), *range.end())
    });
}

pub(crate) fn unshift_and_clamp(
    compression: CompressionType,
    data: &mut [i32],
    offset: usize,
    stride: usize,
) {
    let shift = compression.level_shift();
    let range = compression.sample_range();
    for_each_in_block(data, offset, stride, |v| {
        v.clamp(*range.start(), *range.end()) - shift
    });
}

fn for_each_in_block(data: &mut [i32], offset: usize, stride: usize, f: impl Fn(i32) -> i32) {
    for y in 0..BLOCK_DIM {
        for value in &mut data[offset + y * stride..][..BLOCK_DIM] {
            *value = f(*value);
        }
    }
}

/// Per-call codec state: the four channel planes, padded to whole
/// macroblocks, and scratch space for the block in flight.
#[derive(Debug)]
pub struct Context {
    pub jpg_type: JpgType,
    pub width: usize,
    pub height: usize,
    /// Row stride of the channel planes.
    pub stride: usize,
    pub padded_height: usize,
    pub components: [Component; 4],
    tables: &'static HuffmanTables,
    scan: [i32; BLOCK_SIZE],
    /// Row-major coefficients or samples of the block in flight.
    pub block: [i32; BLOCK_SIZE],
}

impl Context {
    pub fn new(params: &JpgParameters, width: usize, height: usize) -> Result<Context> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageDimensions(width, height));
        }
        let dim = params.jpg_type.macroblock_dim();
        let invalid = Error::InvalidImageDimensions(width, height);
        let stride = width.checked_next_multiple_of(dim).ok_or(invalid.clone())?;
        let padded_height = height.checked_next_multiple_of(dim).ok_or(invalid.clone())?;
        let len = stride.checked_mul(padded_height).ok_or(invalid)?;
        let compression = params.jpg_type.compression_types();
        let components = array_init::array_init(|c| {
            Component::new(compression[c], &params.channels[c], len)
        });
        Ok(Context {
            jpg_type: params.jpg_type,
            width,
            height,
            stride,
            padded_height,
            components,
            tables: HuffmanTables::standard()?,
            scan: [0; BLOCK_SIZE],
            block: [0; BLOCK_SIZE],
        })
    }

    /// Top-left corners of the macroblocks, in coding order.
    pub fn macroblocks(&self) -> impl Iterator<Item = (usize, usize)> + use<> {
        let dim = self.jpg_type.macroblock_dim();
        let stride = self.stride;
        (0..self.padded_height)
            .step_by(dim)
            .flat_map(move |y| (0..stride).step_by(dim).map(move |x| (x, y)))
    }

    /// Index of sample `(x, y)` in a channel plane.
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    /// Decodes the next block of `channel` into [`Self::block`] as dequantized,
    /// row-major coefficients.
    pub fn read_block(&mut self, br: &mut BitReader, channel: usize) -> Result<()> {
        let component = &mut self.components[channel];
        decode_block(
            br,
            component.compression.dc_table(self.tables),
            component.compression.ac_table(self.tables),
            &mut component.dc_predictor,
            &mut self.scan,
        )?;
        to_natural_order(&self.scan, &mut self.block);
        dequantize(&mut self.block, &component.quant_table);
        Ok(())
    }

    /// Quantizes the row-major coefficients in [`Self::block`] and codes them
    /// as the next block of `channel`.
    pub fn write_block(&mut self, bw: &mut BitWriter, channel: usize) -> Result<()> {
        let component = &mut self.components[channel];
        quantize(&mut self.block, &component.quant_table);
        to_scan_order(&self.block, &mut self.scan);
        encode_block(
            bw,
            component.compression.dc_table(self.tables),
            component.compression.ac_table(self.tables),
            &mut component.dc_predictor,
            &self.scan,
        )
    }

    /// Copies [`Self::block`] into the plane of `channel` at `offset`.
    pub fn store_block(&mut self, channel: usize, offset: usize) {
        let pixels = &mut self.components[channel].pixels;
        for y in 0..BLOCK_DIM {
            pixels[offset + y * self.stride..][..BLOCK_DIM]
                .copy_from_slice(&self.block[y * BLOCK_DIM..][..BLOCK_DIM]);
        }
    }

    /// Copies the 8x8 area of the plane of `channel` at `offset` into [`Self::block`].
    pub fn load_block(&mut self, channel: usize, offset: usize) {
        let pixels = &self.components[channel].pixels;
        for y in 0..BLOCK_DIM {
            self.block[y * BLOCK_DIM..][..BLOCK_DIM]
                .copy_from_slice(&pixels[offset + y * self.stride..][..BLOCK_DIM]);
        }
    }
}
