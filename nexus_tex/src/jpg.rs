// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! The JPEG-like codec used by the `Jpg1`, `Jpg2` and `Jpg3` texture types.
//!
//! Every image is coded as four channels. Each channel is split into 8x8
//! blocks which are transformed with a DCT, quantized and Huffman coded with
//! the standard JPEG tables. The three variants differ in how the channels
//! relate to the ARGB output and whether two of them are subsampled.

use std::ops::RangeInclusive;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    entropy_coding::huffman::{HuffmanTable, HuffmanTables},
    error::{Error, Result},
    var_dct::quant_weights::{CHROMA_QUANT_TABLE, LUMA_QUANT_TABLE},
};

pub mod context;
pub mod decode;
pub mod encode;

pub use decode::decode;
pub use encode::encode;

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, FromPrimitive)]
pub enum JpgType {
    /// Channels 1 and 2 at half resolution, combined through a YCoCg-like transform.
    Type1 = 0,
    /// Four independent full resolution channels holding A, R, G and B.
    Type2 = 1,
    /// Like `Type1`, without subsampling.
    Type3 = 2,
}

impl JpgType {
    pub fn from_u32(value: u32) -> Result<JpgType> {
        <JpgType as FromPrimitive>::from_u32(value).ok_or(Error::InvalidJpgType(value))
    }

    pub fn compression_types(&self) -> [CompressionType; 4] {
        use CompressionType::*;
        match self {
            JpgType::Type1 | JpgType::Type3 => [Luminance, Chrominance, Chrominance, Luminance],
            JpgType::Type2 => [Luminance; 4],
        }
    }

    pub fn is_subsampled(&self) -> bool {
        *self == JpgType::Type1
    }

    /// Side length of the unit the channel planes are padded to.
    pub fn macroblock_dim(&self) -> usize {
        if self.is_subsampled() {
            2 * BLOCK_DIM
        } else {
            BLOCK_DIM
        }
    }
}

/// Selects the Huffman tables, base quantization table and sample range of a channel.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum CompressionType {
    Luminance,
    Chrominance,
}

impl CompressionType {
    pub fn base_quant_table(&self) -> &'static [u8; BLOCK_SIZE] {
        match self {
            CompressionType::Luminance => &LUMA_QUANT_TABLE,
            CompressionType::Chrominance => &CHROMA_QUANT_TABLE,
        }
    }

    pub fn dc_table<'a>(&self, tables: &'a HuffmanTables) -> &'a HuffmanTable {
        match self {
            CompressionType::Luminance => &tables.luma_dc,
            CompressionType::Chrominance => &tables.chroma_dc,
        }
    }

    pub fn ac_table<'a>(&self, tables: &'a HuffmanTables) -> &'a HuffmanTable {
        match self {
            CompressionType::Luminance => &tables.luma_ac,
            CompressionType::Chrominance => &tables.chroma_ac,
        }
    }

    /// Offset between stored samples and the signed values that are transformed.
    pub fn level_shift(&self) -> i32 {
        match self {
            CompressionType::Luminance => 128,
            CompressionType::Chrominance => 0,
        }
    }

    /// Range of the samples of a decoded channel.
    pub fn sample_range(&self) -> RangeInclusive<i32> {
        match self {
            CompressionType::Luminance => 0..=255,
            CompressionType::Chrominance => -256..=255,
        }
    }
}

/// Coding parameters of one channel.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct JpgChannel {
    /// Quality factor, `0..=100`.
    pub quality: u8,
    /// If set, the channel is not stored and every sample has this value.
    pub default_value: Option<u8>,
}

impl Default for JpgChannel {
    fn default() -> Self {
        JpgChannel {
            quality: 100,
            default_value: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct JpgParameters {
    pub jpg_type: JpgType,
    pub channels: [JpgChannel; 4],
}

impl JpgParameters {
    /// All channels coded with the same quality.
    pub fn new(jpg_type: JpgType, quality: u8) -> JpgParameters {
        JpgParameters {
            jpg_type,
            channels: [JpgChannel {
                quality,
                default_value: None,
            }; 4],
        }
    }

    pub fn with_channels(jpg_type: JpgType, channels: [JpgChannel; 4]) -> JpgParameters {
        JpgParameters { jpg_type, channels }
    }

    /// Marks `channel` as not stored, with every sample equal to `value`.
    pub fn with_default_value(mut self, channel: usize, value: u8) -> JpgParameters {
        self.channels[channel].default_value = Some(value);
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeOptions {
    /// Return the blocks decoded so far instead of failing when the stream ends early.
    pub allow_truncated: bool,
}
