// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Cannot push {requested} bits into a bit queue with {available} bits of free space")]
    BitQueueOverflow { requested: usize, available: usize },
    #[error("Cannot pop {requested} bits from a bit queue holding {available} bits")]
    BitQueueUnderflow { requested: usize, available: usize },
    #[error("Truncated stream: {requested} bits requested, {available} bits available")]
    Truncated { requested: usize, available: usize },
    #[error("Huffman table has {count} codes of length {length}, more than fit")]
    HuffmanTableOverfull { length: usize, count: usize },
    #[error("Huffman table declares {expected} symbols, but only {actual} are given")]
    HuffmanSymbolsTooShort { expected: usize, actual: usize },
    #[error("Invalid Huffman code {code:#b} of length {length}")]
    InvalidHuffmanCode { code: u32, length: usize },
    #[error("Coefficient run overflows the block at position {0}")]
    CoefficientOverflow(usize),
    #[error("No Huffman code for DC difference {0}")]
    NoDcEncoding(i32),
    #[error("No Huffman code for AC symbol {0:#04x}")]
    NoAcEncoding(u8),
    #[error("AC coefficient {0} needs more than 15 bits")]
    AcValueTooLarge(i32),
    #[error("Block at offset {offset} with stride {stride} does not fit a buffer of {len} samples")]
    BlockOutOfBounds {
        offset: usize,
        stride: usize,
        len: usize,
    },
    #[error("Row stride {stride} is smaller than the row width {width}")]
    InvalidStride { stride: usize, width: usize },
    #[error("Resampling needs {required} samples, but the buffer holds {len}")]
    ResampleOutOfBounds { required: usize, len: usize },
    #[error("Invalid image dimensions: {0}x{1}")]
    InvalidImageDimensions(usize, usize),
    #[error("Image buffer has {actual} bytes, expected {expected}")]
    InvalidImageSize { expected: usize, actual: usize },
    #[error("DC value {0} + {1} overflows")]
    DcOverflow(i32, i32),
    #[error("Invalid jpg type {0}")]
    InvalidJpgType(u32),
    #[error("Unknown texture type: jpg {is_jpg}, jpg type {jpg_type}, format {format}")]
    UnknownTextureType {
        is_jpg: bool,
        jpg_type: u32,
        format: u32,
    },
    #[error("Mipmap {index} requested, texture has {count}")]
    MipmapIndexOutOfRange { index: usize, count: usize },
    #[error("Mipmap data at {offset}..{end} exceeds the {len} bytes of texture data")]
    MipmapOutOfBounds { offset: usize, end: usize, len: usize },
    #[error("Texture has no mipmaps")]
    NoMipmaps,
    #[error("Encoded data has {actual} bytes, expected {expected}")]
    InvalidDataSize { expected: usize, actual: usize },
    #[error("Block compression support is not available")]
    BlockCodecUnavailable,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
