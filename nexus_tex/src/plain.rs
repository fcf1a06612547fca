// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Uncompressed texture formats.

use crate::{
    color::convert,
    error::{Error, Result},
    image::{Image, ImageFormat},
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum PlainFormat {
    /// 8-bit BGRA.
    Argb1,
    /// 8-bit BGRA, same layout as `Argb1`.
    Argb2,
    /// 16-bit little-endian 5:6:5 RGB.
    Rgb,
    /// 8-bit luminosity.
    Grayscale,
}

impl PlainFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PlainFormat::Argb1 | PlainFormat::Argb2 => 4,
            PlainFormat::Rgb => 2,
            PlainFormat::Grayscale => 1,
        }
    }

    /// Format of decoded images.
    pub fn image_format(&self) -> ImageFormat {
        match self {
            PlainFormat::Argb1 | PlainFormat::Argb2 => ImageFormat::Argb,
            PlainFormat::Rgb => ImageFormat::Rgb,
            PlainFormat::Grayscale => ImageFormat::Grayscale,
        }
    }

    pub fn data_size(&self, width: usize, height: usize) -> usize {
        width * height * self.bytes_per_pixel()
    }
}

pub fn decode(data: &[u8], format: PlainFormat, width: usize, height: usize) -> Result<Image> {
    let expected = format.data_size(width, height);
    if data.len() != expected {
        return Err(Error::InvalidDataSize {
            expected,
            actual: data.len(),
        });
    }
    let pixels = match format {
        PlainFormat::Argb1 | PlainFormat::Argb2 => convert::bgra_to_argb(data),
        PlainFormat::Rgb => convert::unpack_rgb565(data),
        PlainFormat::Grayscale => data.to_vec(),
    };
    Image::new(width, height, format.image_format(), pixels)
}

/// Stores an image of any format as `format`.
pub fn encode(image: &Image, format: PlainFormat) -> Vec<u8> {
    let pixels = image.to_format(format.image_format());
    match format {
        PlainFormat::Argb1 | PlainFormat::Argb2 => convert::argb_to_bgra(pixels.data()),
        PlainFormat::Rgb => convert::pack_rgb565(pixels.data()),
        PlainFormat::Grayscale => pixels.into_data(),
    }
}
