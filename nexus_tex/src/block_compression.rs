// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! S3TC block compressed textures, through a pluggable [`BlockCodec`].

use crate::{
    color::convert,
    error::{Error, Result},
    image::{Image, ImageFormat},
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum BlockFormat {
    Dxt1,
    Dxt3,
    Dxt5,
}

impl BlockFormat {
    /// Bytes per 4x4 block.
    pub fn block_bytes(&self) -> usize {
        match self {
            BlockFormat::Dxt1 => 8,
            BlockFormat::Dxt3 | BlockFormat::Dxt5 => 16,
        }
    }

    pub fn data_size(&self, width: usize, height: usize) -> usize {
        width.div_ceil(4) * height.div_ceil(4) * self.block_bytes()
    }
}

/// Compresses and decompresses RGBA pixels.
pub trait BlockCodec: Send + Sync {
    fn compress(
        &self,
        format: BlockFormat,
        rgba: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>>;

    fn decompress(
        &self,
        format: BlockFormat,
        data: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>>;
}

#[cfg(feature = "squish")]
pub use squish_codec::SquishCodec;

#[cfg(feature = "squish")]
mod squish_codec {
    use squish::{Algorithm, COLOUR_WEIGHTS_UNIFORM, Format, Params};

    use super::{BlockCodec, BlockFormat};
    use crate::error::{Error, Result};

    /// [`BlockCodec`] backed by the `squish` crate, using cluster fit compression.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct SquishCodec;

    fn squish_format(format: BlockFormat) -> Format {
        match format {
            BlockFormat::Dxt1 => Format::Bc1,
            BlockFormat::Dxt3 => Format::Bc2,
            BlockFormat::Dxt5 => Format::Bc3,
        }
    }

    impl BlockCodec for SquishCodec {
        fn compress(
            &self,
            format: BlockFormat,
            rgba: &[u8],
            width: usize,
            height: usize,
        ) -> Result<Vec<u8>> {
            let expected = width * height * 4;
            if rgba.len() != expected {
                return Err(Error::InvalidDataSize {
                    expected,
                    actual: rgba.len(),
                });
            }
            let format = squish_format(format);
            let mut out = vec![0u8; format.compressed_size(width, height)];
            let params = Params {
                algorithm: Algorithm::ClusterFit,
                weights: COLOUR_WEIGHTS_UNIFORM,
                weigh_colour_by_alpha: false,
            };
            format.compress(rgba, width, height, params, &mut out);
            Ok(out)
        }

        fn decompress(
            &self,
            format: BlockFormat,
            data: &[u8],
            width: usize,
            height: usize,
        ) -> Result<Vec<u8>> {
            let expected = format.data_size(width, height);
            if data.len() != expected {
                return Err(Error::InvalidDataSize {
                    expected,
                    actual: data.len(),
                });
            }
            let mut out = vec![0u8; width * height * 4];
            squish_format(format).decompress(data, width, height, &mut out);
            Ok(out)
        }
    }
}

/// The codec used when none is given explicitly.
pub fn default_codec() -> Option<&'static dyn BlockCodec> {
    #[cfg(feature = "squish")]
    {
        static CODEC: SquishCodec = SquishCodec;
        Some(&CODEC)
    }
    #[cfg(not(feature = "squish"))]
    {
        None
    }
}

pub fn decode(
    codec: &dyn BlockCodec,
    data: &[u8],
    format: BlockFormat,
    width: usize,
    height: usize,
) -> Result<Image> {
    let rgba = codec.decompress(format, data, width, height)?;
    if rgba.len() != width * height * 4 {
        return Err(Error::InvalidDataSize {
            expected: width * height * 4,
            actual: rgba.len(),
        });
    }
    Image::new(width, height, ImageFormat::Argb, convert::rgba_to_argb(&rgba))
}

/// Compresses an image of any format.
pub fn encode(codec: &dyn BlockCodec, image: &Image, format: BlockFormat) -> Result<Vec<u8>> {
    let argb = image.to_format(ImageFormat::Argb);
    let rgba = convert::argb_to_rgba(argb.data());
    codec.compress(format, &rgba, image.width(), image.height())
}
