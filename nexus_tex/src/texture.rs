// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Per-mipmap access to a texture payload.
//!
//! A texture stores `mip_count` levels back to back, smallest first. Each level
//! is coded with the codec selected by the texture's [`TextureType`]. Levels are
//! addressed by index, where index 0 is the full resolution image.

use crate::{
    block_compression::{self, BlockCodec, BlockFormat},
    error::{Error, Result},
    image::{Image, ImageFormat},
    jpg::{self, DecodeOptions, JpgChannel, JpgParameters, JpgType},
    plain::{self, PlainFormat},
    util::tracing_wrappers::*,
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TextureType {
    Jpg1,
    Jpg2,
    Jpg3,
    Dxt1,
    Dxt3,
    Dxt5,
    Argb1,
    Argb2,
    Rgb,
    Grayscale,
}

/// How the levels of a texture are coded.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Codec {
    BlockCompressed(BlockFormat),
    Raw(PlainFormat),
    EntropyCoded(JpgType),
}

impl TextureType {
    /// Resolves the type from the raw header fields.
    pub fn from_header(is_jpg: bool, jpg_type: u32, format: u32) -> Result<TextureType> {
        let texture_type = if is_jpg {
            match jpg_type {
                0 => Some(TextureType::Jpg1),
                1 => Some(TextureType::Jpg2),
                2 => Some(TextureType::Jpg3),
                _ => None,
            }
        } else {
            match format {
                0 => Some(TextureType::Argb1),
                1 => Some(TextureType::Argb2),
                5 => Some(TextureType::Rgb),
                6 => Some(TextureType::Grayscale),
                13 => Some(TextureType::Dxt1),
                14 => Some(TextureType::Dxt3),
                15 => Some(TextureType::Dxt5),
                _ => None,
            }
        };
        texture_type.ok_or(Error::UnknownTextureType {
            is_jpg,
            jpg_type,
            format,
        })
    }

    /// The `(is_jpg, jpg_type, format)` header fields for this type.
    pub fn to_header(&self) -> (bool, u32, u32) {
        match self {
            TextureType::Jpg1 => (true, 0, 0),
            TextureType::Jpg2 => (true, 1, 0),
            TextureType::Jpg3 => (true, 2, 0),
            TextureType::Argb1 => (false, 0, 0),
            TextureType::Argb2 => (false, 0, 1),
            TextureType::Rgb => (false, 0, 5),
            TextureType::Grayscale => (false, 0, 6),
            TextureType::Dxt1 => (false, 0, 13),
            TextureType::Dxt3 => (false, 0, 14),
            TextureType::Dxt5 => (false, 0, 15),
        }
    }

    pub fn codec(&self) -> Codec {
        match self {
            TextureType::Jpg1 => Codec::EntropyCoded(JpgType::Type1),
            TextureType::Jpg2 => Codec::EntropyCoded(JpgType::Type2),
            TextureType::Jpg3 => Codec::EntropyCoded(JpgType::Type3),
            TextureType::Dxt1 => Codec::BlockCompressed(BlockFormat::Dxt1),
            TextureType::Dxt3 => Codec::BlockCompressed(BlockFormat::Dxt3),
            TextureType::Dxt5 => Codec::BlockCompressed(BlockFormat::Dxt5),
            TextureType::Argb1 => Codec::Raw(PlainFormat::Argb1),
            TextureType::Argb2 => Codec::Raw(PlainFormat::Argb2),
            TextureType::Rgb => Codec::Raw(PlainFormat::Rgb),
            TextureType::Grayscale => Codec::Raw(PlainFormat::Grayscale),
        }
    }

    /// Format of the decoded images.
    pub fn image_format(&self) -> ImageFormat {
        match self.codec() {
            Codec::Raw(format) => format.image_format(),
            Codec::BlockCompressed(_) | Codec::EntropyCoded(_) => ImageFormat::Argb,
        }
    }
}

/// Dimensions of the stored `level`, where level 0 is the smallest.
pub fn level_size(width: usize, height: usize, mip_count: usize, level: usize) -> (usize, usize) {
    let shift = mip_count.saturating_sub(level + 1);
    let scale = |dim: usize| dim.checked_shr(shift as u32).unwrap_or(0).max(1);
    (scale(width), scale(height))
}

/// Header fields needed to locate and decode the levels of a texture.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TextureInfo {
    /// Dimensions of the largest level.
    pub width: usize,
    pub height: usize,
    pub mip_count: usize,
    pub texture_type: TextureType,
    pub jpg_channels: [JpgChannel; 4],
    /// Byte size of every stored level, smallest first. Only entropy coded
    /// textures need these; the other codecs have fixed size levels.
    pub mip_sizes: Vec<usize>,
}

impl TextureInfo {
    pub fn new(width: usize, height: usize, mip_count: usize, texture_type: TextureType) -> Self {
        TextureInfo {
            width,
            height,
            mip_count,
            texture_type,
            jpg_channels: [JpgChannel::default(); 4],
            mip_sizes: Vec::new(),
        }
    }

    fn check_index(&self, index: usize) -> Result<usize> {
        if self.mip_count == 0 {
            return Err(Error::NoMipmaps);
        }
        if index >= self.mip_count {
            return Err(Error::MipmapIndexOutOfRange {
                index,
                count: self.mip_count,
            });
        }
        Ok(self.mip_count - 1 - index)
    }

    fn stored_size(&self, level: usize) -> Result<usize> {
        let (width, height) = level_size(self.width, self.height, self.mip_count, level);
        match self.texture_type.codec() {
            Codec::BlockCompressed(format) => Ok(format.data_size(width, height)),
            Codec::Raw(format) => Ok(format.data_size(width, height)),
            Codec::EntropyCoded(_) => {
                self.mip_sizes
                    .get(level)
                    .copied()
                    .ok_or(Error::MipmapIndexOutOfRange {
                        index: level,
                        count: self.mip_sizes.len(),
                    })
            }
        }
    }

    /// Byte range of the mipmap at `index` within the texture data.
    pub fn mipmap_range(&self, index: usize) -> Result<std::ops::Range<usize>> {
        let level = self.check_index(index)?;
        let mut offset = 0;
        for smaller in 0..level {
            offset += self.stored_size(smaller)?;
        }
        Ok(offset..offset + self.stored_size(level)?)
    }

    /// Dimensions of the mipmap at `index`.
    pub fn mipmap_size(&self, index: usize) -> Result<(usize, usize)> {
        let level = self.check_index(index)?;
        Ok(level_size(self.width, self.height, self.mip_count, level))
    }
}

/// A texture payload, without its header.
pub struct Texture<'a> {
    info: TextureInfo,
    data: &'a [u8],
    block_codec: Option<&'a dyn BlockCodec>,
    options: DecodeOptions,
}

impl<'a> Texture<'a> {
    pub fn new(info: TextureInfo, data: &'a [u8]) -> Self {
        Texture {
            info,
            data,
            block_codec: block_compression::default_codec(),
            options: DecodeOptions::default(),
        }
    }

    pub fn with_block_codec(mut self, codec: &'a dyn BlockCodec) -> Self {
        self.block_codec = Some(codec);
        self
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn info(&self) -> &TextureInfo {
        &self.info
    }

    /// Decodes the mipmap at `index`, where 0 is the largest.
    pub fn mipmap(&self, index: usize) -> Result<Image> {
        let range = self.info.mipmap_range(index)?;
        let (width, height) = self.info.mipmap_size(index)?;
        let data = self
            .data
            .get(range.clone())
            .ok_or(Error::MipmapOutOfBounds {
                offset: range.start,
                end: range.end,
                len: self.data.len(),
            })?;
        trace!(index, width, height, ?range, "decoding mipmap");
        match self.info.texture_type.codec() {
            Codec::BlockCompressed(format) => {
                let codec = self.block_codec.ok_or(Error::BlockCodecUnavailable)?;
                block_compression::decode(codec, data, format, width, height)
            }
            Codec::Raw(format) => plain::decode(data, format, width, height),
            Codec::EntropyCoded(jpg_type) => {
                let params = JpgParameters::with_channels(jpg_type, self.info.jpg_channels);
                jpg::decode(data, &params, width, height, &self.options)
            }
        }
    }

    /// Decodes every mipmap, largest first.
    pub fn mipmaps(&self) -> Result<Vec<Image>> {
        debug!(info = ?self.info, "decoding all mipmaps");
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..self.info.mip_count)
                .into_par_iter()
                .map(|index| self.mipmap(index))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            (0..self.info.mip_count)
                .map(|index| self.mipmap(index))
                .collect()
        }
    }
}

/// Encoded levels of a texture.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EncodedMipmaps {
    /// Levels back to back, smallest first.
    pub data: Vec<u8>,
    /// Byte size of every level, smallest first.
    pub sizes: Vec<usize>,
}

fn encode_level(
    image: &Image,
    texture_type: TextureType,
    jpg_channels: &[JpgChannel; 4],
    block_codec: Option<&dyn BlockCodec>,
) -> Result<Vec<u8>> {
    match texture_type.codec() {
        Codec::BlockCompressed(format) => {
            let codec = block_codec.ok_or(Error::BlockCodecUnavailable)?;
            block_compression::encode(codec, image, format)
        }
        Codec::Raw(format) => Ok(plain::encode(image, format)),
        Codec::EntropyCoded(jpg_type) => {
            jpg::encode(image, &JpgParameters::with_channels(jpg_type, *jpg_channels))
        }
    }
}

/// Encodes a chain of mipmaps, given in any order.
pub fn encode_mipmaps(
    images: &[Image],
    texture_type: TextureType,
    jpg_channels: [JpgChannel; 4],
    block_codec: Option<&dyn BlockCodec>,
) -> Result<EncodedMipmaps> {
    if images.is_empty() {
        return Err(Error::NoMipmaps);
    }
    let mut ordered: Vec<&Image> = images.iter().collect();
    ordered.sort_by_key(|image| image.width() * image.height());
    debug!(?texture_type, count = ordered.len(), "encoding mipmaps");

    #[cfg(feature = "parallel")]
    let levels: Vec<Vec<u8>> = {
        use rayon::prelude::*;
        ordered
            .par_iter()
            .map(|image| encode_level(image, texture_type, &jpg_channels, block_codec))
            .collect::<Result<_>>()?
    };
    #[cfg(not(feature = "parallel"))]
    let levels: Vec<Vec<u8>> = ordered
        .iter()
        .map(|image| encode_level(image, texture_type, &jpg_channels, block_codec))
        .collect::<Result<_>>()?;

    let sizes = levels.iter().map(Vec::len).collect();
    Ok(EncodedMipmaps {
        data: levels.concat(),
        sizes,
    })
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    const ALL_TYPES: [TextureType; 10] = [
        TextureType::Jpg1,
        TextureType::Jpg2,
        TextureType::Jpg3,
        TextureType::Dxt1,
        TextureType::Dxt3,
        TextureType::Dxt5,
        TextureType::Argb1,
        TextureType::Argb2,
        TextureType::Rgb,
        TextureType::Grayscale,
    ];

    #[test]
    fn header_fields() {
        for texture_type in ALL_TYPES {
            let (is_jpg, jpg_type, format) = texture_type.to_header();
            assert_eq!(
                TextureType::from_header(is_jpg, jpg_type, format),
                Ok(texture_type)
            );
        }
        assert_eq!(
            TextureType::from_header(false, 0, 2),
            Err(Error::UnknownTextureType {
                is_jpg: false,
                jpg_type: 0,
                format: 2
            })
        );
        assert!(TextureType::from_header(true, 3, 0).is_err());
    }

    #[test]
    fn mip_dimensions() {
        assert_eq!(level_size(256, 128, 9, 8), (256, 128));
        assert_eq!(level_size(256, 128, 9, 7), (128, 64));
        assert_eq!(level_size(256, 128, 9, 0), (1, 1));
        assert_eq!(level_size(256, 128, 9, 1), (2, 1));
        assert_eq!(level_size(5, 3, 1, 0), (5, 3));
    }

    #[test]
    fn raw_mipmap_ranges() -> Result<()> {
        let info = TextureInfo::new(4, 4, 3, TextureType::Argb1);
        assert_eq!(info.mipmap_range(2)?, 0..4);
        assert_eq!(info.mipmap_range(1)?, 4..20);
        assert_eq!(info.mipmap_range(0)?, 20..84);
        assert_eq!(info.mipmap_size(1)?, (2, 2));
        assert_eq!(
            info.mipmap_range(3),
            Err(Error::MipmapIndexOutOfRange { index: 3, count: 3 })
        );
        assert_eq!(
            TextureInfo::new(4, 4, 0, TextureType::Rgb).mipmap_range(0),
            Err(Error::NoMipmaps)
        );
        Ok(())
    }

    #[test]
    fn raw_texture() -> Result<()> {
        let small = Image::new(1, 1, ImageFormat::Grayscale, vec![7])?;
        let large = Image::new(2, 2, ImageFormat::Grayscale, vec![1, 2, 3, 4])?;
        let encoded = encode_mipmaps(
            &[large.clone(), small.clone()],
            TextureType::Grayscale,
            [JpgChannel::default(); 4],
            None,
        )?;
        assert_eq!(encoded.data, vec![7, 1, 2, 3, 4]);
        assert_eq!(encoded.sizes, vec![1, 4]);

        let info = TextureInfo::new(2, 2, 2, TextureType::Grayscale);
        let texture = Texture::new(info, &encoded.data);
        assert_eq!(texture.mipmaps()?, vec![large, small]);

        let truncated = Texture::new(
            TextureInfo::new(2, 2, 2, TextureType::Grayscale),
            &encoded.data[..4],
        );
        assert_eq!(
            truncated.mipmap(0),
            Err(Error::MipmapOutOfBounds {
                offset: 1,
                end: 5,
                len: 4
            })
        );
        Ok(())
    }

    #[test]
    fn jpg_texture() -> Result<()> {
        let mut channels = [JpgChannel::default(); 4];
        channels[0].default_value = Some(255);
        let images = [
            Image::new_filled(16, 8, ImageFormat::Argb, &[255, 128, 128, 128])?,
            Image::new_filled(8, 4, ImageFormat::Argb, &[255, 128, 128, 128])?,
        ];
        let encoded = encode_mipmaps(&images, TextureType::Jpg2, channels, None)?;
        assert_eq!(encoded.sizes.len(), 2);
        assert_eq!(encoded.sizes.iter().sum::<usize>(), encoded.data.len());
        assert!(encoded.sizes.iter().all(|size| size % 16 == 0));

        let mut info = TextureInfo::new(16, 8, 2, TextureType::Jpg2);
        info.jpg_channels = channels;
        info.mip_sizes = encoded.sizes.clone();
        let texture = Texture::new(info, &encoded.data);
        let decoded = texture.mipmaps()?;
        assert_eq!(decoded[0].size(), (16, 8));
        assert_eq!(decoded[1].size(), (8, 4));
        assert!(decoded[1].data().chunks(4).all(|p| p == [255, 128, 128, 128]));
        Ok(())
    }

    #[test]
    fn jpg_texture_requires_sizes() {
        let info = TextureInfo::new(8, 8, 1, TextureType::Jpg1);
        let texture = Texture::new(info, &[]);
        assert!(matches!(
            texture.mipmap(0),
            Err(Error::MipmapIndexOutOfRange { .. })
        ));
    }
}
