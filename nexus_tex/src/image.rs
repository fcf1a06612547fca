// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    color::convert,
    error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// One luminosity byte per pixel.
    Grayscale,
    /// Red, green, blue.
    Rgb,
    /// Alpha, red, green, blue.
    Argb,
}

impl ImageFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            ImageFormat::Grayscale => 1,
            ImageFormat::Rgb => 3,
            ImageFormat::Argb => 4,
        }
    }
}

/// An 8-bit interleaved image. The buffer size always matches the dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    format: ImageFormat,
    data: Vec<u8>,
}

impl Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Image{{ {}x{} {:?}, [{} bytes] }}",
            self.width,
            self.height,
            self.format,
            self.data.len()
        )
    }
}

impl Image {
    /// Number of bytes of a `width` x `height` image in `format`.
    pub fn buffer_size(width: usize, height: usize, format: ImageFormat) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageDimensions(width, height));
        }
        width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
            .ok_or(Error::InvalidImageDimensions(width, height))
    }

    pub fn new(width: usize, height: usize, format: ImageFormat, data: Vec<u8>) -> Result<Image> {
        let expected = Image::buffer_size(width, height, format)?;
        if data.len() != expected {
            return Err(Error::InvalidImageSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Image {
            width,
            height,
            format,
            data,
        })
    }

    /// An image with every pixel set to `pixel`, given in `format` channel order.
    pub fn new_filled(
        width: usize,
        height: usize,
        format: ImageFormat,
        pixel: &[u8],
    ) -> Result<Image> {
        if pixel.len() != format.bytes_per_pixel() {
            return Err(Error::InvalidImageSize {
                expected: format.bytes_per_pixel(),
                actual: pixel.len(),
            });
        }
        let data = pixel.repeat(Image::buffer_size(width, height, format)? / pixel.len());
        Image::new(width, height, format, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let bpp = self.format.bytes_per_pixel();
        &self.data[(y * self.width + x) * bpp..][..bpp]
    }

    /// Converts to another format. Alpha is opaque when added and dropped when removed.
    pub fn to_format(&self, format: ImageFormat) -> Image {
        if format == self.format {
            return self.clone();
        }
        Image {
            width: self.width,
            height: self.height,
            format,
            data: convert::convert(&self.data, self.format, format),
        }
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn size_is_validated() {
        assert!(Image::new(2, 2, ImageFormat::Rgb, vec![0; 12]).is_ok());
        assert_eq!(
            Image::new(2, 2, ImageFormat::Argb, vec![0; 12]).unwrap_err(),
            Error::InvalidImageSize {
                expected: 16,
                actual: 12
            }
        );
        assert_eq!(
            Image::new(0, 2, ImageFormat::Grayscale, vec![]).unwrap_err(),
            Error::InvalidImageDimensions(0, 2)
        );
        assert!(Image::new(usize::MAX, 3, ImageFormat::Argb, vec![]).is_err());
    }

    #[test]
    fn filled_and_pixel_access() -> Result<()> {
        let image = Image::new_filled(3, 2, ImageFormat::Argb, &[1, 2, 3, 4])?;
        assert_eq!(image.data().len(), 24);
        assert_eq!(image.pixel(2, 1), &[1, 2, 3, 4]);
        assert!(Image::new_filled(3, 2, ImageFormat::Rgb, &[1, 2]).is_err());
        Ok(())
    }

    #[test]
    fn format_conversion() -> Result<()> {
        let image = Image::new(2, 1, ImageFormat::Rgb, vec![10, 20, 30, 255, 255, 255])?;
        let argb = image.to_format(ImageFormat::Argb);
        assert_eq!(argb.data(), &[255, 10, 20, 30, 255, 255, 255, 255]);
        assert_eq!(argb.to_format(ImageFormat::Rgb), image);
        let gray = image.to_format(ImageFormat::Grayscale);
        assert_eq!(gray.data(), &[19, 255]);
        Ok(())
    }
}
