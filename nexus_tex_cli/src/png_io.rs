// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Cursor;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use nexus_tex::{
    color::convert,
    image::{Image, ImageFormat},
};

fn png_color(format: ImageFormat) -> png::ColorType {
    match format {
        ImageFormat::Grayscale => png::ColorType::Grayscale,
        ImageFormat::Rgb => png::ColorType::Rgb,
        ImageFormat::Argb => png::ColorType::Rgba,
    }
}

/// Encodes an image as an 8 bit PNG.
pub fn encode_png(image: &Image) -> Result<Vec<u8>> {
    let samples = match image.format() {
        ImageFormat::Argb => convert::argb_to_rgba(image.data()),
        ImageFormat::Grayscale | ImageFormat::Rgb => image.data().to_vec(),
    };
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width() as u32, image.height() as u32);
        encoder.set_color(png_color(image.format()));
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&samples)?;
        writer.finish()?;
    }
    Ok(buf)
}

/// Decodes a PNG of any color type into an 8 bit image.
pub fn decode_png(bytes: &[u8]) -> Result<Image> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let width = reader.info().width as usize;
    let height = reader.info().height as usize;
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != png::BitDepth::Eight {
        return Err(eyre!("Unsupported PNG bit depth {bit_depth:?}"));
    }
    let mut samples = vec![0u8; width * height * color_type.samples()];
    reader.next_frame(&mut samples)?;

    let (format, data) = match color_type {
        png::ColorType::Grayscale => (ImageFormat::Grayscale, samples),
        png::ColorType::Rgb => (ImageFormat::Rgb, samples),
        png::ColorType::Rgba => (ImageFormat::Argb, convert::rgba_to_argb(&samples)),
        png::ColorType::GrayscaleAlpha => {
            let argb = samples
                .chunks_exact(2)
                .flat_map(|p| [p[1], p[0], p[0], p[0]])
                .collect();
            (ImageFormat::Argb, argb)
        }
        png::ColorType::Indexed => return Err(eyre!("Palette was not expanded")),
    };
    Ok(Image::new(width, height, format, data)?)
}

pub fn read_png(path: &Path) -> Result<Image> {
    let bytes =
        std::fs::read(path).wrap_err_with(|| format!("Cannot read {}", path.display()))?;
    decode_png(&bytes).wrap_err_with(|| format!("Cannot decode {}", path.display()))
}

pub fn write_png(path: &Path, image: &Image) -> Result<()> {
    std::fs::write(path, encode_png(image)?)
        .wrap_err_with(|| format!("Cannot write {}", path.display()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn png_round_trip() -> Result<()> {
        for (format, pixel) in [
            (ImageFormat::Argb, &[10u8, 20, 30, 40][..]),
            (ImageFormat::Rgb, &[50, 60, 70][..]),
            (ImageFormat::Grayscale, &[80][..]),
        ] {
            let image = Image::new_filled(3, 2, format, pixel)?;
            assert_eq!(decode_png(&encode_png(&image)?)?, image);
        }
        Ok(())
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_png(b"not a png").is_err());
    }
}
