// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Conversions between the interleaved 8-bit pixel layouts used by textures.

use byteorder::{ByteOrder, LittleEndian};

use crate::image::ImageFormat;

/// Perceptual luminosity of an RGB triple.
pub fn luminosity(r: u8, g: u8, b: u8) -> u8 {
    let value = 0.21f32 * r as f32 + 0.72 * g as f32 + 0.07 * b as f32;
    value.round_ties_even().clamp(0.0, 255.0) as u8
}

fn map_pixels<const IN: usize, const OUT: usize>(
    src: &[u8],
    f: impl Fn(&[u8; IN]) -> [u8; OUT],
) -> Vec<u8> {
    let mut dst = Vec::with_capacity(src.len() / IN * OUT);
    for pixel in src.chunks_exact(IN) {
        let Ok(pixel) = <&[u8; IN]>::try_from(pixel) else {
            continue;
        };
        dst.extend_from_slice(&f(pixel));
    }
    dst
}

pub fn gray_to_argb(src: &[u8]) -> Vec<u8> {
    map_pixels::<1, 4>(src, |&[v]| [0xFF, v, v, v])
}

pub fn gray_to_rgb(src: &[u8]) -> Vec<u8> {
    map_pixels::<1, 3>(src, |&[v]| [v, v, v])
}

pub fn rgb_to_argb(src: &[u8]) -> Vec<u8> {
    map_pixels::<3, 4>(src, |&[r, g, b]| [0xFF, r, g, b])
}

pub fn rgb_to_gray(src: &[u8]) -> Vec<u8> {
    map_pixels::<3, 1>(src, |&[r, g, b]| [luminosity(r, g, b)])
}

pub fn argb_to_rgb(src: &[u8]) -> Vec<u8> {
    map_pixels::<4, 3>(src, |&[_, r, g, b]| [r, g, b])
}

pub fn argb_to_gray(src: &[u8]) -> Vec<u8> {
    map_pixels::<4, 1>(src, |&[_, r, g, b]| [luminosity(r, g, b)])
}

pub fn argb_to_rgba(src: &[u8]) -> Vec<u8> {
    map_pixels::<4, 4>(src, |&[a, r, g, b]| [r, g, b, a])
}

pub fn rgba_to_argb(src: &[u8]) -> Vec<u8> {
    map_pixels::<4, 4>(src, |&[r, g, b, a]| [a, r, g, b])
}

pub fn argb_to_bgra(src: &[u8]) -> Vec<u8> {
    map_pixels::<4, 4>(src, |&[a, r, g, b]| [b, g, r, a])
}

pub fn bgra_to_argb(src: &[u8]) -> Vec<u8> {
    map_pixels::<4, 4>(src, |&[b, g, r, a]| [a, r, g, b])
}

/// Packs RGB triples into little-endian 5:6:5 words, red in the high bits.
pub fn pack_rgb565(src: &[u8]) -> Vec<u8> {
    map_pixels::<3, 2>(src, |&[r, g, b]| {
        let word = ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3);
        let mut out = [0u8; 2];
        LittleEndian::write_u16(&mut out, word);
        out
    })
}

/// Expands little-endian 5:6:5 words to RGB triples, replicating high bits
/// into the low bits so that full intensity maps to 255.
pub fn unpack_rgb565(src: &[u8]) -> Vec<u8> {
    map_pixels::<2, 3>(src, |word: &[u8; 2]| {
        let word = LittleEndian::read_u16(word);
        let r = ((word >> 11) & 0x1F) as u8;
        let g = ((word >> 5) & 0x3F) as u8;
        let b = (word & 0x1F) as u8;
        [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
    })
}

/// Converts interleaved pixels between image formats.
pub fn convert(src: &[u8], from: ImageFormat, to: ImageFormat) -> Vec<u8> {
    use ImageFormat::*;
    match (from, to) {
        (Grayscale, Grayscale) | (Rgb, Rgb) | (Argb, Argb) => src.to_vec(),
        (Grayscale, Rgb) => gray_to_rgb(src),
        (Grayscale, Argb) => gray_to_argb(src),
        (Rgb, Grayscale) => rgb_to_gray(src),
        (Rgb, Argb) => rgb_to_argb(src),
        (Argb, Grayscale) => argb_to_gray(src),
        (Argb, Rgb) => argb_to_rgb(src),
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn channel_swizzles() {
        let argb = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(argb_to_rgba(&argb), vec![2, 3, 4, 1, 6, 7, 8, 5]);
        assert_eq!(argb_to_bgra(&argb), vec![4, 3, 2, 1, 8, 7, 6, 5]);
        assert_eq!(rgba_to_argb(&argb_to_rgba(&argb)), argb);
        assert_eq!(bgra_to_argb(&argb_to_bgra(&argb)), argb);
        assert_eq!(argb_to_rgb(&argb), vec![2, 3, 4, 6, 7, 8]);
    }

    #[test]
    fn luminosity_weights() {
        assert_eq!(luminosity(0, 0, 0), 0);
        assert_eq!(luminosity(255, 255, 255), 255);
        assert_eq!(luminosity(100, 0, 0), 21);
        assert_eq!(luminosity(0, 100, 0), 72);
        assert_eq!(luminosity(0, 0, 100), 7);
        assert_eq!(gray_to_argb(&[9]), vec![255, 9, 9, 9]);
    }

    #[test]
    fn rgb565_extremes() {
        assert_eq!(pack_rgb565(&[255, 255, 255]), vec![0xFF, 0xFF]);
        assert_eq!(pack_rgb565(&[255, 0, 0]), vec![0x00, 0xF8]);
        assert_eq!(pack_rgb565(&[0, 0, 255]), vec![0x1F, 0x00]);
        assert_eq!(unpack_rgb565(&[0xFF, 0xFF]), vec![255, 255, 255]);
        assert_eq!(unpack_rgb565(&[0xE0, 0x07]), vec![0, 255, 0]);
    }

    #[test]
    fn rgb565_round_trip_is_close() {
        arbtest::arbtest(|u| {
            let rgb: [u8; 3] = u.arbitrary()?;
            let back = unpack_rgb565(&pack_rgb565(&rgb));
            assert_eq!(back.len(), 3);
            assert!(rgb[0].abs_diff(back[0]) <= 7);
            assert!(rgb[1].abs_diff(back[1]) <= 3);
            assert!(rgb[2].abs_diff(back[2]) <= 7);
            Ok(())
        });
    }

    #[test]
    fn incomplete_pixels_are_dropped() {
        assert_eq!(rgb_to_argb(&[1, 2, 3, 4]), vec![255, 1, 2, 3]);
    }
}
