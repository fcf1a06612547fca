// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Box resampling of integer planes between full and reduced resolution.

use crate::error::{Error, Result};

/// Position of a rectangular area inside a flat, row-strided buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub offset: usize,
    pub stride: usize,
}

impl Region {
    pub fn new(offset: usize, stride: usize) -> Region {
        Region { offset, stride }
    }

    /// Checks that a `width` x `height` area at this region fits in `len` samples.
    pub fn check(&self, len: usize, width: usize, height: usize) -> Result<()> {
        if self.stride < width {
            return Err(Error::InvalidStride {
                stride: self.stride,
                width,
            });
        }
        if width == 0 || height == 0 {
            return Ok(());
        }
        let required = self.offset + (height - 1) * self.stride + width;
        if required > len {
            return Err(Error::ResampleOutOfBounds { required, len });
        }
        Ok(())
    }

    fn index(&self, x: usize, y: usize) -> usize {
        self.offset + y * self.stride + x
    }
}

/// Replicates every sample of a `width` x `height` source area into a
/// `factor` x `factor` square of the destination.
pub fn upsample(
    src: &[i32],
    src_region: Region,
    width: usize,
    height: usize,
    factor: usize,
    dst: &mut [i32],
    dst_region: Region,
) -> Result<()> {
    src_region.check(src.len(), width, height)?;
    dst_region.check(dst.len(), width * factor, height * factor)?;
    for y in 0..height {
        let first_row = dst_region.index(0, y * factor);
        for x in 0..width {
            let value = src[src_region.index(x, y)];
            dst[first_row + x * factor..][..factor].fill(value);
        }
        for copy in 1..factor {
            let row = dst_region.index(0, y * factor + copy);
            dst.copy_within(first_row..first_row + width * factor, row);
        }
    }
    Ok(())
}

/// Averages every `factor` x `factor` square of the source into one sample of
/// a `width` x `height` destination area. The average is truncated toward zero.
pub fn downsample(
    src: &[i32],
    src_region: Region,
    width: usize,
    height: usize,
    factor: usize,
    dst: &mut [i32],
    dst_region: Region,
) -> Result<()> {
    src_region.check(src.len(), width * factor, height * factor)?;
    dst_region.check(dst.len(), width, height)?;
    let area = (factor * factor) as i32;
    if area == 0 {
        return Ok(());
    }
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0;
            for dy in 0..factor {
                let row = &src[src_region.index(x * factor, y * factor + dy)..][..factor];
                sum += row.iter().sum::<i32>();
            }
            dst[dst_region.index(x, y)] = sum / area;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn upsample_replicates() -> Result<()> {
        let src = [1, 2, 3, 4];
        let mut dst = [0; 16];
        upsample(&src, Region::new(0, 2), 2, 2, 2, &mut dst, Region::new(0, 4))?;
        assert_eq!(dst, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
        Ok(())
    }

    #[test]
    fn upsample_into_strided_area() -> Result<()> {
        let src = [9, 8];
        let mut dst = [0; 18];
        upsample(&src, Region::new(0, 2), 2, 1, 2, &mut dst, Region::new(7, 6))?;
        assert_eq!(
            dst,
            [0, 0, 0, 0, 0, 0, 0, 9, 9, 8, 8, 0, 0, 9, 9, 8, 8, 0]
        );
        Ok(())
    }

    #[test]
    fn downsample_truncates() -> Result<()> {
        let src = [1, 2, 5, 5, 2, 2, 5, 6, -1, -2, 0, 0, -2, -2, 0, 0];
        let mut dst = [0; 4];
        downsample(&src, Region::new(0, 4), 2, 2, 2, &mut dst, Region::new(0, 2))?;
        assert_eq!(dst, [1, 5, -1, 0]);
        Ok(())
    }

    #[test]
    fn uniform_round_trip() -> Result<()> {
        arbtest::arbtest(|u| {
            let value = u.int_in_range(-256..=255)?;
            let factor = u.int_in_range(1..=4)?;
            let src = vec![value; 64];
            let mut big = vec![0; 64 * factor * factor];
            upsample(
                &src,
                Region::new(0, 8),
                8,
                8,
                factor,
                &mut big,
                Region::new(0, 8 * factor),
            )
            .unwrap();
            assert!(big.iter().all(|&v| v == value));
            let mut small = vec![0; 64];
            downsample(
                &big,
                Region::new(0, 8 * factor),
                8,
                8,
                factor,
                &mut small,
                Region::new(0, 8),
            )
            .unwrap();
            assert_eq!(small, src);
            Ok(())
        });
        Ok(())
    }

    #[test]
    fn bounds_are_checked() {
        let src = [0; 4];
        let mut dst = [0; 15];
        assert_eq!(
            upsample(&src, Region::new(0, 2), 2, 2, 2, &mut dst, Region::new(0, 4)),
            Err(Error::ResampleOutOfBounds {
                required: 16,
                len: 15
            })
        );
        assert_eq!(
            upsample(&src, Region::new(0, 1), 2, 2, 2, &mut dst, Region::new(0, 4)),
            Err(Error::InvalidStride {
                stride: 1,
                width: 2
            })
        );
        let mut small = [0; 1];
        assert!(downsample(&dst, Region::new(0, 4), 2, 2, 2, &mut small, Region::new(0, 2)).is_err());
    }
}
