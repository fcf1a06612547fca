// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Reversible transform between four decoded channel samples and ARGB pixels.

/// Range of the three color channels after [`decompose`].
pub const CHROMA_MIN: i32 = -256;
pub const CHROMA_MAX: i32 = 255;

fn clamp_u8(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Combines the samples of channels 0..4 into an ARGB pixel.
/// ```
/// # use nexus_tex::color::ycocg::compose;
/// assert_eq!(compose([10, 20, 30, 40]), [40, 20, 25, 0]);
/// ```
pub fn compose(samples: [i32; 4]) -> [u8; 4] {
    let [p1, p2, p3, p4] = samples;
    let r1 = p1 - (p3 >> 1);
    let green = clamp_u8(r1 + p3);
    let blue = clamp_u8(r1 - (p2 >> 1));
    let red = clamp_u8(blue as i32 + p2);
    [clamp_u8(p4), red, green, blue]
}

/// Splits an ARGB pixel into the samples of channels 0..4. Inverse of [`compose`].
pub fn decompose(argb: [u8; 4]) -> [i32; 4] {
    let [a, r, g, b] = argb.map(i32::from);
    let p2 = r - b;
    let r1 = b + (p2 >> 1);
    let p3 = g - r1;
    let p1 = r1 + (p3 >> 1);
    [
        p1.clamp(CHROMA_MIN, CHROMA_MAX),
        p2.clamp(CHROMA_MIN, CHROMA_MAX),
        p3.clamp(CHROMA_MIN, CHROMA_MAX),
        a.clamp(0, 255),
    ]
}

/// Channels map one to one onto A, R, G, B.
pub fn compose_direct(samples: [i32; 4]) -> [u8; 4] {
    samples.map(clamp_u8)
}

pub fn decompose_direct(argb: [u8; 4]) -> [i32; 4] {
    argb.map(i32::from)
}
