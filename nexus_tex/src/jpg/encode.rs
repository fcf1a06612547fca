// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::borrow::Cow;

use crate::{
    BLOCK_DIM,
    bit_writer::BitWriter,
    color::ycocg::{decompose, decompose_direct},
    error::Result,
    image::{Image, ImageFormat},
    jpg::{
        JpgParameters, JpgType,
        context::{Context, unshift_and_clamp},
    },
    resample::{Region, downsample},
    util::tracing_wrappers::*,
    var_dct::dct::forward_dct,
};

/// Encoded streams are padded to a multiple of this many bytes.
pub const STREAM_ALIGNMENT: usize = 16;
pub const STREAM_PADDING: u8 = 0xFF;

/// Encodes an image. Images that are not ARGB are converted first.
pub fn encode(image: &Image, params: &JpgParameters) -> Result<Vec<u8>> {
    let argb = match image.format() {
        ImageFormat::Argb => Cow::Borrowed(image),
        _ => Cow::Owned(image.to_format(ImageFormat::Argb)),
    };
    let mut ctx = Context::new(params, argb.width(), argb.height())?;
    let mut bw = BitWriter::with_capacity(argb.data().len() / 4);

    if ctx.jpg_type.is_subsampled() {
        encode_subsampled(&mut ctx, &mut bw, argb.data())?;
    } else {
        encode_full(&mut ctx, &mut bw, argb.data())?;
    }
    bw.pad_to_multiple(STREAM_ALIGNMENT, STREAM_PADDING)?;
    let data = bw.into_bytes()?;
    debug!(
        ?params,
        width = ctx.width,
        height = ctx.height,
        len = data.len(),
        "encoded jpg image"
    );
    Ok(data)
}

fn encode_full(ctx: &mut Context, bw: &mut BitWriter, argb: &[u8]) -> Result<()> {
    for (x, y) in ctx.macroblocks() {
        decomposite(ctx, x, y, argb);
        let offset = ctx.offset(x, y);
        for channel in 0..4 {
            if ctx.components[channel].is_coded() {
                encode_block(ctx, bw, channel, offset)?;
            }
        }
    }
    Ok(())
}

fn encode_subsampled(ctx: &mut Context, bw: &mut BitWriter, argb: &[u8]) -> Result<()> {
    for (x, y) in ctx.macroblocks() {
        let corners = [
            (x, y),
            (x + BLOCK_DIM, y),
            (x, y + BLOCK_DIM),
            (x + BLOCK_DIM, y + BLOCK_DIM),
        ];
        for (bx, by) in corners {
            decomposite(ctx, bx, by, argb);
        }
        for channel in 0..4 {
            if !ctx.components[channel].is_coded() {
                continue;
            }
            if channel == 1 || channel == 2 {
                let offset = ctx.offset(x, y);
                encode_downsampled_block(ctx, bw, channel, offset)?;
            } else {
                for (bx, by) in corners {
                    let offset = ctx.offset(bx, by);
                    encode_block(ctx, bw, channel, offset)?;
                }
            }
        }
    }
    Ok(())
}

/// Codes the 8x8 area of the plane of `channel` at `offset`.
fn encode_block(ctx: &mut Context, bw: &mut BitWriter, channel: usize, offset: usize) -> Result<()> {
    trace!(channel, offset, "encoding block");
    let stride = ctx.stride;
    let component = &mut ctx.components[channel];
    component.unshift_and_clamp(offset, stride);
    forward_dct(&mut component.pixels, offset, stride)?;
    ctx.load_block(channel, offset);
    ctx.write_block(bw, channel)
}

/// Averages the 16x16 area of the plane of `channel` at `offset` down to one block and codes it.
fn encode_downsampled_block(
    ctx: &mut Context,
    bw: &mut BitWriter,
    channel: usize,
    offset: usize,
) -> Result<()> {
    trace!(channel, offset, "encoding subsampled block");
    downsample(
        &ctx.components[channel].pixels,
        Region::new(offset, ctx.stride),
        BLOCK_DIM,
        BLOCK_DIM,
        2,
        &mut ctx.block,
        Region::new(0, BLOCK_DIM),
    )?;
    unshift_and_clamp(
        ctx.components[channel].compression,
        &mut ctx.block,
        0,
        BLOCK_DIM,
    );
    forward_dct(&mut ctx.block, 0, BLOCK_DIM)?;
    ctx.write_block(bw, channel)
}

/// Splits the ARGB pixels of the 8x8 block at `(x, y)` into the channel
/// planes. Positions outside the image repeat the nearest edge pixel.
fn decomposite(ctx: &mut Context, x: usize, y: usize, argb: &[u8]) {
    let decompose_fn = match ctx.jpg_type {
        JpgType::Type2 => decompose_direct,
        JpgType::Type1 | JpgType::Type3 => decompose,
    };
    for py in y..y + BLOCK_DIM {
        let sy = py.min(ctx.height - 1);
        for px in x..x + BLOCK_DIM {
            let sx = px.min(ctx.width - 1);
            let p = &argb[(sy * ctx.width + sx) * 4..][..4];
            let samples = decompose_fn([p[0], p[1], p[2], p[3]]);
            let i = ctx.offset(px, py);
            for (component, sample) in ctx.components.iter_mut().zip(samples) {
                component.pixels[i] = sample;
            }
        }
    }
}
