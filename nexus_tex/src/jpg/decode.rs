// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    BLOCK_DIM,
    bit_reader::BitReader,
    color::ycocg::{compose, compose_direct},
    error::{Error, Result},
    image::{Image, ImageFormat},
    jpg::{
        DecodeOptions, JpgParameters, JpgType,
        context::{Context, shift_and_clamp},
    },
    resample::{Region, upsample},
    util::tracing_wrappers::*,
    var_dct::dct::inverse_dct,
};

/// Decodes one image of `width` x `height` pixels into ARGB.
pub fn decode(
    data: &[u8],
    params: &JpgParameters,
    width: usize,
    height: usize,
    options: &DecodeOptions,
) -> Result<Image> {
    debug!(?params, width, height, len = data.len(), "decoding jpg image");
    let mut ctx = Context::new(params, width, height)?;
    let mut br = BitReader::new(data);
    let mut argb = vec![0u8; Image::buffer_size(width, height, ImageFormat::Argb)?];

    let result = if ctx.jpg_type.is_subsampled() {
        decode_subsampled(&mut ctx, &mut br, &mut argb)
    } else {
        decode_full(&mut ctx, &mut br, &mut argb)
    };
    match result {
        Ok(()) => {}
        Err(Error::Truncated {
            requested,
            available,
        }) if options.allow_truncated => {
            warn!(
                requested,
                available,
                bits_read = br.total_bits_read(),
                "jpg stream ended early, keeping partial image"
            );
        }
        Err(err) => return Err(err),
    }
    Image::new(width, height, ImageFormat::Argb, argb)
}

fn decode_full(ctx: &mut Context, br: &mut BitReader, argb: &mut [u8]) -> Result<()> {
    for (x, y) in ctx.macroblocks() {
        let offset = ctx.offset(x, y);
        for channel in 0..4 {
            if ctx.components[channel].is_coded() {
                decode_block(ctx, br, channel, offset)?;
            }
        }
        composite(ctx, x, y, argb);
    }
    Ok(())
}

fn decode_subsampled(ctx: &mut Context, br: &mut BitReader, argb: &mut [u8]) -> Result<()> {
    for (x, y) in ctx.macroblocks() {
        let corners = [
            (x, y),
            (x + BLOCK_DIM, y),
            (x, y + BLOCK_DIM),
            (x + BLOCK_DIM, y + BLOCK_DIM),
        ];
        for channel in 0..4 {
            if !ctx.components[channel].is_coded() {
                continue;
            }
            if channel == 1 || channel == 2 {
                let offset = ctx.offset(x, y);
                decode_upsampled_block(ctx, br, channel, offset)?;
            } else {
                for (bx, by) in corners {
                    let offset = ctx.offset(bx, by);
                    decode_block(ctx, br, channel, offset)?;
                }
            }
        }
        for (bx, by) in corners {
            composite(ctx, bx, by, argb);
        }
    }
    Ok(())
}

/// Decodes a full resolution block of `channel` into its plane at `offset`.
fn decode_block(ctx: &mut Context, br: &mut BitReader, channel: usize, offset: usize) -> Result<()> {
    trace!(channel, offset, "decoding block");
    ctx.read_block(br, channel)?;
    ctx.store_block(channel, offset);
    let stride = ctx.stride;
    let component = &mut ctx.components[channel];
    inverse_dct(&mut component.pixels, offset, stride)?;
    component.shift_and_clamp(offset, stride);
    Ok(())
}

/// Decodes a half resolution block of `channel` and stretches it over the
/// 16x16 area of its plane at `offset`.
fn decode_upsampled_block(
    ctx: &mut Context,
    br: &mut BitReader,
    channel: usize,
    offset: usize,
) -> Result<()> {
    trace!(channel, offset, "decoding subsampled block");
    ctx.read_block(br, channel)?;
    let stride = ctx.stride;
    let component = &mut ctx.components[channel];
    let mut block = ctx.block;
    inverse_dct(&mut block, 0, BLOCK_DIM)?;
    shift_and_clamp(component.compression, &mut block, 0, BLOCK_DIM);
    upsample(
        &block,
        Region::new(0, BLOCK_DIM),
        BLOCK_DIM,
        BLOCK_DIM,
        2,
        &mut component.pixels,
        Region::new(offset, stride),
    )
}

/// Writes the pixels of the 8x8 block at `(x, y)` that lie inside the image.
fn composite(ctx: &Context, x: usize, y: usize, argb: &mut [u8]) {
    let compose_fn = match ctx.jpg_type {
        JpgType::Type2 => compose_direct,
        JpgType::Type1 | JpgType::Type3 => compose,
    };
    let [c0, c1, c2, c3] = &ctx.components;
    for py in y..(y + BLOCK_DIM).min(ctx.height) {
        for px in x..(x + BLOCK_DIM).min(ctx.width) {
            let i = ctx.offset(px, py);
            let pixel = compose_fn([c0.pixels[i], c1.pixels[i], c2.pixels[i], c3.pixels[i]]);
            argb[(py * ctx.width + px) * 4..][..4].copy_from_slice(&pixel);
        }
    }
}
