// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr, eyre};
use nexus_tex::{
    block_compression,
    jpg::{DecodeOptions, JpgChannel},
    texture::{Texture, TextureInfo, TextureType, encode_mipmaps},
};
use nexus_tex_cli::png_io::{read_png, write_png};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
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

impl From<TypeArg> for TextureType {
    fn from(value: TypeArg) -> Self {
        match value {
            TypeArg::Jpg1 => TextureType::Jpg1,
            TypeArg::Jpg2 => TextureType::Jpg2,
            TypeArg::Jpg3 => TextureType::Jpg3,
            TypeArg::Dxt1 => TextureType::Dxt1,
            TypeArg::Dxt3 => TextureType::Dxt3,
            TypeArg::Dxt5 => TextureType::Dxt5,
            TypeArg::Argb1 => TextureType::Argb1,
            TypeArg::Argb2 => TextureType::Argb2,
            TypeArg::Rgb => TextureType::Rgb,
            TypeArg::Grayscale => TextureType::Grayscale,
        }
    }
}

/// Parses `CHANNEL=VALUE`.
fn parse_default(s: &str) -> Result<(usize, u8), String> {
    let (channel, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CHANNEL=VALUE, got {s:?}"))?;
    let channel: usize = channel.parse().map_err(|e| format!("{e}"))?;
    if channel >= 4 {
        return Err(format!("channel {channel} out of range 0..4"));
    }
    let value = value.parse().map_err(|e| format!("{e}"))?;
    Ok((channel, value))
}

#[derive(Args)]
struct CodingArgs {
    /// Texture type of the mipmap data
    #[clap(long = "type", value_enum)]
    texture_type: TypeArg,
    /// Quality of jpg channels, either one value for all channels or one per channel
    #[clap(long, value_delimiter = ',', num_args = 1..=4)]
    quality: Vec<u8>,
    /// Channels of jpg textures that are not stored, as CHANNEL=VALUE
    #[clap(long = "default", value_parser = parse_default)]
    defaults: Vec<(usize, u8)>,
}

impl CodingArgs {
    fn jpg_channels(&self) -> Result<[JpgChannel; 4]> {
        let mut channels = [JpgChannel::default(); 4];
        match self.quality[..] {
            [] => {}
            [quality] => channels.iter_mut().for_each(|c| c.quality = quality),
            [q0, q1, q2, q3] => {
                for (channel, quality) in channels.iter_mut().zip([q0, q1, q2, q3]) {
                    channel.quality = quality;
                }
            }
            _ => return Err(eyre!("--quality takes one or four values")),
        }
        for &(channel, value) in &self.defaults {
            channels[channel].default_value = Some(value);
        }
        Ok(channels)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Decodes a single stored mipmap into a PNG
    Decode {
        /// Raw mipmap data
        input: PathBuf,
        /// Output PNG file
        output: PathBuf,
        #[clap(long)]
        width: usize,
        #[clap(long)]
        height: usize,
        /// Keep the part of a jpg mipmap decoded before the data ends
        #[clap(long)]
        allow_truncated: bool,
        #[command(flatten)]
        coding: CodingArgs,
    },
    /// Encodes a PNG into raw mipmap data
    Encode {
        /// Input PNG file
        input: PathBuf,
        /// Output file for the encoded mipmap
        output: PathBuf,
        #[command(flatten)]
        coding: CodingArgs,
    },
}

#[derive(Parser)]
#[command(version, about = "Converts between WildStar texture mipmaps and PNG")]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    match opt.command {
        Command::Decode {
            input,
            output,
            width,
            height,
            allow_truncated,
            coding,
        } => {
            let data = std::fs::read(&input)
                .wrap_err_with(|| format!("Cannot read {}", input.display()))?;
            let mut info = TextureInfo::new(width, height, 1, coding.texture_type.into());
            info.jpg_channels = coding.jpg_channels()?;
            info.mip_sizes = vec![data.len()];
            let texture = Texture::new(info, &data).with_options(DecodeOptions { allow_truncated });
            let image = texture.mipmap(0)?;
            write_png(&output, &image)?;
            println!("Decoded {width} x {height} image");
        }
        Command::Encode {
            input,
            output,
            coding,
        } => {
            let image = read_png(&input)?;
            let encoded = encode_mipmaps(
                std::slice::from_ref(&image),
                coding.texture_type.into(),
                coding.jpg_channels()?,
                block_compression::default_codec(),
            )?;
            std::fs::write(&output, &encoded.data)
                .wrap_err_with(|| format!("Cannot write {}", output.display()))?;
            println!(
                "Encoded {} x {} image into {} bytes",
                image.width(),
                image.height(),
                encoded.data.len()
            );
        }
    }
    Ok(())
}
