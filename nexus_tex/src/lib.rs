// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]
pub mod bit_queue;
pub mod bit_reader;
pub mod bit_writer;
pub mod block_compression;
pub mod coeff_order;
pub mod color;
pub mod entropy_coding;
pub mod error;
pub mod image;
pub mod jpg;
pub mod plain;
pub mod resample;
pub mod texture;
pub mod util;
pub mod var_dct;

pub const BLOCK_DIM: usize = 8;
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;
