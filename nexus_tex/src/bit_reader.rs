// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    bit_queue::{BitQueue, MAX_BITS_PER_CALL},
    error::{Error, Result},
};

/// Reads bits from a sequence of bytes, most significant bit first.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    queue: BitQueue,
    total_bits_read: usize,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], queue: {:?}, total_bits_read: {} }}",
            self.data.len(),
            self.queue,
            self.total_bits_read,
        )
    }
}

impl<'a> BitReader<'a> {
    /// Constructs a BitReader for a given range of data.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            queue: BitQueue::new(),
            total_bits_read: 0,
        }
    }

    /// Returns true if `num` more bits can be read.
    pub fn can_read(&self, num: usize) -> bool {
        num <= self.total_bits_available()
    }

    /// Reads `num` bits from the buffer.
    /// ```
    /// # use nexus_tex::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0b1010_0000, 1]);
    /// assert_eq!(br.read(3)?, 0b101);
    /// assert_eq!(br.read(13)?, 1);
    /// assert_eq!(br.total_bits_read(), 16);
    /// assert!(br.read(1).is_err());
    /// # Ok::<(), nexus_tex::error::Error>(())
    /// ```
    pub fn read(&mut self, num: usize) -> Result<u32> {
        if num > MAX_BITS_PER_CALL || !self.can_read(num) {
            return Err(Error::Truncated {
                requested: num,
                available: self.total_bits_available(),
            });
        }
        while self.queue.len() < num {
            let Some((&byte, rest)) = self.data.split_first() else {
                return Err(Error::Truncated {
                    requested: num,
                    available: self.queue.len(),
                });
            };
            self.queue.push(byte as u32, 8)?;
            self.data = rest;
        }
        let value = self.queue.pop(num)?;
        self.total_bits_read += num;
        Ok(value)
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read(1)? != 0)
    }

    /// Returns the total number of bits that have been read.
    pub fn total_bits_read(&self) -> usize {
        self.total_bits_read
    }

    /// Returns the total number of bits that can still be read.
    pub fn total_bits_available(&self) -> usize {
        self.queue.len() + self.data.len() * 8
    }
}
