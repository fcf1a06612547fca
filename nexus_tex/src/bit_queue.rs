// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::{Error, Result};

/// Number of bits a [`BitQueue`] can hold.
pub const QUEUE_CAPACITY: usize = 64;

/// Maximum number of bits that can be pushed or popped in a single call.
pub const MAX_BITS_PER_CALL: usize = 32;

/// A fixed-capacity FIFO of bits, most significant bit first.
///
/// Bits are stored left-aligned in a 64-bit accumulator: the oldest bit is
/// always the most significant bit of the accumulator.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct BitQueue {
    bits: u64,
    position: usize,
}

impl Debug for BitQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.position == 0 {
            return write!(f, "BitQueue{{}}");
        }
        write!(
            f,
            "BitQueue{{ {:0width$b} }}",
            self.bits >> (QUEUE_CAPACITY - self.position),
            width = self.position
        )
    }
}

impl BitQueue {
    pub fn new() -> BitQueue {
        BitQueue::default()
    }

    /// Number of bits currently queued.
    pub fn len(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    pub fn remaining_capacity(&self) -> usize {
        QUEUE_CAPACITY - self.position
    }

    /// Appends the `num` low bits of `bits`, most significant first.
    /// ```
    /// # use nexus_tex::bit_queue::BitQueue;
    /// let mut queue = BitQueue::new();
    /// queue.push(0b101, 3)?;
    /// queue.push(0xff, 2)?;
    /// assert_eq!(queue.len(), 5);
    /// assert_eq!(queue.pop(5)?, 0b10111);
    /// # Ok::<(), nexus_tex::error::Error>(())
    /// ```
    pub fn push(&mut self, bits: u32, num: usize) -> Result<()> {
        if num > MAX_BITS_PER_CALL || num > self.remaining_capacity() {
            return Err(Error::BitQueueOverflow {
                requested: num,
                available: self.remaining_capacity(),
            });
        }
        if num == 0 {
            return Ok(());
        }
        let value = bits as u64 & ((1u64 << num) - 1);
        self.bits |= value << (QUEUE_CAPACITY - self.position - num);
        self.position += num;
        Ok(())
    }

    /// Removes the `num` oldest bits and returns them right-aligned.
    pub fn pop(&mut self, num: usize) -> Result<u32> {
        if num > MAX_BITS_PER_CALL || num > self.position {
            return Err(Error::BitQueueUnderflow {
                requested: num,
                available: self.position,
            });
        }
        if num == 0 {
            return Ok(0);
        }
        let value = self.bits >> (QUEUE_CAPACITY - num);
        self.bits <<= num;
        self.position -= num;
        Ok(value as u32)
    }

    pub fn clear(&mut self) {
        *self = BitQueue::default();
    }
}
