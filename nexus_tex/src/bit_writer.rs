// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    bit_queue::BitQueue,
    error::{Error, Result},
};

/// Writes bits into a growable byte buffer, most significant bit first.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    data: Vec<u8>,
    queue: BitQueue,
}

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter::default()
    }

    pub fn with_capacity(bytes: usize) -> BitWriter {
        BitWriter {
            data: Vec::with_capacity(bytes),
            queue: BitQueue::new(),
        }
    }

    /// Writes the `num` low bits of `value`.
    pub fn write(&mut self, value: u32, num: usize) -> Result<()> {
        self.drain()?;
        self.queue.push(value, num)
    }

    fn drain(&mut self) -> Result<()> {
        while self.queue.len() >= 8 {
            self.data.push(self.queue.pop(8)? as u8);
        }
        Ok(())
    }

    /// Emits all pending bits. A trailing partial byte is padded with 1-bits.
    /// ```
    /// # use nexus_tex::bit_writer::BitWriter;
    /// let mut bw = BitWriter::new();
    /// bw.write(0b010, 3)?;
    /// bw.flush()?;
    /// assert_eq!(bw.as_bytes(), &[0b0101_1111]);
    /// # Ok::<(), nexus_tex::error::Error>(())
    /// ```
    pub fn flush(&mut self) -> Result<()> {
        self.drain()?;
        if !self.queue.is_empty() {
            let padding = 8 - self.queue.len();
            self.queue.push((1 << padding) - 1, padding)?;
            self.data.push(self.queue.pop(8)? as u8);
        }
        Ok(())
    }

    /// Flushes and appends `fill` bytes until the length is a multiple of `alignment`.
    pub fn pad_to_multiple(&mut self, alignment: usize, fill: u8) -> Result<()> {
        self.flush()?;
        if alignment > 1 {
            let padded = self.data.len().div_ceil(alignment) * alignment;
            self.data.resize(padded, fill);
        }
        Ok(())
    }

    /// Appends whole bytes. The writer must be byte aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.drain()?;
        if !self.queue.is_empty() {
            return Err(Error::BitQueueOverflow {
                requested: bytes.len() * 8,
                available: 0,
            });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Bytes emitted so far, excluding bits still queued.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bits written so far, including bits still queued.
    pub fn bits_written(&self) -> usize {
        self.data.len() * 8 + self.queue.len()
    }

    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        self.flush()?;
        Ok(self.data)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;
    use crate::bit_reader::BitReader;

    #[test]
    fn flush_pads_with_ones() -> Result<()> {
        let mut bw = BitWriter::new();
        bw.write(0b1, 1)?;
        bw.write(0, 8)?;
        bw.flush()?;
        assert_eq!(bw.as_bytes(), &[0x80, 0x7F]);
        bw.flush()?;
        assert_eq!(bw.as_bytes().len(), 2);
        Ok(())
    }

    #[test]
    fn bytes_can_follow_flush() -> Result<()> {
        let mut bw = BitWriter::new();
        bw.write(0, 4)?;
        assert!(bw.write_bytes(&[1]).is_err());
        bw.flush()?;
        bw.write_bytes(&[1, 2])?;
        assert_eq!(bw.into_bytes()?, vec![0x0F, 1, 2]);
        Ok(())
    }

    #[test]
    fn pads_to_alignment() -> Result<()> {
        let mut bw = BitWriter::new();
        bw.write(0, 20)?;
        bw.pad_to_multiple(16, 0xFF)?;
        let bytes = bw.into_bytes()?;
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..3], &[0, 0, 0x0F]);
        assert!(bytes[3..].iter().all(|&b| b == 0xFF));
        Ok(())
    }

    #[test]
    fn aligned_output_is_not_padded() -> Result<()> {
        let mut bw = BitWriter::new();
        bw.write_bytes(&[0; 32])?;
        bw.pad_to_multiple(16, 0xFF)?;
        assert_eq!(bw.as_bytes().len(), 32);
        Ok(())
    }

    #[test]
    fn reader_sees_written_bits() {
        arbtest::arbtest(|u| {
            let mut bw = BitWriter::new();
            let mut written = vec![];
            for _ in 0..u.int_in_range(0..=64)? {
                let num = u.int_in_range(1..=32)?;
                let value = u.arbitrary::<u32>()?;
                let value = if num == 32 { value } else { value & ((1 << num) - 1) };
                bw.write(value, num).unwrap();
                written.push((value, num));
            }
            let bits = bw.bits_written();
            let data = bw.into_bytes().unwrap();
            assert_eq!(data.len(), bits.div_ceil(8));
            let mut br = BitReader::new(&data);
            for (value, num) in written {
                assert_eq!(br.read(num).unwrap(), value);
            }
            while br.can_read(1) {
                assert!(br.read_bit().unwrap());
            }
            Ok(())
        });
    }
}
