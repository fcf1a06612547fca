// Copyright (c) the NexusTex Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::sync::OnceLock;

use crate::error::{Error, Result};

pub const HUFFMAN_MAX_BITS: usize = 16;

/// Number of codes per bit length (1..=16) of the standard luminance DC table.
pub const DC_LUMA_COUNTS: [u8; HUFFMAN_MAX_BITS] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
pub const DC_LUMA_SYMBOLS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub const DC_CHROMA_COUNTS: [u8; HUFFMAN_MAX_BITS] =
    [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
pub const DC_CHROMA_SYMBOLS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

pub const AC_LUMA_COUNTS: [u8; HUFFMAN_MAX_BITS] =
    [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125];
pub const AC_LUMA_SYMBOLS: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08, 0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

pub const AC_CHROMA_COUNTS: [u8; HUFFMAN_MAX_BITS] =
    [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 119];
pub const AC_CHROMA_SYMBOLS: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xa1, 0xb1, 0xc1, 0x09, 0x23, 0x33, 0x52, 0xf0,
    0x15, 0x62, 0x72, 0xd1, 0x0a, 0x16, 0x24, 0x34, 0xe1, 0x25, 0xf1, 0x17, 0x18, 0x19, 0x1a, 0x26,
    0x27, 0x28, 0x29, 0x2a, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5,
    0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3,
    0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda,
    0xe2, 0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

/// A code word, right-aligned in `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanCode {
    pub code: u16,
    pub length: u8,
}

/// Canonical Huffman code built from a JPEG style (counts, symbols) pair.
///
/// Codes of the same length are consecutive integers, so a code of length `L`
/// is decoded by checking it against the range `[first_code[L], first_code[L] + count[L])`.
#[derive(Clone)]
pub struct HuffmanTable {
    symbols: Vec<u8>,
    first_code: [u32; HUFFMAN_MAX_BITS + 1],
    first_index: [usize; HUFFMAN_MAX_BITS + 1],
    count: [u32; HUFFMAN_MAX_BITS + 1],
    codes: [Option<HuffmanCode>; 256],
    min_length: usize,
    max_length: usize,
}

impl std::fmt::Debug for HuffmanTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HuffmanTable{{ symbols: {}, lengths: {}..={} }}",
            self.symbols.len(),
            self.min_length,
            self.max_length
        )
    }
}

impl HuffmanTable {
    /// `counts[i]` is the number of codes of length `i + 1`.
    pub fn new(counts: &[u8; HUFFMAN_MAX_BITS], symbols: &[u8]) -> Result<HuffmanTable> {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if symbols.len() < total {
            return Err(Error::HuffmanSymbolsTooShort {
                expected: total,
                actual: symbols.len(),
            });
        }
        let mut table = HuffmanTable {
            symbols: symbols[..total].to_vec(),
            first_code: [0; HUFFMAN_MAX_BITS + 1],
            first_index: [0; HUFFMAN_MAX_BITS + 1],
            count: [0; HUFFMAN_MAX_BITS + 1],
            codes: [None; 256],
            min_length: 0,
            max_length: 0,
        };
        let mut code = 0u32;
        let mut index = 0usize;
        for length in 1..=HUFFMAN_MAX_BITS {
            let count = counts[length - 1] as u32;
            if code + count > (1 << length) {
                return Err(Error::HuffmanTableOverfull {
                    length,
                    count: count as usize,
                });
            }
            table.first_code[length] = code;
            table.first_index[length] = index;
            table.count[length] = count;
            if count > 0 {
                if table.min_length == 0 {
                    table.min_length = length;
                }
                table.max_length = length;
            }
            for offset in 0..count {
                let symbol = table.symbols[index] as usize;
                // The first occurrence of a symbol wins for encoding.
                if table.codes[symbol].is_none() {
                    table.codes[symbol] = Some(HuffmanCode {
                        code: (code + offset) as u16,
                        length: length as u8,
                    });
                }
                index += 1;
            }
            code = (code + count) << 1;
        }
        Ok(table)
    }

    /// Returns the symbol with code `bits` of exactly `length` bits, if any.
    pub fn decode(&self, bits: u32, length: usize) -> Option<u8> {
        if length == 0 || length > HUFFMAN_MAX_BITS {
            return None;
        }
        let offset = bits.checked_sub(self.first_code[length])?;
        if offset >= self.count[length] {
            return None;
        }
        Some(self.symbols[self.first_index[length] + offset as usize])
    }

    pub fn encode(&self, symbol: u8) -> Option<HuffmanCode> {
        self.codes[symbol as usize]
    }

    /// Shortest code length in the table, 0 for an empty table.
    pub fn min_decodable_length(&self) -> usize {
        self.min_length
    }

    /// Longest code length in the table, 0 for an empty table.
    pub fn max_decodable_length(&self) -> usize {
        self.max_length
    }

    pub fn has_codes_of_length(&self, length: usize) -> bool {
        length > 0 && length <= HUFFMAN_MAX_BITS && self.count[length] > 0
    }

    pub fn num_symbols(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }
}

/// The four standard tables.
#[derive(Debug)]
pub struct HuffmanTables {
    pub luma_dc: HuffmanTable,
    pub luma_ac: HuffmanTable,
    pub chroma_dc: HuffmanTable,
    pub chroma_ac: HuffmanTable,
}

impl HuffmanTables {
    fn build() -> Result<HuffmanTables> {
        Ok(HuffmanTables {
            luma_dc: HuffmanTable::new(&DC_LUMA_COUNTS, &DC_LUMA_SYMBOLS)?,
            luma_ac: HuffmanTable::new(&AC_LUMA_COUNTS, &AC_LUMA_SYMBOLS)?,
            chroma_dc: HuffmanTable::new(&DC_CHROMA_COUNTS, &DC_CHROMA_SYMBOLS)?,
            chroma_ac: HuffmanTable::new(&AC_CHROMA_COUNTS, &AC_CHROMA_SYMBOLS)?,
        })
    }

    /// Process-wide standard tables, built on first use.
    pub fn standard() -> Result<&'static HuffmanTables> {
        static TABLES: OnceLock<Result<HuffmanTables>> = OnceLock::new();
        TABLES
            .get_or_init(HuffmanTables::build)
            .as_ref()
            .map_err(Clone::clone)
    }
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::*;

    #[test]
    fn luma_dc_lengths() -> Result<()> {
        let table = &HuffmanTables::standard()?.luma_dc;
        assert_eq!(table.min_decodable_length(), 2);
        assert_eq!(table.max_decodable_length(), 9);
        assert!(!table.has_codes_of_length(1));
        assert!(table.has_codes_of_length(3));
        assert!(!table.has_codes_of_length(10));
        assert_eq!(table.decode(0b00, 2), Some(0));
        assert_eq!(
            table.encode(0),
            Some(HuffmanCode {
                code: 0b00,
                length: 2
            })
        );
        assert_eq!(table.decode(0b010, 3), Some(1));
        assert_eq!(table.decode(0b1111_1111_0, 9), Some(11));
        assert_eq!(table.num_symbols(), 12);
        assert_eq!(table.symbols(), &DC_LUMA_SYMBOLS[..]);
        Ok(())
    }

    #[test]
    fn eob_and_zrl_codes() -> Result<()> {
        let tables = HuffmanTables::standard()?;
        assert_eq!(
            tables.luma_ac.encode(0x00),
            Some(HuffmanCode {
                code: 0b1010,
                length: 4
            })
        );
        assert_eq!(tables.luma_ac.encode(0xF0).map(|c| c.length), Some(11));
        assert_eq!(
            tables.chroma_ac.encode(0x00),
            Some(HuffmanCode { code: 0, length: 2 })
        );
        assert_eq!(tables.luma_ac.encode(0x0B), None);
        Ok(())
    }

    #[test]
    fn standard_tables_round_trip() -> Result<()> {
        let tables = HuffmanTables::standard()?;
        for table in [
            &tables.luma_dc,
            &tables.luma_ac,
            &tables.chroma_dc,
            &tables.chroma_ac,
        ] {
            for &symbol in table.symbols() {
                let code = table.encode(symbol).unwrap();
                assert!(table.has_codes_of_length(code.length as usize));
                assert_eq!(
                    table.decode(code.code as u32, code.length as usize),
                    Some(symbol)
                );
            }
        }
        Ok(())
    }

    #[test]
    fn codes_are_prefix_free() -> Result<()> {
        let table = &HuffmanTables::standard()?.chroma_ac;
        let codes: Vec<_> = table
            .symbols()
            .iter()
            .map(|&s| table.encode(s).unwrap())
            .collect();
        for a in &codes {
            for b in &codes {
                if a == b || a.length > b.length {
                    continue;
                }
                let prefix = b.code >> (b.length - a.length);
                assert_ne!(prefix, a.code, "{a:?} is a prefix of {b:?}");
            }
        }
        Ok(())
    }

    #[test]
    fn overfull_table() {
        let mut counts = [0u8; HUFFMAN_MAX_BITS];
        counts[0] = 3;
        assert_eq!(
            HuffmanTable::new(&counts, &[1, 2, 3]).unwrap_err(),
            Error::HuffmanTableOverfull {
                length: 1,
                count: 3
            }
        );
        counts[0] = 1;
        counts[1] = 3;
        assert!(HuffmanTable::new(&counts, &[1, 2, 3, 4]).is_err());
        counts[1] = 2;
        assert!(HuffmanTable::new(&counts, &[1, 2, 3]).is_ok());
    }

    #[test]
    fn missing_symbols() {
        assert_eq!(
            HuffmanTable::new(&DC_LUMA_COUNTS, &DC_LUMA_SYMBOLS[..11]).unwrap_err(),
            Error::HuffmanSymbolsTooShort {
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn unknown_codes() -> Result<()> {
        let table = &HuffmanTables::standard()?.luma_dc;
        assert_eq!(table.decode(0, 1), None);
        assert_eq!(table.decode(0b111, 3), None);
        assert_eq!(table.decode(0, 0), None);
        assert_eq!(table.decode(0, 17), None);
        Ok(())
    }
}
