//! Canonical Huffman codes for DEFLATE decoding.
//!
//! This module implements canonical code construction as specified in
//! RFC 1951 Section 3.2.2, and a two-level lookup table that resolves a symbol
//! from a peeked 32-bit window in at most two table reads.
//!
//! # Alphabets
//!
//! DEFLATE uses three Huffman alphabets:
//! - **Literal/Length**: 0-287 (0-255 literals, 256 EOB, 257-285 lengths)
//! - **Distance**: 0-31 (only 0-29 are valid in a stream)
//! - **Code Length**: 0-18 (for encoding dynamic Huffman trees)
//!
//! # Lookup Table Layout
//!
//! Bits arrive LSB-first, so table indices are bit-reversed codes. The first
//! `2^P` slots (`P = min(max_length, 9)`) form the primary table. A code of
//! length `L <= P` fills every primary slot whose low `L` bits match it. Longer
//! codes share a secondary segment of `2^(max_length - P)` slots, reached
//! through the primary slot of their low `P` bits.

use oxigz_core::BitReader;
use oxigz_core::error::{GzError, Result};
use std::io::Read;

/// Maximum code length in DEFLATE (15 bits).
pub const MAX_CODE_LENGTH: usize = 15;

/// Largest accepted code length array (288 literal/length symbols plus one).
pub const MAX_SYMBOLS: usize = 289;

/// Number of bits resolved by the primary table.
pub const PRIMARY_BITS: u32 = 9;

/// End of block symbol.
pub const END_OF_BLOCK: u16 = 256;

/// Canonical code assigned to one symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeEntry {
    /// The code, most significant bit first (not bit-reversed).
    pub code: u16,
    /// Code length in bits; 0 means the symbol is unused.
    pub length: u8,
}

/// Canonical Huffman codebook built from a code length array.
#[derive(Debug, Clone)]
pub struct Codebook {
    entries: Vec<CodeEntry>,
    max_length: u8,
}

impl Codebook {
    /// Build a codebook from code lengths.
    ///
    /// # Arguments
    ///
    /// * `lengths` - Array where `lengths[i]` is the bit length for symbol `i`.
    ///   A length of 0 means the symbol is not used.
    ///
    /// Incomplete codes are accepted; over-subscribed ones are not.
    pub fn from_lengths(lengths: &[u8]) -> Result<Self> {
        if lengths.is_empty() {
            return Err(GzError::invalid_code_lengths("Empty code lengths"));
        }
        if lengths.len() > MAX_SYMBOLS {
            return Err(GzError::invalid_code_lengths(format!(
                "{} code lengths exceed maximum {}",
                lengths.len(),
                MAX_SYMBOLS
            )));
        }

        // Count codes of each length
        let mut bl_count = [0u32; MAX_CODE_LENGTH + 1];
        let mut max_length = 0u8;
        for &len in lengths {
            if len as usize > MAX_CODE_LENGTH {
                return Err(GzError::invalid_code_lengths(format!(
                    "Code length {} exceeds maximum {}",
                    len, MAX_CODE_LENGTH
                )));
            }
            bl_count[len as usize] += 1;
            max_length = max_length.max(len);
        }
        bl_count[0] = 0;

        // Kraft check: every length may use at most the remaining code space
        let mut left = 1i32;
        for &count in &bl_count[1..] {
            left = (left << 1) - count as i32;
            if left < 0 {
                return Err(GzError::invalid_code_lengths("Over-subscribed Huffman code"));
            }
        }

        // First code for each length (RFC 1951 algorithm)
        let mut next_code = [0u32; MAX_CODE_LENGTH + 1];
        let mut code = 0u32;
        for bits in 1..=max_length as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        let entries = lengths
            .iter()
            .map(|&length| {
                if length == 0 {
                    return CodeEntry::default();
                }
                let code = next_code[length as usize];
                next_code[length as usize] += 1;
                CodeEntry {
                    code: code as u16,
                    length,
                }
            })
            .collect();

        Ok(Self {
            entries,
            max_length,
        })
    }

    /// Per-symbol codes, indexed by symbol.
    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    /// Longest code length in use (0 if no symbol is used).
    pub fn max_length(&self) -> u8 {
        self.max_length
    }
}

/// A symbol resolved from the bit stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Decoded symbol.
    pub symbol: u16,
    /// Number of bits the code occupies.
    pub length: u32,
}

/// Table slot. `length == 0` marks an unused slot. In the primary table a
/// length above the primary width marks a link whose `value` is the offset of
/// a secondary segment.
#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    value: u32,
    length: u8,
}

/// Two-level table-driven Huffman decoder.
#[derive(Debug, Clone)]
pub struct HuffmanDecoder {
    slots: Vec<Slot>,
    primary_bits: u32,
    primary_mask: u32,
    secondary_mask: u32,
}

impl HuffmanDecoder {
    /// Build the lookup tables for a codebook.
    pub fn new(codebook: &Codebook) -> Self {
        let max_length = codebook.max_length() as u32;
        let primary_bits = max_length.min(PRIMARY_BITS);
        let secondary_bits = max_length - primary_bits;
        let primary_mask = (1u32 << primary_bits) - 1;
        let secondary_mask = (1u32 << secondary_bits) - 1;

        let mut slots = vec![Slot::default(); 1 << primary_bits];

        for (symbol, entry) in codebook.entries().iter().enumerate() {
            if entry.length == 0 {
                continue;
            }
            let length = entry.length as u32;
            let reversed = (entry.code.reverse_bits() >> (16 - length)) as u32;
            let slot = Slot {
                value: symbol as u32,
                length: entry.length,
            };

            if length <= primary_bits {
                for fill in 0..1u32 << (primary_bits - length) {
                    slots[(reversed | (fill << length)) as usize] = slot;
                }
                continue;
            }

            // Reserve the secondary segment on first use of this prefix
            let prefix = (reversed & primary_mask) as usize;
            let offset = if slots[prefix].length == 0 {
                let offset = slots.len() as u32;
                slots[prefix] = Slot {
                    value: offset,
                    length: max_length as u8,
                };
                slots.resize(slots.len() + (1 << secondary_bits), Slot::default());
                offset
            } else {
                slots[prefix].value
            };

            let base = offset + ((reversed >> primary_bits) & secondary_mask);
            let stride = length - primary_bits;
            for fill in 0..1u32 << (max_length - length) {
                slots[(base + (fill << stride)) as usize] = slot;
            }
        }

        Self {
            slots,
            primary_bits,
            primary_mask,
            secondary_mask,
        }
    }

    /// Resolve the symbol at the start of `bits` (first stream bit in the LSB).
    #[inline]
    pub fn decode(&self, bits: u32) -> Result<Decoded> {
        let mut slot = self.slots[(bits & self.primary_mask) as usize];
        if slot.length as u32 > self.primary_bits {
            let index = slot.value + ((bits >> self.primary_bits) & self.secondary_mask);
            slot = self.slots[index as usize];
        }
        if slot.length == 0 {
            return Err(GzError::code_not_found(bits));
        }
        Ok(Decoded {
            symbol: slot.value as u16,
            length: slot.length as u32,
        })
    }

    /// Peek, decode and consume one symbol.
    #[inline]
    pub fn decode_from<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u16> {
        let decoded = self.decode(reader.peek_bits()?)?;
        reader.consume(decoded.length);
        Ok(decoded.symbol)
    }
}
