//! DEFLATE block headers (RFC 1951 Section 3.2.3).
//!
//! Every block starts with a 3-bit header: `BFINAL` followed by the 2-bit
//! `BTYPE`. Stored blocks continue with LEN/NLEN at the next byte boundary,
//! dynamic blocks with a description of their two Huffman codes.

use crate::huffman::{Codebook, HuffmanDecoder};
use crate::tables::{CODE_LENGTH_ORDER, fixed_distance_decoder, fixed_litlen_decoder};
use oxigz_core::BitReader;
use oxigz_core::error::{GzError, Result};
use std::io::Read;

/// Block compression type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    /// Uncompressed bytes.
    Stored,
    /// Fixed Huffman codes.
    Fixed,
    /// Huffman codes transmitted in the block.
    Dynamic,
}

/// Decoded 3-bit block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Whether this is the last block of the stream.
    pub is_final: bool,
    /// Block compression type.
    pub block_type: BlockType,
}

impl BlockHeader {
    /// Read a block header. `BTYPE = 3` is reserved and rejected.
    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let bits = reader.read_bits(3)?;
        let block_type = match (bits >> 1) as u8 {
            0 => BlockType::Stored,
            1 => BlockType::Fixed,
            2 => BlockType::Dynamic,
            other => return Err(GzError::invalid_block_type(other)),
        };
        Ok(Self {
            is_final: bits & 1 == 1,
            block_type,
        })
    }
}

/// Read LEN/NLEN of a stored block and return LEN.
pub fn read_stored_length<R: Read>(reader: &mut BitReader<R>) -> Result<u16> {
    reader.align_to_byte();
    let len = reader.read_u16_le()?;
    let nlen = reader.read_u16_le()?;
    if len != !nlen {
        return Err(GzError::stored_length_mismatch(len, nlen));
    }
    Ok(len)
}

/// Huffman decoders in effect for a compressed block.
#[derive(Debug, Clone)]
pub enum BlockCodes {
    /// The shared fixed decoders.
    Fixed,
    /// Decoders built from a dynamic block header.
    Dynamic {
        /// Literal/length decoder.
        litlen: HuffmanDecoder,
        /// Distance decoder.
        dist: HuffmanDecoder,
    },
}

impl BlockCodes {
    /// The literal/length and distance decoders.
    pub fn decoders(&self) -> Result<(&HuffmanDecoder, &HuffmanDecoder)> {
        match self {
            Self::Fixed => Ok((fixed_litlen_decoder()?, fixed_distance_decoder()?)),
            Self::Dynamic { litlen, dist } => Ok((litlen, dist)),
        }
    }
}

/// Parse the code description of a dynamic block and build both decoders.
pub fn read_dynamic_codes<R: Read>(reader: &mut BitReader<R>) -> Result<BlockCodes> {
    // Read code counts
    let hlit = reader.read_bits(5)? as usize + 257; // literal/length codes
    let hdist = reader.read_bits(5)? as usize + 1; // distance codes
    let hclen = reader.read_bits(4)? as usize + 4; // code length codes

    // Read code length code lengths
    let mut code_length_lengths = [0u8; 19];
    for &symbol in CODE_LENGTH_ORDER.iter().take(hclen) {
        code_length_lengths[symbol] = reader.read_bits(3)? as u8;
    }
    let code_length_decoder = HuffmanDecoder::new(&Codebook::from_lengths(&code_length_lengths)?);

    // Read literal/length and distance code lengths
    let expected = hlit + hdist;
    let mut lengths: Vec<u8> = Vec::with_capacity(expected + 138);
    while lengths.len() < expected {
        match code_length_decoder.decode_from(reader)? {
            symbol @ 0..=15 => lengths.push(symbol as u8),
            16 => {
                // Copy previous length 3-6 times
                let Some(&prev) = lengths.last() else {
                    return Err(GzError::invalid_code_lengths(
                        "Repeat code 16 without a previous length",
                    ));
                };
                let repeat = reader.read_bits(2)? as usize + 3;
                lengths.extend(std::iter::repeat_n(prev, repeat));
            }
            17 => {
                // Repeat 0 for 3-10 times
                let repeat = reader.read_bits(3)? as usize + 3;
                lengths.extend(std::iter::repeat_n(0, repeat));
            }
            18 => {
                // Repeat 0 for 11-138 times
                let repeat = reader.read_bits(7)? as usize + 11;
                lengths.extend(std::iter::repeat_n(0, repeat));
            }
            other => return Err(GzError::invalid_symbol("code length", other)),
        }
    }

    if lengths.len() != expected {
        return Err(GzError::code_length_count(expected, lengths.len()));
    }

    // Split into literal/length and distance lengths
    let litlen = HuffmanDecoder::new(&Codebook::from_lengths(&lengths[..hlit])?);
    let dist = HuffmanDecoder::new(&Codebook::from_lengths(&lengths[hlit..])?);
    Ok(BlockCodes::Dynamic { litlen, dist })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(bytes: &[u8]) -> BitReader<Cursor<Vec<u8>>> {
        let mut data = bytes.to_vec();
        data.extend_from_slice(&[0; 8]);
        BitReader::new(Cursor::new(data))
    }

    #[test]
    fn test_block_header_types() {
        // BFINAL=1, BTYPE=01 -> bits 1,1,0 -> 0b011
        let header = BlockHeader::read(&mut reader(&[0b011])).unwrap();
        assert!(header.is_final);
        assert_eq!(header.block_type, BlockType::Fixed);

        let header = BlockHeader::read(&mut reader(&[0b100])).unwrap();
        assert!(!header.is_final);
        assert_eq!(header.block_type, BlockType::Dynamic);

        assert!(matches!(
            BlockHeader::read(&mut reader(&[0b111])),
            Err(GzError::InvalidBlockType { block_type: 3 })
        ));
    }

    #[test]
    fn test_stored_length() {
        // Three header bits, then padding, then LEN=5 NLEN=!5
        let mut r = reader(&[0b001, 0x05, 0x00, 0xFA, 0xFF]);
        let header = BlockHeader::read(&mut r).unwrap();
        assert_eq!(header.block_type, BlockType::Stored);
        assert_eq!(read_stored_length(&mut r).unwrap(), 5);

        let mut r = reader(&[0x05, 0x00, 0x05, 0x00]);
        assert!(matches!(
            read_stored_length(&mut r),
            Err(GzError::StoredLengthMismatch { len: 5, nlen: 5 })
        ));
    }

    #[test]
    fn test_fixed_codes_are_shared() {
        let codes = BlockCodes::Fixed;
        let (litlen, _) = codes.decoders().unwrap();
        assert!(std::ptr::eq(litlen, fixed_litlen_decoder().unwrap()));
    }
}
