//! LZ77 block decoding for DEFLATE.
//!
//! Symbols are decoded straight into a flat window buffer. Back-references
//! are resolved against the bytes before the write cursor, which includes
//! history kept from earlier steps of the same member.
//!
//! # Stepping
//!
//! A block can be longer than the free space in the window, so decoding runs
//! in steps. A step stops with [`BlockProgress::WindowFull`] as soon as the
//! cursor comes within [`MAX_MATCH`] bytes of the buffer end (checked on entry
//! and after every token), so a single token can never overrun the buffer.
//! The caller drains and slides the window, then calls again.

use crate::huffman::{END_OF_BLOCK, HuffmanDecoder};
use crate::tables::{DISTANCE_EXTRA_BITS, LENGTH_EXTRA_BITS, decode_distance, decode_length};
use oxigz_core::BitReader;
use oxigz_core::error::{GzError, Result};
use std::io::Read;

/// Maximum match length.
pub const MAX_MATCH: usize = 258;

/// Highest valid literal/length symbol.
const MAX_LITLEN_SYMBOL: u16 = 285;

/// Number of valid distance symbols.
const DISTANCE_SYMBOLS: u16 = 30;

/// A decoded LZ77 token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference to previously decoded data.
    Match {
        /// Number of bytes to copy (3-258).
        length: u16,
        /// Distance back into the window (1-32768).
        distance: u16,
    },
    /// The end-of-block symbol.
    EndOfBlock,
}

/// Outcome of one decoding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockProgress {
    /// The block's end-of-block symbol was reached.
    EndOfBlock {
        /// Bytes written after the starting boundary.
        produced: usize,
    },
    /// The window has no room for another token; the block continues.
    WindowFull {
        /// Bytes written after the starting boundary.
        produced: usize,
    },
}

impl BlockProgress {
    /// Bytes written in this step.
    pub fn produced(&self) -> usize {
        match *self {
            Self::EndOfBlock { produced } | Self::WindowFull { produced } => produced,
        }
    }
}

/// Read the next token from the stream.
pub fn read_token<R: Read>(
    reader: &mut BitReader<R>,
    litlen: &HuffmanDecoder,
    dist: &HuffmanDecoder,
) -> Result<Token> {
    let symbol = litlen.decode_from(reader)?;
    if symbol < END_OF_BLOCK {
        return Ok(Token::Literal(symbol as u8));
    }
    if symbol == END_OF_BLOCK {
        return Ok(Token::EndOfBlock);
    }
    if symbol > MAX_LITLEN_SYMBOL {
        return Err(GzError::invalid_symbol("literal/length", symbol));
    }

    let extra_bits = LENGTH_EXTRA_BITS[(symbol - 257) as usize] as u32;
    let length = decode_length(symbol, reader.read_bits(extra_bits)? as u16);

    let dist_symbol = dist.decode_from(reader)?;
    if dist_symbol >= DISTANCE_SYMBOLS {
        return Err(GzError::invalid_symbol("distance", dist_symbol));
    }
    let extra_bits = DISTANCE_EXTRA_BITS[dist_symbol as usize] as u32;
    let distance = decode_distance(dist_symbol, reader.read_bits(extra_bits)? as u16);

    Ok(Token::Match { length, distance })
}

/// Decode tokens into `window` starting at `boundary` until the block ends
/// or the window is full.
///
/// Back-references may reach any byte before the write cursor. A distance
/// larger than the cursor position fails with `DistanceTooFar`.
pub fn decode_block<R: Read>(
    window: &mut [u8],
    boundary: usize,
    reader: &mut BitReader<R>,
    litlen: &HuffmanDecoder,
    dist: &HuffmanDecoder,
) -> Result<BlockProgress> {
    let mut idx = boundary;
    if idx + MAX_MATCH >= window.len() {
        return Ok(BlockProgress::WindowFull { produced: 0 });
    }

    loop {
        match read_token(reader, litlen, dist)? {
            Token::Literal(byte) => {
                window[idx] = byte;
                idx += 1;
            }
            Token::Match { length, distance } => {
                let distance = distance as usize;
                if distance > idx {
                    return Err(GzError::distance_too_far(distance, idx));
                }
                copy_match(window, idx, distance, length as usize);
                idx += length as usize;
            }
            Token::EndOfBlock => {
                return Ok(BlockProgress::EndOfBlock {
                    produced: idx - boundary,
                });
            }
        }
        if idx + MAX_MATCH >= window.len() {
            return Ok(BlockProgress::WindowFull {
                produced: idx - boundary,
            });
        }
    }
}

/// Forward copy of `length` bytes from `distance` back, where source and
/// destination may overlap.
///
/// Each pass copies at most one period, after which the period has doubled.
#[inline]
fn copy_match(window: &mut [u8], mut idx: usize, distance: usize, mut length: usize) {
    let begin = idx - distance;
    let mut period = distance;
    while length > 0 {
        let n = period.min(length);
        window.copy_within(begin..begin + n, idx);
        idx += n;
        length -= n;
        period += n;
    }
}
