//! Bit-level input for DEFLATE streams.
//!
//! `BitReader` keeps a refillable byte buffer plus a sub-byte bit offset.
//! Huffman decoding peeks a 32-bit window, resolves a symbol from it and then
//! consumes exactly the code length, so the reader separates `peek_bits` from
//! `consume` instead of only offering `read_bits`.
//!
//! # Bit Ordering
//!
//! DEFLATE packs bits LSB-first within bytes, and multi-byte peeks are
//! assembled little-endian. The first bit of the stream is therefore bit 0 of
//! the value returned by `peek_bits`.
//!
//! # Example
//!
//! ```
//! use oxigz_core::bitstream::BitReader;
//! use std::io::Cursor;
//!
//! // Peeks need 4 buffered bytes, so short inputs carry trailing padding
//! let mut reader = BitReader::new(Cursor::new(vec![0b1010_1101, 0xFF, 0, 0, 0, 0]));
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(5).unwrap(), 0b10101);
//! assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
//! ```

use crate::error::{GzError, Result};
use std::io::{ErrorKind, Read};

/// Default size of the internal byte buffer (16 KB).
pub const DEFAULT_BUFFER_SIZE: usize = 16 << 10;

/// Minimum number of bytes that must be buffered for a peek to succeed.
const MIN_PEEK_BYTES: usize = 4;

/// Number of bytes a peek tries to buffer so that 32 bits are available at
/// any bit offset.
const FULL_PEEK_BYTES: usize = 8;

/// A buffered bit-level reader over any `Read` implementation.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Byte buffer; unread bytes live in `buf[begin..end]`.
    buf: Vec<u8>,
    /// Index of the current byte.
    begin: usize,
    /// End of valid data in `buf`.
    end: usize,
    /// Bits already consumed from `buf[begin]` (0-7).
    bit_offset: u32,
    /// Total bits consumed (for error reporting).
    total_bits: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` with the default buffer size.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, reader)
    }

    /// Create a new `BitReader` with a buffer of `capacity` bytes.
    ///
    /// The capacity is raised to at least 8 bytes so a full 32-bit peek fits.
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; capacity.max(FULL_PEEK_BYTES)],
            begin: 0,
            end: 0,
            bit_offset: 0,
            total_bits: 0,
        }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Consume this `BitReader` and return the underlying reader.
    ///
    /// Bytes still buffered are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Total number of bits consumed so far.
    pub fn bit_position(&self) -> u64 {
        self.total_bits
    }

    /// Number of unread bytes in the buffer, counting a partially consumed byte.
    #[inline]
    fn buffered(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    /// Move unread bytes to the front of the buffer and issue one read.
    ///
    /// Returns the number of bytes read; 0 means the source is exhausted.
    fn fill_buf(&mut self) -> Result<usize> {
        if self.begin > self.end {
            // A previous consume ran past the last byte of the input.
            return Err(GzError::unexpected_eof(self.total_bits));
        }
        if self.begin > 0 {
            self.buf.copy_within(self.begin..self.end, 0);
            self.end -= self.begin;
            self.begin = 0;
        }
        loop {
            match self.reader.read(&mut self.buf[self.end..]) {
                Ok(n) => {
                    self.end += n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Peek at the next 32 bits without consuming them.
    ///
    /// Near the end of the input fewer bits may be valid; the missing high
    /// bits are zero. Fails if fewer than 4 bytes remain.
    #[inline]
    pub fn peek_bits(&mut self) -> Result<u32> {
        while self.buffered() < FULL_PEEK_BYTES {
            if self.fill_buf()? == 0 {
                break;
            }
        }
        let available = self.buffered();
        if available < MIN_PEEK_BYTES {
            return Err(GzError::unexpected_eof(self.total_bits));
        }

        let mut bytes = [0u8; FULL_PEEK_BYTES];
        let take = available.min(FULL_PEEK_BYTES);
        bytes[..take].copy_from_slice(&self.buf[self.begin..self.begin + take]);
        Ok((u64::from_le_bytes(bytes) >> self.bit_offset) as u32)
    }

    /// Advance the cursor by `count` bits (at most 32). Never reads.
    #[inline]
    pub fn consume(&mut self, count: u32) {
        debug_assert!(count <= 32, "Cannot consume more than 32 bits at once");
        let bits = self.bit_offset + count;
        self.begin += (bits / 8) as usize;
        self.bit_offset = bits % 8;
        self.total_bits += count as u64;
    }

    /// Read `count` bits (0-32), first stream bit in the LSB.
    #[inline]
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");
        if count == 0 {
            return Ok(0);
        }
        let bits = self.peek_bits()?;
        self.consume(count);
        let mask = ((1u64 << count) - 1) as u32;
        Ok(bits & mask)
    }

    /// Discard the remaining bits of the current byte.
    pub fn align_to_byte(&mut self) {
        if self.bit_offset > 0 {
            self.total_bits += (8 - self.bit_offset) as u64;
            self.bit_offset = 0;
            self.begin += 1;
        }
    }

    /// Check whether at least one more byte can be read.
    pub fn has_data_left(&mut self) -> Result<bool> {
        if self.buffered() > 0 {
            return Ok(true);
        }
        Ok(self.fill_buf()? > 0)
    }

    /// Read bytes after aligning to a byte boundary.
    ///
    /// Buffered bytes are returned first. With an empty buffer, requests at
    /// least as large as the buffer go straight to the underlying reader and
    /// smaller ones refill the buffer. Returns 0 only at the end of the input
    /// (or for an empty `out`).
    pub fn read_aligned(&mut self, out: &mut [u8]) -> Result<usize> {
        self.align_to_byte();
        if self.begin > self.end {
            return Err(GzError::unexpected_eof(self.total_bits));
        }
        if out.is_empty() {
            return Ok(0);
        }

        if self.buffered() == 0 {
            if out.len() >= self.buf.len() {
                let n = loop {
                    match self.reader.read(out) {
                        Ok(n) => break n,
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => return Err(e.into()),
                    }
                };
                self.total_bits += n as u64 * 8;
                return Ok(n);
            }
            if self.fill_buf()? == 0 {
                return Ok(0);
            }
        }

        let n = out.len().min(self.buffered());
        out[..n].copy_from_slice(&self.buf[self.begin..self.begin + n]);
        self.begin += n;
        self.total_bits += n as u64 * 8;
        Ok(n)
    }

    /// Fill `out` completely with byte-aligned data.
    pub fn read_exact(&mut self, out: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < out.len() {
            let n = self.read_aligned(&mut out[filled..])?;
            if n == 0 {
                return Err(GzError::unexpected_eof(self.total_bits));
            }
            filled += n;
        }
        Ok(())
    }

    /// Read one byte-aligned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Read a byte-aligned little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_exact(&mut buf)?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Read a byte-aligned little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out one byte per `read` call.
    struct Trickle(Vec<u8>, usize);

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.1 >= self.0.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[self.1];
            self.1 += 1;
            Ok(1)
        }
    }

    #[test]
    fn test_bitreader_basic() {
        // 0b10110101 = 0xB5
        let data = vec![0xB5, 0, 0, 0];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(1).unwrap(), 1); // LSB first
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
        assert_eq!(reader.read_bits(1).unwrap(), 0);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1011);
        assert_eq!(reader.bit_position(), 8);
    }

    #[test]
    fn test_bitreader_multi_byte() {
        let data = vec![0xFF, 0, 0, 0, 0, 0];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.read_bits(4).unwrap(), 0xF);
        assert_eq!(reader.read_bits(8).unwrap(), 0x0F); // Crosses byte boundary
        assert_eq!(reader.read_bits(4).unwrap(), 0x0);
    }

    #[test]
    fn test_read_bits_needs_four_buffered_bytes() {
        let mut reader = BitReader::new(Cursor::new(vec![0xFF, 0, 0, 0]));
        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        // Three bytes left: not enough for a peek
        assert!(matches!(
            reader.read_bits(4),
            Err(GzError::UnexpectedEof { bit_position: 8 })
        ));
    }

    #[test]
    fn test_peek_does_not_advance() {
        let data = vec![0xAB, 0xCD, 0xEF, 0x01, 0x23];
        let mut reader = BitReader::new(Cursor::new(data));

        assert_eq!(reader.peek_bits().unwrap(), 0x01EF_CDAB);
        assert_eq!(reader.peek_bits().unwrap(), 0x01EF_CDAB);
        reader.consume(4);
        assert_eq!(reader.peek_bits().unwrap(), 0x301E_FCDA);
    }

    #[test]
    fn test_peek_zero_pads_tail() {
        let mut reader = BitReader::new(Cursor::new(vec![0xFF, 0xFF, 0xFF, 0xFF]));
        reader.consume(8);
        // Only three bytes remain, fewer than a peek needs.
        assert!(matches!(
            reader.peek_bits(),
            Err(GzError::UnexpectedEof { bit_position: 8 })
        ));

        let mut reader = BitReader::new(Cursor::new(vec![0xFF; 4]));
        reader.consume(3);
        assert_eq!(reader.peek_bits().unwrap(), 0x1FFF_FFFF);
    }

    #[test]
    fn test_read_32_bits() {
        let data = vec![0x78, 0x56, 0x34, 0x12, 0xAA];
        let mut reader = BitReader::new(Cursor::new(data));
        assert_eq!(reader.read_bits(32).unwrap(), 0x1234_5678);
    }

    #[test]
    fn test_align_to_byte() {
        let data = vec![0xFF, 0xAA, 0, 0, 0];
        let mut reader = BitReader::new(Cursor::new(data));

        reader.read_bits(3).unwrap();
        reader.align_to_byte();
        assert_eq!(reader.bit_position(), 8);
        assert_eq!(reader.read_bits(8).unwrap(), 0xAA);

        reader.align_to_byte(); // already aligned
        assert_eq!(reader.bit_position(), 16);
    }

    #[test]
    fn test_read_exact_mixes_buffer_and_source() {
        let data: Vec<u8> = (0..40).collect();
        let mut reader = BitReader::with_capacity(8, Cursor::new(data));

        assert_eq!(reader.read_bits(8).unwrap(), 0);
        let mut buf = [0u8; 20];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(buf.to_vec(), (1..21).collect::<Vec<u8>>());
        assert_eq!(reader.read_u32_le().unwrap(), u32::from_le_bytes([21, 22, 23, 24]));
        assert_eq!(reader.bit_position(), 25 * 8);
    }

    #[test]
    fn test_read_exact_fails_on_short_input() {
        let mut reader = BitReader::new(Cursor::new(vec![1, 2, 3]));
        let mut buf = [0u8; 4];
        assert!(matches!(
            reader.read_exact(&mut buf),
            Err(GzError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_has_data_left() {
        let mut reader = BitReader::new(Cursor::new(vec![7u8]));
        assert!(reader.has_data_left().unwrap());
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert!(!reader.has_data_left().unwrap());

        let mut empty = BitReader::new(Cursor::new(Vec::<u8>::new()));
        assert!(!empty.has_data_left().unwrap());
    }

    #[test]
    fn test_refill_with_short_reads() {
        let data: Vec<u8> = vec![0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99];
        let mut reader = BitReader::with_capacity(8, Trickle(data, 0));

        assert_eq!(reader.read_bits(16).unwrap(), 0x2211);
        assert_eq!(reader.read_bits(32).unwrap(), 0x6655_4433);
        assert_eq!(reader.read_u16_le().unwrap(), 0x8877);
        assert_eq!(reader.read_u8().unwrap(), 0x99);
        assert!(!reader.has_data_left().unwrap());
    }

    #[test]
    fn test_consume_past_end_is_reported() {
        let mut reader = BitReader::new(Cursor::new(vec![0u8; 4]));
        reader.peek_bits().unwrap();
        reader.consume(32);
        reader.consume(8);
        assert!(matches!(
            reader.peek_bits(),
            Err(GzError::UnexpectedEof { .. })
        ));
    }
}
