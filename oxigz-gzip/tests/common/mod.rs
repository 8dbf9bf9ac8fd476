//! Shared helpers for gzip integration tests.

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use oxigz_core::Crc32;
use std::io::Write;

/// Compress `data` into one gzip member with flate2.
pub fn gzip(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Compress `data` with a filename and comment in the header.
pub fn gzip_named(data: &[u8], filename: &str, comment: &str) -> Vec<u8> {
    let mut encoder = GzBuilder::new()
        .filename(filename)
        .comment(comment)
        .extra(vec![b'A', b'P', 2, 0, 0xAB, 0xCD])
        .mtime(1_700_000_000)
        .write(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Wrap a raw DEFLATE stream into a minimal gzip member whose footer
/// describes `payload`.
pub fn member(deflate: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = vec![0x1F, 0x8B, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xFF];
    out.extend_from_slice(deflate);
    out.extend_from_slice(&Crc32::compute(payload).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out
}

/// LSB-first bit packer for hand-built DEFLATE streams.
#[derive(Debug, Default)]
pub struct BitPacker {
    bytes: Vec<u8>,
    bit: u32,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` bits of `value`, least significant first.
    pub fn bits(&mut self, value: u32, count: u32) -> &mut Self {
        for i in 0..count {
            if self.bit == 0 {
                self.bytes.push(0);
            }
            if (value >> i) & 1 == 1 {
                if let Some(last) = self.bytes.last_mut() {
                    *last |= 1 << self.bit;
                }
            }
            self.bit = (self.bit + 1) % 8;
        }
        self
    }

    /// Append a Huffman code, most significant bit first.
    pub fn code(&mut self, code: u32, length: u32) -> &mut Self {
        for i in (0..length).rev() {
            self.bits((code >> i) & 1, 1);
        }
        self
    }

    /// Append whole bytes after padding to a byte boundary.
    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.bit = 0;
        self.bytes.extend_from_slice(data);
        self
    }

    /// Block header: BFINAL then BTYPE.
    pub fn block_header(&mut self, is_final: bool, block_type: u32) -> &mut Self {
        self.bits(is_final as u32, 1).bits(block_type, 2)
    }

    /// A literal/length symbol with the fixed code.
    pub fn fixed_symbol(&mut self, symbol: u32) -> &mut Self {
        match symbol {
            0..=143 => self.code(0x30 + symbol, 8),
            144..=255 => self.code(0x190 + symbol - 144, 9),
            256..=279 => self.code(symbol - 256, 7),
            _ => self.code(0xC0 + symbol - 280, 8),
        }
    }

    pub fn fixed_literals(&mut self, data: &[u8]) -> &mut Self {
        for &byte in data {
            self.fixed_symbol(byte as u32);
        }
        self
    }

    pub fn fixed_end_of_block(&mut self) -> &mut Self {
        self.fixed_symbol(256)
    }

    /// A back-reference with fixed codes. Lengths 3-10 and distances 1-4
    /// need no extra bits.
    pub fn fixed_short_match(&mut self, length: u32, distance: u32) -> &mut Self {
        assert!((3..=10).contains(&length) && (1..=4).contains(&distance));
        self.fixed_symbol(257 + length - 3).code(distance - 1, 5)
    }

    /// A stored block holding `data`.
    pub fn stored_block(&mut self, is_final: bool, data: &[u8]) -> &mut Self {
        let len = data.len() as u16;
        self.block_header(is_final, 0)
            .raw(&len.to_le_bytes())
            .raw(&(!len).to_le_bytes())
            .raw(data)
    }

    pub fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Deterministic pseudo-random bytes.
pub fn pseudo_random(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as u8
        })
        .collect()
}

/// Text-like bytes with plenty of repeats.
pub fn text_like(size: usize) -> Vec<u8> {
    let text = b"The quick brown fox jumps over the lazy dog. Pack my box with five dozen liquor jugs. ";
    text.iter().copied().cycle().take(size).collect()
}
