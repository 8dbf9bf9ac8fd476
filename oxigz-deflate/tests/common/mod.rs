//! Shared helpers for DEFLATE integration tests.

#![allow(dead_code)]

use oxigz_core::error::Result;
use oxigz_core::{BitReader, SlidingWindow};
use oxigz_deflate::block::{
    BlockCodes, BlockHeader, BlockType, read_dynamic_codes, read_stored_length,
};
use oxigz_deflate::lz77::{BlockProgress, decode_block};
use oxigz_deflate::tables::{DISTANCE_BASE, DISTANCE_EXTRA_BITS, LENGTH_BASE, LENGTH_EXTRA_BITS};
use std::io::{Cursor, Read};

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

    /// Pad to the next byte boundary.
    pub fn align(&mut self) -> &mut Self {
        self.bit = 0;
        self
    }

    /// Append whole bytes after aligning.
    pub fn raw(&mut self, data: &[u8]) -> &mut Self {
        self.align();
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

    /// A back-reference with fixed codes.
    pub fn fixed_match(&mut self, length: u16, distance: u16) -> &mut Self {
        let code = LENGTH_BASE
            .iter()
            .rposition(|&base| base <= length)
            .expect("length in range");
        self.fixed_symbol(257 + code as u32).bits(
            (length - LENGTH_BASE[code]) as u32,
            LENGTH_EXTRA_BITS[code] as u32,
        );

        let code = DISTANCE_BASE
            .iter()
            .rposition(|&base| base <= distance)
            .expect("distance in range");
        self.code(code as u32, 5).bits(
            (distance - DISTANCE_BASE[code]) as u32,
            DISTANCE_EXTRA_BITS[code] as u32,
        )
    }

    /// A stored block holding `data`.
    pub fn stored_block(&mut self, is_final: bool, data: &[u8]) -> &mut Self {
        let len = data.len() as u16;
        self.block_header(is_final, 0);
        self.raw(&len.to_le_bytes())
            .raw(&(!len).to_le_bytes())
            .raw(data)
    }

    pub fn finish(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

/// Reader over `data` followed by zero padding so that peeks near the end
/// succeed, as the gzip footer guarantees in real streams.
pub fn padded_reader(data: &[u8]) -> BitReader<Cursor<Vec<u8>>> {
    let mut bytes = data.to_vec();
    bytes.extend_from_slice(&[0; 8]);
    BitReader::new(Cursor::new(bytes))
}

/// Decode one block's worth of symbols into `window`, draining into `out`.
pub fn inflate_block_into<R: Read>(
    reader: &mut BitReader<R>,
    window: &mut SlidingWindow,
    codes: &BlockCodes,
    out: &mut Vec<u8>,
) -> Result<()> {
    let (litlen, dist) = codes.decoders()?;
    loop {
        let (area, boundary) = window.decode_area();
        let progress = decode_block(area, boundary, reader, litlen, dist)?;
        let produced = progress.produced();
        out.extend_from_slice(window.pending(produced));
        window.slide(produced);
        if let BlockProgress::EndOfBlock { .. } = progress {
            return Ok(());
        }
    }
}

/// Decode a raw DEFLATE stream by driving the block primitives.
pub fn inflate_raw(data: &[u8]) -> Result<Vec<u8>> {
    inflate_reader(&mut padded_reader(data))
}

/// Decode blocks until the final one.
pub fn inflate_reader<R: Read>(reader: &mut BitReader<R>) -> Result<Vec<u8>> {
    let mut window = SlidingWindow::new();
    let mut out = Vec::new();
    loop {
        let header = BlockHeader::read(reader)?;
        match header.block_type {
            BlockType::Stored => {
                let len = read_stored_length(reader)? as usize;
                let mut buf = vec![0u8; len];
                reader.read_exact(&mut buf)?;
                window.extend(&buf);
                out.extend_from_slice(&buf);
            }
            BlockType::Fixed => {
                inflate_block_into(reader, &mut window, &BlockCodes::Fixed, &mut out)?
            }
            BlockType::Dynamic => {
                let codes = read_dynamic_codes(reader)?;
                inflate_block_into(reader, &mut window, &codes, &mut out)?
            }
        }
        if header.is_final {
            return Ok(out);
        }
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
    let words: [&[u8]; 8] = [
        b"gzip ", b"member ", b"window ", b"huffman ", b"block ", b"stream ", b"the ", b"of ",
    ];
    let mut data = Vec::with_capacity(size);
    let mut i = 0usize;
    while data.len() < size {
        data.extend_from_slice(words[(i * 7 + i / 3) % words.len()]);
        i += 1;
    }
    data.truncate(size);
    data
}
