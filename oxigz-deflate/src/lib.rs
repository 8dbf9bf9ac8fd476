//! # OxiGz Deflate
//!
//! Pure Rust DEFLATE decoding primitives (RFC 1951).
//!
//! This crate provides the pieces a streaming gzip decoder drives block by
//! block; it does not own the window or the input loop.
//!
//! ## Features
//!
//! - **Canonical Huffman codes**: codebook construction from code lengths
//!   and a two-level lookup decoder (9-bit primary table)
//! - **Block headers**: stored, fixed and dynamic block types
//! - **LZ77**: in-place decoding into a flat window with overlapping copies,
//!   stepping out before the window overflows
//!
//! ## Example
//!
//! ```rust
//! use oxigz_core::{BitReader, SlidingWindow};
//! use oxigz_deflate::block::{BlockCodes, BlockHeader, BlockType};
//! use oxigz_deflate::lz77::{BlockProgress, decode_block};
//! use std::io::Cursor;
//!
//! // A final fixed-Huffman block containing "a", padded for peeking
//! let mut reader = BitReader::new(Cursor::new(vec![0x4B, 0x04, 0x00, 0, 0, 0, 0, 0]));
//! let header = BlockHeader::read(&mut reader).unwrap();
//! assert_eq!(header.block_type, BlockType::Fixed);
//!
//! let mut window = SlidingWindow::new();
//! let (litlen, dist) = BlockCodes::Fixed.decoders().unwrap();
//! let (area, boundary) = window.decode_area();
//! let progress = decode_block(area, boundary, &mut reader, litlen, dist).unwrap();
//! assert_eq!(progress, BlockProgress::EndOfBlock { produced: 1 });
//! assert_eq!(window.pending(1), b"a");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod block;
pub mod huffman;
pub mod lz77;
pub mod tables;

// Re-exports
pub use block::{BlockCodes, BlockHeader, BlockType, read_dynamic_codes, read_stored_length};
pub use huffman::{CodeEntry, Codebook, Decoded, HuffmanDecoder};
pub use lz77::{BlockProgress, Token, decode_block};
