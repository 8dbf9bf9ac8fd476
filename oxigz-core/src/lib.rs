//! # OxiGz Core
//!
//! Core components for the OxiGz gzip decompressor.
//!
//! - [`bitstream`]: Buffered bit-level reader with peek/consume
//! - [`window`]: Flat sliding window with periodic compaction
//! - [`crc`]: CRC-32 and the per-member running checksum
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     oxigz binary                                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container                                           │
//! │     gzip members, block producer, decompressors         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Canonical Huffman, LZ77 block decoding              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader, SlidingWindow, CRC-32                    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxigz_core::bitstream::BitReader;
//! use oxigz_core::crc::Crc32;
//! use std::io::Cursor;
//!
//! let mut reader = BitReader::new(Cursor::new(vec![0xAB, 0xCD, 0x00, 0x00]));
//! let bits = reader.read_bits(12).unwrap();
//! assert_eq!(bits, 0xDAB);
//!
//! let crc = Crc32::compute(b"Hello, World!");
//! assert_eq!(crc, 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod window;

// Re-exports for convenience
pub use bitstream::BitReader;
pub use crc::{Crc32, RunningChecksum};
pub use error::{GzError, Result};
pub use window::SlidingWindow;
