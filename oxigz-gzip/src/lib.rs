//! # OxiGz Gzip
//!
//! Streaming gzip (RFC 1952) decompression on top of `oxigz-deflate`.
//!
//! ## Features
//!
//! - **Multi-member streams**: concatenated members decode back to back,
//!   each with its own CRC-32 and ISIZE check
//! - **Bounded memory**: one 96 KB window plus the input buffer, whatever
//!   the stream length
//! - **Two drivers**: sequential decoding on the calling thread, or a
//!   pipelined worker thread handing chunks over a rendezvous channel
//!
//! ## Example
//!
//! ```rust
//! use oxigz_gzip::{decompress, decompress_pipelined};
//! use std::io::Cursor;
//!
//! // `gzip -n` of "hello\n"
//! let data = vec![
//!     0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xCB, 0x48, 0xCD, 0xC9,
//!     0xC9, 0xE7, 0x02, 0x00, 0x20, 0x30, 0x3A, 0x36, 0x06, 0x00, 0x00, 0x00,
//! ];
//! assert_eq!(decompress(Cursor::new(data.clone())).unwrap(), b"hello\n");
//! assert_eq!(decompress_pipelined(Cursor::new(data)).unwrap(), b"hello\n");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod decompressor;
pub mod header;
pub mod pipeline;
pub mod producer;

// Re-exports
pub use decompressor::{Decompressor, Gunzip, MemberSummary, PipelinedDecompressor};
pub use header::{GzipFooter, GzipHeader};
pub use oxigz_core::error::{GzError, Result};
pub use pipeline::PipelinedSource;
pub use producer::{Produced, Producer, UnitSource};

use std::io::Read;

/// Decompress a whole gzip stream on the calling thread.
pub fn decompress<R: Read>(reader: R) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    Decompressor::new(reader).pull_to_end(&mut output)?;
    Ok(output)
}

/// Decompress a whole gzip stream with decoding on a worker thread.
pub fn decompress_pipelined<R: Read + Send + 'static>(reader: R) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    PipelinedDecompressor::new(reader).pull_to_end(&mut output)?;
    Ok(output)
}
