//! Error types for OxiGz operations.
//!
//! Every error is fatal for the stream it was raised on: DEFLATE data cannot
//! be resynchronised after corruption, so nothing in the decoder retries.

use std::io;
use thiserror::Error;

/// The main error type for OxiGz operations.
#[derive(Debug, Error)]
pub enum GzError {
    /// I/O error from the underlying reader.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input ended in the middle of a member.
    #[error("Unexpected end of input at bit {bit_position}")]
    UnexpectedEof {
        /// Number of bits consumed when the input ran out.
        bit_position: u64,
    },

    /// The input contained no bytes at all.
    #[error("Empty input: no gzip member found")]
    EmptyInput,

    /// Malformed gzip member header.
    #[error("Invalid gzip header: {message}")]
    InvalidGzHeader {
        /// Description of the header error.
        message: String,
    },

    /// Reserved DEFLATE block type 3.
    #[error("Invalid block type {block_type}")]
    InvalidBlockType {
        /// The 2-bit BTYPE value.
        block_type: u8,
    },

    /// Stored block LEN is not the one's complement of NLEN.
    #[error("Stored block length mismatch: LEN={len:#06x}, NLEN={nlen:#06x}")]
    StoredLengthMismatch {
        /// LEN field.
        len: u16,
        /// NLEN field.
        nlen: u16,
    },

    /// Code length array cannot form a canonical Huffman code.
    #[error("Invalid code lengths: {message}")]
    InvalidCodeLengths {
        /// Description of the problem.
        message: String,
    },

    /// A bit pattern resolved to an unused decoding table slot.
    #[error("Huffman code not found for bits {bits:#010x}")]
    HuffmanCodeNotFound {
        /// The peeked bits that failed to decode.
        bits: u32,
    },

    /// Back-reference reaches before the start of the available history.
    #[error("Back-reference distance {distance} exceeds available history {available}")]
    DistanceTooFar {
        /// The decoded distance.
        distance: usize,
        /// Bytes of history available at the write cursor.
        available: usize,
    },

    /// A decoded symbol lies outside its alphabet's valid range.
    #[error("Invalid {alphabet} symbol {symbol}")]
    InvalidSymbol {
        /// Alphabet the symbol was decoded from.
        alphabet: &'static str,
        /// The offending symbol.
        symbol: u16,
    },

    /// Dynamic block code lengths did not add up to HLIT + HDIST.
    #[error("Dynamic codebook length count mismatch: expected {expected}, decoded {decoded}")]
    CodeLengthCount {
        /// HLIT + HDIST.
        expected: usize,
        /// Number of lengths actually decoded.
        decoded: usize,
    },

    /// CRC-32 of the member's output differs from its footer.
    #[error("CRC mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// CRC-32 from the footer.
        expected: u32,
        /// CRC-32 of the decoded bytes.
        computed: u32,
    },

    /// Output length modulo 2^32 differs from the footer's ISIZE.
    #[error("Size mismatch: expected {expected}, computed {computed}")]
    SizeMismatch {
        /// ISIZE from the footer.
        expected: u32,
        /// Decoded length modulo 2^32.
        computed: u32,
    },

    /// The stream already failed and cannot be read further.
    #[error("Stream already failed; no further data can be decoded")]
    Poisoned,

    /// The pipelined decoding worker stopped without reporting a result.
    #[error("Decoding worker exited unexpectedly")]
    WorkerLost,
}

/// Result type alias for OxiGz operations.
pub type Result<T> = std::result::Result<T, GzError>;

impl GzError {
    /// Create an unexpected end-of-input error.
    pub fn unexpected_eof(bit_position: u64) -> Self {
        Self::UnexpectedEof { bit_position }
    }

    /// Create an invalid gzip header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidGzHeader {
            message: message.into(),
        }
    }

    /// Create an invalid block type error.
    pub fn invalid_block_type(block_type: u8) -> Self {
        Self::InvalidBlockType { block_type }
    }

    /// Create a stored block length mismatch error.
    pub fn stored_length_mismatch(len: u16, nlen: u16) -> Self {
        Self::StoredLengthMismatch { len, nlen }
    }

    /// Create an invalid code lengths error.
    pub fn invalid_code_lengths(message: impl Into<String>) -> Self {
        Self::InvalidCodeLengths {
            message: message.into(),
        }
    }

    /// Create a Huffman code not found error.
    pub fn code_not_found(bits: u32) -> Self {
        Self::HuffmanCodeNotFound { bits }
    }

    /// Create a distance too far error.
    pub fn distance_too_far(distance: usize, available: usize) -> Self {
        Self::DistanceTooFar {
            distance,
            available,
        }
    }

    /// Create an invalid symbol error.
    pub fn invalid_symbol(alphabet: &'static str, symbol: u16) -> Self {
        Self::InvalidSymbol { alphabet, symbol }
    }

    /// Create a code length count mismatch error.
    pub fn code_length_count(expected: usize, decoded: usize) -> Self {
        Self::CodeLengthCount { expected, decoded }
    }

    /// Create a CRC mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Create a size mismatch error.
    pub fn size_mismatch(expected: u32, computed: u32) -> Self {
        Self::SizeMismatch { expected, computed }
    }
}

impl From<GzError> for io::Error {
    fn from(err: GzError) -> Self {
        match err {
            GzError::Io(inner) => inner,
            GzError::UnexpectedEof { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
