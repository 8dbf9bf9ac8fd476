//! Pull-based gzip decompressors.
//!
//! [`Gunzip`] drains units from any [`UnitSource`], verifies each member's
//! CRC-32 and ISIZE at its footer, and hands out bytes through
//! [`Gunzip::pull`] or [`std::io::Read`]. The sequential and pipelined
//! variants differ only in their source, so their output and errors are the
//! same for the same input.
//!
//! # Example
//!
//! ```rust
//! use oxigz_gzip::Decompressor;
//! use std::io::{Cursor, Read};
//!
//! // `gzip -n` of "hello\n"
//! let data = vec![
//!     0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xCB, 0x48, 0xCD, 0xC9,
//!     0xC9, 0xE7, 0x02, 0x00, 0x20, 0x30, 0x3A, 0x36, 0x06, 0x00, 0x00, 0x00,
//! ];
//! let mut decompressor = Decompressor::new(Cursor::new(data));
//! let mut text = String::new();
//! decompressor.read_to_string(&mut text).unwrap();
//! assert_eq!(text, "hello\n");
//! assert_eq!(decompressor.members().len(), 1);
//! ```

use crate::header::{GzipFooter, GzipHeader};
use crate::pipeline::PipelinedSource;
use crate::producer::{Produced, Producer, UnitSource};
use oxigz_core::RunningChecksum;
use oxigz_core::error::{GzError, Result};
use std::io::{self, Read, Write};

/// Size of the scratch buffer used by [`Gunzip::pull_to_end`] and
/// [`Gunzip::copy_to`].
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Header and footer of a member whose checks passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    /// Member header.
    pub header: GzipHeader,
    /// Member footer.
    pub footer: GzipFooter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Reading,
    Finished,
    Failed,
}

/// Gzip decompressor over a unit source.
#[derive(Debug)]
pub struct Gunzip<S> {
    source: S,
    chunk: Vec<u8>,
    pos: usize,
    checksum: RunningChecksum,
    header: Option<GzipHeader>,
    members: Vec<MemberSummary>,
    status: Status,
    /// Error raised after bytes were already handed out in the same call.
    pending: Option<GzError>,
}

/// Decompressor that decodes on the calling thread.
pub type Decompressor<R> = Gunzip<Producer<R>>;

/// Decompressor that decodes on a worker thread.
pub type PipelinedDecompressor = Gunzip<PipelinedSource>;

impl<R: Read> Gunzip<Producer<R>> {
    /// Create a sequential decompressor.
    pub fn new(reader: R) -> Self {
        Self::from_source(Producer::new(reader))
    }
}

impl Gunzip<PipelinedSource> {
    /// Create a pipelined decompressor; decoding starts right away on a
    /// worker thread.
    pub fn new<R: Read + Send + 'static>(reader: R) -> Self {
        Self::from_source(PipelinedSource::spawn(reader))
    }
}

impl<S: UnitSource> Gunzip<S> {
    /// Create a decompressor over any unit source.
    pub fn from_source(source: S) -> Self {
        Self {
            source,
            chunk: Vec::new(),
            pos: 0,
            checksum: RunningChecksum::new(),
            header: None,
            members: Vec::new(),
            status: Status::Reading,
            pending: None,
        }
    }

    /// Members verified so far.
    pub fn members(&self) -> &[MemberSummary] {
        &self.members
    }

    /// Copy decompressed bytes into `buf`.
    ///
    /// Fills `buf` unless the stream ends first; returns 0 only at the end of
    /// the stream. An error met after some bytes were copied is reported by
    /// the next call, and every call after an error fails with `Poisoned`.
    pub fn pull(&mut self, buf: &mut [u8]) -> Result<usize> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if self.status == Status::Failed {
            return Err(GzError::Poisoned);
        }

        let mut written = 0;
        loop {
            let available = &self.chunk[self.pos..];
            let n = available.len().min(buf.len() - written);
            buf[written..written + n].copy_from_slice(&available[..n]);
            self.pos += n;
            written += n;
            if written == buf.len() {
                break;
            }

            match self.next_chunk() {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    self.status = Status::Failed;
                    if written == 0 {
                        return Err(err);
                    }
                    self.pending = Some(err);
                    break;
                }
            }
        }
        Ok(written)
    }

    /// Pull everything that is left into `out`. Returns the number of bytes
    /// appended.
    pub fn pull_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        let start = out.len();
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        loop {
            let n = self.pull(&mut buf)?;
            if n == 0 {
                return Ok(out.len() - start);
            }
            out.extend_from_slice(&buf[..n]);
        }
    }

    /// Pull everything that is left and write it to `writer`.
    pub fn copy_to<W: Write>(&mut self, writer: &mut W) -> Result<u64> {
        let mut total = 0u64;
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        loop {
            let n = self.pull(&mut buf)?;
            if n == 0 {
                writer.flush()?;
                return Ok(total);
            }
            writer.write_all(&buf[..n])?;
            total += n as u64;
        }
    }

    /// Request units until a non-empty data chunk arrives (`true`) or the
    /// stream ends (`false`). Footers are checked on the way.
    fn next_chunk(&mut self) -> Result<bool> {
        if self.status == Status::Finished {
            return Ok(false);
        }
        loop {
            match self.source.next_unit()? {
                None => {
                    self.status = Status::Finished;
                    return Ok(false);
                }
                Some(Produced::Header(header)) => self.header = Some(header),
                Some(Produced::Data(data)) => {
                    if data.is_empty() {
                        continue;
                    }
                    self.checksum.update(&data);
                    self.chunk = data;
                    self.pos = 0;
                    return Ok(true);
                }
                Some(Produced::Footer(footer)) => {
                    self.checksum.verify(footer.crc32, footer.size)?;
                    if let Some(header) = self.header.take() {
                        self.members.push(MemberSummary { header, footer });
                    }
                }
            }
        }
    }
}

impl<S: UnitSource> Read for Gunzip<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pull(buf).map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source replaying a fixed list of units.
    struct Scripted(std::vec::IntoIter<Result<Option<Produced>>>);

    impl UnitSource for Scripted {
        fn next_unit(&mut self) -> Result<Option<Produced>> {
            self.0.next().unwrap_or(Ok(None))
        }
    }

    fn header() -> GzipHeader {
        GzipHeader {
            flags: 0,
            mtime: 0,
            xfl: 0,
            os: 3,
            extra: None,
            filename: None,
            comment: None,
            header_crc: None,
            size: 10,
        }
    }

    fn scripted(units: Vec<Result<Option<Produced>>>) -> Gunzip<Scripted> {
        Gunzip::from_source(Scripted(units.into_iter()))
    }

    #[test]
    fn test_skips_empty_chunks_and_verifies() {
        let mut gunzip = scripted(vec![
            Ok(Some(Produced::Header(header()))),
            Ok(Some(Produced::Data(Vec::new()))),
            Ok(Some(Produced::Data(b"12345".to_vec()))),
            Ok(Some(Produced::Data(b"6789".to_vec()))),
            Ok(Some(Produced::Footer(GzipFooter {
                crc32: 0xCBF4_3926,
                size: 9,
            }))),
        ]);
        let mut buf = [0u8; 4];
        assert_eq!(gunzip.pull(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"1234");
        let mut rest = Vec::new();
        assert_eq!(gunzip.pull_to_end(&mut rest).unwrap(), 5);
        assert_eq!(rest, b"56789");
        assert_eq!(gunzip.members().len(), 1);
        assert_eq!(gunzip.pull(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_error_after_partial_copy_is_deferred() {
        let mut gunzip = scripted(vec![
            Ok(Some(Produced::Header(header()))),
            Ok(Some(Produced::Data(b"abc".to_vec()))),
            Err(GzError::unexpected_eof(123)),
        ]);
        let mut buf = [0u8; 8];
        assert_eq!(gunzip.pull(&mut buf).unwrap(), 3);
        assert!(matches!(
            gunzip.pull(&mut buf),
            Err(GzError::UnexpectedEof { bit_position: 123 })
        ));
        assert!(matches!(gunzip.pull(&mut buf), Err(GzError::Poisoned)));
    }

    #[test]
    fn test_footer_mismatch() {
        let mut gunzip = scripted(vec![
            Ok(Some(Produced::Header(header()))),
            Ok(Some(Produced::Data(b"123456789".to_vec()))),
            Ok(Some(Produced::Footer(GzipFooter {
                crc32: 0xCBF4_3926,
                size: 10,
            }))),
        ]);
        let mut out = Vec::new();
        assert!(matches!(
            gunzip.pull_to_end(&mut out),
            Err(GzError::SizeMismatch {
                expected: 10,
                computed: 9
            })
        ));
        assert_eq!(out, b"123456789");
        assert!(gunzip.members().is_empty());
    }

    #[test]
    fn test_read_maps_errors() {
        let mut gunzip = scripted(vec![Err(GzError::EmptyInput)]);
        let err = gunzip.read(&mut [0u8; 4]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
