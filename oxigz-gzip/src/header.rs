//! GZIP member header and footer parsing (RFC 1952).

use encoding_rs::WINDOWS_1252;
use oxigz_core::error::{GzError, Result};
use oxigz_core::{BitReader, Crc32};
use std::io::Read;

/// GZIP magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// GZIP compression method: DEFLATE.
pub const CM_DEFLATE: u8 = 8;

/// Size of the fixed part of a member header.
pub const FIXED_HEADER_SIZE: usize = 10;

/// Size of a member footer.
pub const FOOTER_SIZE: usize = 8;

/// GZIP header flags.
pub mod flags {
    /// Text file.
    pub const FTEXT: u8 = 0x01;
    /// Header CRC present.
    pub const FHCRC: u8 = 0x02;
    /// Extra field present.
    pub const FEXTRA: u8 = 0x04;
    /// Original filename present.
    pub const FNAME: u8 = 0x08;
    /// Comment present.
    pub const FCOMMENT: u8 = 0x10;
    /// Bits 5-7 must be zero.
    pub const RESERVED: u8 = 0xE0;
}

/// GZIP member header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// Flags.
    pub flags: u8,
    /// Modification time (Unix timestamp, 0 if unknown).
    pub mtime: u32,
    /// Extra flags.
    pub xfl: u8,
    /// Operating system.
    pub os: u8,
    /// Extra field payload (if FEXTRA flag set).
    pub extra: Option<Vec<u8>>,
    /// Original filename (if FNAME flag set), decoded as ISO-8859-1.
    pub filename: Option<String>,
    /// Comment (if FCOMMENT flag set), decoded as ISO-8859-1.
    pub comment: Option<String>,
    /// Header CRC16 (if FHCRC flag set). Already verified.
    pub header_crc: Option<u16>,
    /// Encoded size of the header in bytes.
    pub size: usize,
}

impl GzipHeader {
    /// Read a member header from the current (byte-aligned) position.
    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let mut input = HeaderInput {
            reader,
            crc: Crc32::new(),
            size: 0,
        };

        let mut buf = [0u8; FIXED_HEADER_SIZE];
        input.read_exact(&mut buf)?;

        if buf[0..2] != GZIP_MAGIC {
            return Err(GzError::invalid_header(format!(
                "bad magic {:02x} {:02x}",
                buf[0], buf[1]
            )));
        }
        if buf[2] != CM_DEFLATE {
            return Err(GzError::invalid_header(format!(
                "unsupported compression method {}",
                buf[2]
            )));
        }
        let flags = buf[3];
        if flags & flags::RESERVED != 0 {
            return Err(GzError::invalid_header(format!(
                "reserved flag bits set: {:#04x}",
                flags
            )));
        }

        let mtime = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        let xfl = buf[8];
        let os = buf[9];

        // Extra field
        let extra = if flags & flags::FEXTRA != 0 {
            let mut xlen = [0u8; 2];
            input.read_exact(&mut xlen)?;
            let mut extra = vec![0u8; u16::from_le_bytes(xlen) as usize];
            input.read_exact(&mut extra)?;
            Some(extra)
        } else {
            None
        };

        let filename = if flags & flags::FNAME != 0 {
            Some(input.read_latin1_string()?)
        } else {
            None
        };

        let comment = if flags & flags::FCOMMENT != 0 {
            Some(input.read_latin1_string()?)
        } else {
            None
        };

        // Header CRC covers every byte before it
        let header_crc = if flags & flags::FHCRC != 0 {
            let computed = (input.crc.value() & 0xFFFF) as u16;
            let mut crc_buf = [0u8; 2];
            input.read_exact(&mut crc_buf)?;
            let stored = u16::from_le_bytes(crc_buf);
            if stored != computed {
                return Err(GzError::invalid_header(format!(
                    "header CRC mismatch: stored {:#06x}, computed {:#06x}",
                    stored, computed
                )));
            }
            Some(stored)
        } else {
            None
        };

        Ok(Self {
            flags,
            mtime,
            xfl,
            os,
            extra,
            filename,
            comment,
            header_crc,
            size: input.size,
        })
    }

    /// Whether the FTEXT flag marks the content as probably text.
    pub fn is_text(&self) -> bool {
        self.flags & flags::FTEXT != 0
    }

    /// Name of the operating system recorded in the header.
    pub fn os_name(&self) -> &'static str {
        match self.os {
            0 => "FAT",
            1 => "Amiga",
            2 => "VMS",
            3 => "Unix",
            4 => "VM/CMS",
            5 => "Atari TOS",
            6 => "HPFS",
            7 => "Macintosh",
            8 => "Z-System",
            9 => "CP/M",
            10 => "TOPS-20",
            11 => "NTFS",
            12 => "QDOS",
            13 => "Acorn RISCOS",
            _ => "unknown",
        }
    }
}

/// Header bytes are fed through the CRC as they are read, for FHCRC.
struct HeaderInput<'a, R: Read> {
    reader: &'a mut BitReader<R>,
    crc: Crc32,
    size: usize,
}

impl<R: Read> HeaderInput<'_, R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf)?;
        self.crc.update(buf);
        self.size += buf.len();
        Ok(())
    }

    /// Read a zero-terminated ISO-8859-1 string.
    fn read_latin1_string(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            self.read_exact(&mut byte)?;
            if byte[0] == 0 {
                break;
            }
            bytes.push(byte[0]);
        }
        let (text, _) = WINDOWS_1252.decode_without_bom_handling(&bytes);
        Ok(text.into_owned())
    }
}

/// GZIP member footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GzipFooter {
    /// CRC-32 of the uncompressed data.
    pub crc32: u32,
    /// Uncompressed size modulo 2^32.
    pub size: u32,
}

impl GzipFooter {
    /// Read the 8-byte footer, aligning to the next byte first.
    pub fn read<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let crc32 = reader.read_u32_le()?;
        let size = reader.read_u32_le()?;
        Ok(Self { crc32, size })
    }
}
