//! CRC-32 checksum for gzip members.
//!
//! - **CRC-32 (ISO 3309)**: the checksum stored in every gzip footer, and the
//!   source of the optional 16-bit header CRC.
//!
//! ## Performance Optimization
//!
//! Inputs of 16 bytes or more go through "slicing-by-8": eight pre-computed
//! tables let the loop fold 8 bytes per iteration. Shorter inputs use the
//! single-table byte loop.

/// CRC-32 polynomial (reflected).
const CRC32_POLY: u32 = 0xEDB88320;

/// CRC-32 slicing-by-8 lookup tables. Table 0 is the classic byte table.
const CRC32_TABLES: [[u32; 256]; 8] = {
    let mut tables = [[0u32; 256]; 8];

    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ CRC32_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        tables[0][i] = crc;
        i += 1;
    }

    let mut t = 1;
    while t < 8 {
        let mut i = 0usize;
        while i < 256 {
            let prev = tables[t - 1][i];
            tables[t][i] = tables[0][(prev & 0xFF) as usize] ^ (prev >> 8);
            i += 1;
        }
        t += 1;
    }

    tables
};

/// CRC-32 calculator (ISO 3309).
///
/// - Polynomial: 0x04C11DB7 (reflected: 0xEDB88320)
/// - Initial value: 0xFFFFFFFF
/// - Final XOR: 0xFFFFFFFF
///
/// # Example
///
/// ```
/// use oxigz_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, ");
/// crc.update(b"World!");
/// assert_eq!(crc.value(), 0xEC4AC3D0);
/// ```
#[derive(Debug, Clone)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    /// Create a new CRC-32 calculator.
    pub fn new() -> Self {
        Self { crc: 0xFFFFFFFF }
    }

    /// Reset the CRC to its initial state.
    pub fn reset(&mut self) {
        self.crc = 0xFFFFFFFF;
    }

    /// Update the CRC with more data.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        if data.len() >= 16 {
            self.crc = crc32_slice8(self.crc, data);
        } else {
            self.crc = crc32_bytes(self.crc, data);
        }
    }

    /// Get the CRC of everything fed so far.
    #[inline(always)]
    pub fn value(&self) -> u32 {
        self.crc ^ 0xFFFFFFFF
    }

    /// Compute CRC-32 for a slice in one call.
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.value()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn crc32_bytes(mut crc: u32, data: &[u8]) -> u32 {
    for &byte in data {
        crc = CRC32_TABLES[0][((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }
    crc
}

#[inline]
fn crc32_slice8(mut crc: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(8);
    for chunk in &mut chunks {
        let lo = crc ^ u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        crc = CRC32_TABLES[7][(lo & 0xFF) as usize]
            ^ CRC32_TABLES[6][((lo >> 8) & 0xFF) as usize]
            ^ CRC32_TABLES[5][((lo >> 16) & 0xFF) as usize]
            ^ CRC32_TABLES[4][(lo >> 24) as usize]
            ^ CRC32_TABLES[3][chunk[4] as usize]
            ^ CRC32_TABLES[2][chunk[5] as usize]
            ^ CRC32_TABLES[1][chunk[6] as usize]
            ^ CRC32_TABLES[0][chunk[7] as usize];
    }
    crc32_bytes(crc, chunks.remainder())
}

/// CRC-32 plus byte count of a gzip member's decoded output.
///
/// Fed with every data chunk, checked against the member footer and reset
/// for the next member.
#[derive(Debug, Clone, Default)]
pub struct RunningChecksum {
    crc: Crc32,
    len: u64,
}

impl RunningChecksum {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for a chunk of decoded output.
    pub fn update(&mut self, data: &[u8]) {
        self.crc.update(data);
        self.len += data.len() as u64;
    }

    /// CRC-32 of the bytes seen since the last reset.
    pub fn crc(&self) -> u32 {
        self.crc.value()
    }

    /// Number of bytes seen since the last reset.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether no bytes were seen since the last reset.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reset for the next member.
    pub fn reset(&mut self) {
        self.crc.reset();
        self.len = 0;
    }

    /// Compare against a footer's CRC-32 and ISIZE, then reset.
    ///
    /// The CRC is checked first. The accumulator is reset whatever the outcome.
    pub fn verify(&mut self, expected_crc: u32, expected_size: u32) -> crate::Result<()> {
        let crc = self.crc();
        let size = self.len as u32;
        self.reset();

        if crc != expected_crc {
            return Err(crate::GzError::checksum_mismatch(expected_crc, crc));
        }
        if size != expected_size {
            return Err(crate::GzError::size_mismatch(expected_size, size));
        }
        Ok(())
    }
}
