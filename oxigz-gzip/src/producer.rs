//! Block producer: a state machine that turns a gzip byte stream into a
//! sequence of units, one per step.
//!
//! Per member the sequence is one [`Produced::Header`], zero or more
//! [`Produced::Data`] chunks and one [`Produced::Footer`]. The end of the
//! stream is the absence of a further unit.
//!
//! ```text
//!            ┌─────────────────────────────────────────────┐
//!            v                                             │
//!  Header ──> Block ──> Inflate { final } ──> Footer ──────┘
//!    │          ^  │         │   ^               ^
//!    │          │  │         └───┘ window full   │
//!    │          └──┴─────────────────────────────┘
//!    └──> Done (no data after a member)
//! ```

use crate::header::{GzipFooter, GzipHeader};
use oxigz_core::error::{GzError, Result};
use oxigz_core::{BitReader, SlidingWindow};
use oxigz_deflate::block::{
    BlockCodes, BlockHeader, BlockType, read_dynamic_codes, read_stored_length,
};
use oxigz_deflate::lz77::{BlockProgress, decode_block};
use std::io::Read;

/// One unit of producer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Produced {
    /// A member header was parsed.
    Header(GzipHeader),
    /// Decoded bytes. May be empty.
    Data(Vec<u8>),
    /// A member footer was parsed; its checks are left to the consumer.
    Footer(GzipFooter),
}

/// Anything that yields producer units in order.
pub trait UnitSource {
    /// The next unit, `Ok(None)` at the end of the stream.
    fn next_unit(&mut self) -> Result<Option<Produced>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Block,
    Inflate { is_final: bool },
    Footer,
    Done,
    /// A step failed; the input position is undefined.
    Failed,
}

/// Gzip block producer.
#[derive(Debug)]
pub struct Producer<R: Read> {
    reader: BitReader<R>,
    window: SlidingWindow,
    codes: BlockCodes,
    state: State,
    members: usize,
}

impl<R: Read> Producer<R> {
    /// Create a producer with default buffer and window sizes.
    pub fn new(reader: R) -> Self {
        Self::from_parts(BitReader::new(reader), SlidingWindow::new())
    }

    /// Create a producer from a configured bit reader and window.
    pub fn from_parts(reader: BitReader<R>, window: SlidingWindow) -> Self {
        Self {
            reader,
            window,
            codes: BlockCodes::Fixed,
            state: State::Header,
            members: 0,
        }
    }

    /// Number of member headers read so far.
    pub fn members(&self) -> usize {
        self.members
    }

    /// Total input bits consumed so far.
    pub fn bit_position(&self) -> u64 {
        self.reader.bit_position()
    }

    /// Whether the last member has been fully produced.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Advance by one step.
    ///
    /// After an error every further call fails with `Poisoned`.
    pub fn next_unit(&mut self) -> Result<Option<Produced>> {
        let state = std::mem::replace(&mut self.state, State::Failed);
        let (next, unit) = self.step(state)?;
        self.state = next;
        Ok(unit)
    }

    fn step(&mut self, state: State) -> Result<(State, Option<Produced>)> {
        match state {
            State::Header => {
                if !self.reader.has_data_left()? {
                    if self.members == 0 {
                        return Err(GzError::EmptyInput);
                    }
                    return Ok((State::Done, None));
                }
                let header = GzipHeader::read(&mut self.reader)?;
                self.members += 1;
                Ok((State::Block, Some(Produced::Header(header))))
            }
            State::Block => {
                let header = BlockHeader::read(&mut self.reader)?;
                match header.block_type {
                    BlockType::Stored => self.copy_stored(header.is_final),
                    BlockType::Fixed => {
                        self.codes = BlockCodes::Fixed;
                        self.inflate(header.is_final)
                    }
                    BlockType::Dynamic => {
                        self.codes = read_dynamic_codes(&mut self.reader)?;
                        self.inflate(header.is_final)
                    }
                }
            }
            State::Inflate { is_final } => self.inflate(is_final),
            State::Footer => {
                self.window.reset();
                let footer = GzipFooter::read(&mut self.reader)?;
                Ok((State::Header, Some(Produced::Footer(footer))))
            }
            State::Done => Ok((State::Done, None)),
            State::Failed => Err(GzError::Poisoned),
        }
    }

    fn after_block(is_final: bool) -> State {
        if is_final { State::Footer } else { State::Block }
    }

    fn copy_stored(&mut self, is_final: bool) -> Result<(State, Option<Produced>)> {
        let len = read_stored_length(&mut self.reader)? as usize;
        let mut data = vec![0u8; len];
        self.reader.read_exact(&mut data)?;
        self.window.extend(&data);
        Ok((Self::after_block(is_final), Some(Produced::Data(data))))
    }

    /// One LZ77 step with the installed codes.
    fn inflate(&mut self, is_final: bool) -> Result<(State, Option<Produced>)> {
        let (litlen, dist) = self.codes.decoders()?;
        let (area, boundary) = self.window.decode_area();
        let progress = decode_block(area, boundary, &mut self.reader, litlen, dist)?;

        let produced = progress.produced();
        let data = self.window.pending(produced).to_vec();
        self.window.slide(produced);

        let next = match progress {
            BlockProgress::EndOfBlock { .. } => Self::after_block(is_final),
            BlockProgress::WindowFull { .. } => State::Inflate { is_final },
        };
        Ok((next, Some(Produced::Data(data))))
    }
}

impl<R: Read> UnitSource for Producer<R> {
    fn next_unit(&mut self) -> Result<Option<Produced>> {
        Producer::next_unit(self)
    }
}
