//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use oxigz_gzip::{Decompressor, MemberSummary, PipelinedDecompressor};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;

/// Input stream handed to the decompressor.
pub type Input = Box<dyn Read + Send>;

/// Open `path`, or stdin when no path is given.
pub fn open_input(path: Option<&Path>) -> io::Result<Input> {
    match path {
        Some(path) => Ok(Box::new(File::open(path)?)),
        None => Ok(Box::new(io::stdin())),
    }
}

/// Either decompressor driver behind one interface.
pub enum Session {
    Sequential(Decompressor<Input>),
    Pipelined(PipelinedDecompressor),
}

impl Session {
    pub fn new(input: Input, threaded: bool) -> Self {
        if threaded {
            Session::Pipelined(PipelinedDecompressor::new(input))
        } else {
            Session::Sequential(Decompressor::new(input))
        }
    }

    /// Decompress everything that is left into `writer`.
    pub fn copy_to<W: Write>(&mut self, writer: &mut W) -> oxigz_gzip::Result<u64> {
        match self {
            Session::Sequential(d) => d.copy_to(writer),
            Session::Pipelined(d) => d.copy_to(writer),
        }
    }

    pub fn members(&self) -> &[MemberSummary] {
        match self {
            Session::Sequential(d) => d.members(),
            Session::Pipelined(d) => d.members(),
        }
    }
}

/// Create a byte-counting spinner on stderr, or a hidden one.
pub fn create_spinner(enable: bool) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    if !enable {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template(
        "{spinner} [{elapsed_precise}] {bytes} ({bytes_per_sec})",
    )?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// One-line description of a verified member.
pub fn describe_member(index: usize, member: &MemberSummary) -> String {
    let header = &member.header;
    let mut line = format!(
        "member {}: {} bytes, crc32 {:08x}, os {}",
        index + 1,
        member.footer.size,
        member.footer.crc32,
        header.os_name()
    );
    if header.mtime > 0 {
        line.push_str(&format!(", mtime {}", header.mtime));
    }
    if let Some(name) = &header.filename {
        line.push_str(&format!(", name {}", name));
    }
    if let Some(comment) = &header.comment {
        line.push_str(&format!(", comment {:?}", comment));
    }
    line
}

/// Print members in a formatted table.
pub fn print_members(members: &[MemberSummary]) {
    println!(
        "{:>6} {:>12} {:>8} {:>12} {:>12}  Name",
        "Member", "Size", "CRC32", "MTime", "OS"
    );
    println!("{}", "-".repeat(64));

    let mut total_size = 0u64;
    for (i, member) in members.iter().enumerate() {
        println!(
            "{:>6} {:>12} {:08x} {:>12} {:>12}  {}",
            i + 1,
            member.footer.size,
            member.footer.crc32,
            member.header.mtime,
            member.header.os_name(),
            member.header.filename.as_deref().unwrap_or("-")
        );
        total_size += u64::from(member.footer.size);
    }

    println!("{}", "-".repeat(64));
    println!("{:>6} {:>12}  {} members", "", total_size, members.len());
}
