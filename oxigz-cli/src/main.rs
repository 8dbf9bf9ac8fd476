//! OxiGz CLI - streaming gzip decompressor
//!
//! Reads a gzip stream from a file or stdin and writes the decompressed bytes
//! to stdout.

mod commands;
mod utils;

use clap::Parser;
use commands::{DecompressOptions, ListOptions, cmd_decompress, cmd_list};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxigz")]
#[command(author, version, about = "Pure Rust streaming gzip decompressor")]
#[command(long_about = "
OxiGz decompresses gzip streams (RFC 1952), including concatenated members.
Input is read from FILE, or from stdin when FILE is omitted; output goes to
stdout.

Examples:
  oxigz < data.gz > data
  oxigz -t data.gz > data
  oxigz -P big.gz | wc -c
  oxigz --list data.gz
  oxigz --list --json data.gz
")]
struct Cli {
    /// Gzip file to decompress (stdin if omitted)
    file: Option<PathBuf>,

    /// Decode on a worker thread, pipelined with output
    #[arg(short, long)]
    threaded: bool,

    /// Print a summary of every member on stderr
    #[arg(short, long)]
    verbose: bool,

    /// List members instead of writing decompressed data
    #[arg(short, long)]
    list: bool,

    /// With --list, print JSON (machine-readable)
    #[arg(long, requires = "list")]
    json: bool,

    /// Show a progress spinner on stderr
    #[arg(short = 'P', long)]
    progress: bool,
}

fn main() {
    let cli = Cli::parse();

    let result = if cli.list {
        cmd_list(
            cli.file.as_deref(),
            ListOptions {
                threaded: cli.threaded,
                json: cli.json,
            },
        )
    } else {
        cmd_decompress(
            cli.file.as_deref(),
            DecompressOptions {
                threaded: cli.threaded,
                verbose: cli.verbose,
                progress: cli.progress,
            },
        )
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
