//! Decompress command implementation.

use crate::utils::{Session, create_spinner, describe_member, open_input};
use std::io::{self, BufWriter};
use std::path::Path;

/// Options for the decompress command.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecompressOptions {
    pub threaded: bool,
    pub verbose: bool,
    pub progress: bool,
}

pub fn cmd_decompress(
    input: Option<&Path>,
    options: DecompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(open_input(input)?, options.threaded);

    let pb = create_spinner(options.progress)?;
    let stdout = io::stdout();
    let mut writer = pb.wrap_write(BufWriter::new(stdout.lock()));
    let result = session.copy_to(&mut writer);
    pb.finish_and_clear();

    // Members that passed their checks are reported even when a later one fails
    if options.verbose {
        for (i, member) in session.members().iter().enumerate() {
            eprintln!("{}", describe_member(i, member));
        }
    }

    let total = result?;
    if options.verbose {
        eprintln!(
            "{} bytes from {} member(s){}",
            total,
            session.members().len(),
            if options.threaded { " (threaded)" } else { "" }
        );
    }
    Ok(())
}
