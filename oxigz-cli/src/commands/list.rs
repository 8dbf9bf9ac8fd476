//! List command implementation.

use crate::utils::{Session, open_input, print_members};
use oxigz_gzip::MemberSummary;
use serde::Serialize;
use std::io;
use std::path::Path;

/// Options for the list command.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub threaded: bool,
    pub json: bool,
}

/// JSON output structure for a member.
#[derive(Debug, Serialize)]
struct JsonMember {
    index: usize,
    size: u32,
    crc32: u32,
    mtime: u32,
    os: &'static str,
    text: bool,
    header_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extra_len: Option<usize>,
}

impl JsonMember {
    fn new(index: usize, member: &MemberSummary) -> Self {
        let header = &member.header;
        Self {
            index: index + 1,
            size: member.footer.size,
            crc32: member.footer.crc32,
            mtime: header.mtime,
            os: header.os_name(),
            text: header.is_text(),
            header_size: header.size,
            filename: header.filename.clone(),
            comment: header.comment.clone(),
            extra_len: header.extra.as_ref().map(Vec::len),
        }
    }
}

/// JSON output structure for a listing.
#[derive(Debug, Serialize)]
struct JsonListOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    total_size: u64,
    members: Vec<JsonMember>,
}

/// Decode the whole stream to a sink, then print the verified members.
pub fn cmd_list(
    input: Option<&Path>,
    options: ListOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(open_input(input)?, options.threaded);
    let total_size = session.copy_to(&mut io::sink())?;
    let members = session.members();

    if options.json {
        let output = JsonListOutput {
            file: input.map(|p| p.display().to_string()),
            total_size,
            members: members
                .iter()
                .enumerate()
                .map(|(i, m)| JsonMember::new(i, m))
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_members(members);
    }

    Ok(())
}
