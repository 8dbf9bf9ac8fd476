//! Command implementations for OxiGz CLI.

pub mod decompress;
pub mod list;

pub use decompress::{DecompressOptions, cmd_decompress};
pub use list::{ListOptions, cmd_list};
