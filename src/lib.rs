//! jsondir - Display a directory tree in JSON format

pub mod error;
pub mod file_type;
pub mod output;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{Result, TreeError};
pub use file_type::{FileTypeTag, classify};
pub use output::{OutputConfig, print_json, render, write_json};
pub use tree::{Children, EntryInfo, TreeBuilder, WalkerConfig, build_entry_info, build_tree};
