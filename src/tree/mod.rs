//! Directory tree building logic
//!
//! The default build lists a directory's immediate children by name. With
//! `WalkerConfig::recursive` set, children are nested as full records.

mod builder;
mod config;
mod entry;
mod utils;

// Re-export public types
pub use builder::{TreeBuilder, build_entry_info, build_tree};
pub use config::WalkerConfig;
pub use entry::{Children, EntryInfo};
pub use utils::{display_name, is_hidden, resolve_target, sort_key, sort_names};
