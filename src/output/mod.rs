//! Entry record formatting and display
//!
//! - `config` - Output configuration types
//! - `json` - JSON rendering and output

mod config;
mod json;

pub use config::OutputConfig;
pub use json::{print_json, render, write_json};
