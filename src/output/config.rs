//! Output configuration types

const DEFAULT_INDENT: usize = 4;

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Spaces per nesting level in pretty output
    pub indent: usize,
    /// One object per line instead of pretty-printed documents
    pub compact: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            compact: false,
        }
    }
}
