//! Configuration types for tree building

/// Configuration for tree building behavior.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Include entries whose name starts with `.`
    pub include_hidden: bool,
    /// Nest full records for children instead of listing their names
    pub recursive: bool,
    /// Maximum descent in recursive mode (the root is depth 0)
    pub max_depth: Option<usize>,
    /// Glob patterns matched against child names; matches are left out
    pub ignore_patterns: Vec<String>,
    /// Number of parallel workers for recursive traversal.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
}
