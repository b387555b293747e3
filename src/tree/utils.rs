//! Shared utility functions for tree building

use std::env;
use std::fs;
use std::io;
use std::path::{self, Component, Path, PathBuf};

use glob::Pattern;
use log::warn;

/// Marker character for hidden entries.
pub const HIDDEN_PREFIX: char = '.';

/// Resolve the display name of `path`.
///
/// Uses the last component when there is one. Otherwise the absolute form is
/// compared against `/` and the current directory; anything else keeps the
/// path as given (e.g. `..`).
pub fn display_name(path: &Path) -> String {
    if let Some(name) = path.file_name() {
        return name.to_string_lossy().into_owned();
    }

    if let Ok(absolute) = path::absolute(path) {
        if absolute == Path::new("/") {
            return "/".to_string();
        }
        if env::current_dir().is_ok_and(|cwd| cwd == absolute) {
            return ".".to_string();
        }
    }

    path.to_string_lossy().into_owned()
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_PREFIX)
}

/// Ordering key: lowercase with leading dots stripped, then the raw name.
pub fn sort_key(name: &str) -> (String, &str) {
    (name.trim_start_matches(HIDDEN_PREFIX).to_lowercase(), name)
}

pub fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
}

/// Compile ignore patterns, skipping (and reporting) invalid ones.
pub fn compile_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("ignoring invalid pattern '{}': {}", p, e);
                None
            }
        })
        .collect()
}

/// Check if a name should be ignored based on exact or glob matches.
pub fn should_ignore_name(name: &str, patterns: &[Pattern]) -> bool {
    patterns
        .iter()
        .any(|p| p.as_str() == name || p.matches(name))
}

/// Upper bound on links followed while resolving a dangling chain.
const MAX_LINK_HOPS: usize = 40;

/// Resolve the absolute, fully followed target of the symlink at `path`.
///
/// Dangling or looping links cannot be canonicalized. For those the chain is
/// followed hop by hop until it leaves symlinks (or `MAX_LINK_HOPS` is hit),
/// then resolved as far as the filesystem allows.
pub fn resolve_target(path: &Path) -> io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(target) => return Ok(target),
        Err(e) => warn!("cannot fully resolve {}: {}", path.display(), e),
    }

    let mut current = path::absolute(path)?;
    for _ in 0..MAX_LINK_HOPS {
        let Ok(link) = fs::read_link(&current) else {
            break;
        };
        let base = current.parent().unwrap_or_else(|| Path::new("/"));
        current = path::absolute(base.join(link))?;
    }

    Ok(resolve_existing_prefix(&current))
}

/// Canonicalize each leading component that exists, keeping the rest as-is.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => {
                let next = resolved.join(other);
                resolved = fs::canonicalize(&next).unwrap_or(next);
            }
        }
    }
    resolved
}
