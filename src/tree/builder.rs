//! TreeBuilder - builds entry records in memory for JSON output

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, warn};
use rayon::prelude::*;

use crate::error::{Result, TreeError};
use crate::file_type::{FileTypeTag, classify};

use super::config::WalkerConfig;
use super::entry::{Children, EntryInfo};
use super::utils::{
    compile_patterns, display_name, is_hidden, resolve_target, should_ignore_name, sort_key,
};

/// Build the leaf record for `path`: display name, type and symlink target.
pub fn build_entry_info(path: &Path) -> Result<EntryInfo> {
    let name = display_name(path);
    let file_type = classify(path)?;
    let info = EntryInfo::leaf(name, file_type);

    if file_type != FileTypeTag::SymLink {
        return Ok(info);
    }

    let target = resolve_target(path).map_err(|e| TreeError::from_io(path, e))?;
    Ok(info.with_target(target.to_string_lossy()))
}

/// Build the record for `path`, listing a directory's immediate children by name.
pub fn build_tree(path: &Path, include_hidden: bool) -> Result<EntryInfo> {
    TreeBuilder::new(WalkerConfig {
        include_hidden,
        ..Default::default()
    })
    .build(path)
}

/// Tree builder that produces the full record in memory.
pub struct TreeBuilder {
    config: WalkerConfig,
    ignore: Vec<Pattern>,
}

impl TreeBuilder {
    pub fn new(config: WalkerConfig) -> Self {
        let ignore = compile_patterns(&config.ignore_patterns);
        Self { config, ignore }
    }

    pub fn build(&self, root: &Path) -> Result<EntryInfo> {
        if !self.config.recursive || self.config.parallel_workers <= 1 {
            return self.build_node(root, 0, &[]);
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.parallel_workers)
            .build()
        {
            Ok(pool) => pool.install(|| self.build_node(root, 0, &[])),
            Err(e) => {
                // Fall back to rayon's global pool if custom pool creation fails
                warn!("cannot start {} workers: {}", self.config.parallel_workers, e);
                self.build_node(root, 0, &[])
            }
        }
    }

    /// Build processes several roots independently, in input order.
    pub fn build_all<P: AsRef<Path>>(&self, roots: &[P]) -> Vec<(PathBuf, Result<EntryInfo>)> {
        roots
            .iter()
            .map(|root| {
                let root = root.as_ref();
                (root.to_path_buf(), self.build(root))
            })
            .collect()
    }

    fn build_node(&self, path: &Path, depth: usize, ancestors: &[PathBuf]) -> Result<EntryInfo> {
        let info = build_entry_info(path)?;
        if !info.is_dir() {
            return Ok(info);
        }

        let children = match self.collect_children(path, depth, ancestors) {
            Ok(children) => children,
            // Below the root an unreadable directory is still worth listing
            Err(e) if depth > 0 => {
                warn!("{}", e);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(info.with_children(children))
    }

    fn collect_children(
        &self,
        path: &Path,
        depth: usize,
        ancestors: &[PathBuf],
    ) -> Result<Option<Children>> {
        if !self.config.recursive {
            let names = self.list_children(path)?.into_iter().map(|c| c.name).collect();
            return Ok(Some(Children::Names(names)));
        }

        if self.config.max_depth.is_some_and(|max| depth >= max) {
            return Ok(None);
        }

        let canonical = fs::canonicalize(path).map_err(|e| TreeError::from_io(path, e))?;
        if ancestors.contains(&canonical) {
            warn!("cycle detected at {}, not descending", path.display());
            return Ok(None);
        }
        let mut chain = ancestors.to_vec();
        chain.push(canonical);

        let listed = self.list_children(path)?;
        let build_child = |child: &ListedChild| {
            let child = path.join(&child.file_name);
            let result = self.build_node(&child, depth + 1, &chain);
            (child, result)
        };

        let results: Vec<_> = if self.config.parallel_workers == 1 {
            listed.iter().map(build_child).collect()
        } else {
            listed.par_iter().map(build_child).collect()
        };

        let entries = keep_built_children(results);
        Ok(Some(Children::Entries(entries)))
    }

    /// Read, filter, and sort a directory's immediate children.
    fn list_children(&self, path: &Path) -> Result<Vec<ListedChild>> {
        let entries = fs::read_dir(path).map_err(|e| TreeError::from_io(path, e))?;

        let mut listed: Vec<ListedChild> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(ListedChild::new(entry.file_name())),
                Err(e) => {
                    debug!("skipping unreadable entry in {}: {}", path.display(), e);
                    None
                }
            })
            .filter(|child| self.config.include_hidden || !is_hidden(&child.name))
            .filter(|child| !should_ignore_name(&child.name, &self.ignore))
            .collect();

        listed.sort_by(|a, b| sort_key(&a.name).cmp(&sort_key(&b.name)));
        Ok(listed)
    }
}

/// A directory child: its display name and the raw name used to reach it.
struct ListedChild {
    name: String,
    file_name: OsString,
}

impl ListedChild {
    fn new(file_name: OsString) -> Self {
        let name = file_name.to_string_lossy().into_owned();
        Self { name, file_name }
    }
}

/// Keep the children that were built, skipping those that failed.
///
/// A child that is gone by the time it is classified is dropped quietly;
/// any other failure is logged. Siblings are unaffected either way.
fn keep_built_children(results: Vec<(PathBuf, Result<EntryInfo>)>) -> Vec<EntryInfo> {
    results
        .into_iter()
        .filter_map(|(child, result)| match result {
            Ok(entry) => Some(entry),
            Err(e) if e.is_not_found() => {
                debug!("{} vanished before it was classified, skipping", child.display());
                None
            }
            Err(e) => {
                warn!("skipping {}: {}", child.display(), e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// proj/ with .git/, README.md and an empty src/
    fn sample_project() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let proj = dir.path().join("proj");
        fs::create_dir_all(proj.join(".git")).unwrap();
        fs::create_dir_all(proj.join("src")).unwrap();
        fs::write(proj.join("README.md"), "# proj").unwrap();
        (dir, proj)
    }

    fn recursive(config: WalkerConfig) -> TreeBuilder {
        TreeBuilder::new(WalkerConfig {
            recursive: true,
            ..config
        })
    }

    #[test]
    fn test_hidden_entries_excluded_by_default() {
        let (_dir, proj) = sample_project();
        let info = build_tree(&proj, false).unwrap();

        assert_eq!(info.name, "proj");
        assert_eq!(info.file_type, FileTypeTag::Directory);
        assert_eq!(
            info.children,
            Some(Children::Names(vec!["README.md".into(), "src".into()]))
        );
    }

    #[test]
    fn test_hidden_entries_included_and_sorted_without_dot() {
        let (_dir, proj) = sample_project();
        let info = build_tree(&proj, true).unwrap();

        assert_eq!(info.child_names(), vec![".git", "README.md", "src"]);
    }

    #[test]
    fn test_empty_directory_omits_children() {
        let (_dir, proj) = sample_project();
        let info = build_tree(&proj.join("src"), false).unwrap();

        assert_eq!(info.name, "src");
        assert!(info.children.is_none());
    }

    #[test]
    fn test_only_hidden_children_omits_children() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "").unwrap();

        assert!(build_tree(dir.path(), false).unwrap().children.is_none());
        assert_eq!(
            build_tree(dir.path(), true).unwrap().child_names(),
            vec![".env"]
        );
    }

    #[test]
    fn test_regular_file_is_leaf() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, "hi").unwrap();

        let info = build_tree(&notes, true).unwrap();
        assert_eq!(info, EntryInfo::leaf("notes.txt", FileTypeTag::Regular));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = build_tree(&dir.path().join("missing.txt"), false).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_build_all_isolates_failures() {
        let (dir, proj) = sample_project();
        let builder = TreeBuilder::new(WalkerConfig::default());
        let roots = vec![dir.path().join("missing.txt"), proj];

        let results = builder.build_all(&roots);
        assert_eq!(results.len(), 2);
        assert!(results[0].1.as_ref().unwrap_err().is_not_found());
        assert_eq!(results[1].1.as_ref().unwrap().name, "proj");
    }

    #[test]
    fn test_root_name() {
        let info = build_entry_info(Path::new("/")).unwrap();
        assert_eq!(info.name, "/");
        assert_eq!(info.file_type, FileTypeTag::Directory);
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_has_target_and_no_children() {
        use std::os::unix::fs::symlink;

        let (_dir, proj) = sample_project();
        let link = proj.join("link");
        symlink(proj.join("src"), &link).unwrap();

        let info = build_tree(&link, true).unwrap();
        assert_eq!(info.file_type, FileTypeTag::SymLink);
        assert!(info.children.is_none());
        let expected = fs::canonicalize(proj.join("src")).unwrap();
        assert_eq!(info.target.as_deref(), Some(&*expected.to_string_lossy()));

        let plain = build_entry_info(&proj.join("README.md")).unwrap();
        assert!(plain.target.is_none());
    }

    #[test]
    fn test_ignore_patterns() {
        let (_dir, proj) = sample_project();
        fs::write(proj.join("debug.log"), "").unwrap();
        let builder = TreeBuilder::new(WalkerConfig {
            ignore_patterns: vec!["*.log".into()],
            ..Default::default()
        });

        let info = builder.build(&proj).unwrap();
        assert_eq!(info.child_names(), vec!["README.md", "src"]);
    }

    #[test]
    fn test_recursive_nests_records() {
        let (_dir, proj) = sample_project();
        fs::write(proj.join("src").join("main.rs"), "fn main() {}").unwrap();
        let builder = recursive(WalkerConfig {
            parallel_workers: 1,
            ..Default::default()
        });

        let info = builder.build(&proj).unwrap();
        let Some(Children::Entries(entries)) = &info.children else {
            panic!("expected nested entries, got {:?}", info.children);
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], EntryInfo::leaf("README.md", FileTypeTag::Regular));
        assert_eq!(entries[1].name, "src");
        assert_eq!(entries[1].child_names(), vec!["main.rs"]);
    }

    #[test]
    fn test_recursive_respects_max_depth() {
        let (_dir, proj) = sample_project();
        fs::write(proj.join("src").join("main.rs"), "").unwrap();
        let builder = recursive(WalkerConfig {
            max_depth: Some(1),
            parallel_workers: 1,
            ..Default::default()
        });

        let info = builder.build(&proj).unwrap();
        let Some(Children::Entries(entries)) = &info.children else {
            panic!("expected nested entries");
        };
        let src = entries.iter().find(|e| e.name == "src").unwrap();
        assert!(src.children.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_recursive_does_not_follow_directory_symlinks() {
        use std::os::unix::fs::symlink;

        let (_dir, proj) = sample_project();
        symlink("..", proj.join("src").join("parent")).unwrap();
        let builder = recursive(WalkerConfig::default());

        let info = builder.build(&proj).unwrap();
        let Some(Children::Entries(entries)) = &info.children else {
            panic!("expected nested entries");
        };
        let src = entries.iter().find(|e| e.name == "src").unwrap();
        let Some(Children::Entries(src_entries)) = &src.children else {
            panic!("expected src entries");
        };
        assert_eq!(src_entries[0].file_type, FileTypeTag::SymLink);
        assert!(src_entries[0].children.is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = TempDir::new().unwrap();
        for d in ["b", "A", "c", ".hidden"] {
            let sub = dir.path().join(d);
            fs::create_dir(&sub).unwrap();
            for f in ["z.txt", "Y.txt", "x.txt"] {
                fs::write(sub.join(f), "").unwrap();
            }
        }

        let sequential = recursive(WalkerConfig {
            include_hidden: true,
            parallel_workers: 1,
            ..Default::default()
        })
        .build(dir.path())
        .unwrap();
        let parallel = recursive(WalkerConfig {
            include_hidden: true,
            parallel_workers: 4,
            ..Default::default()
        })
        .build(dir.path())
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.child_names(), vec!["A", "b", "c", ".hidden"]);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_non_utf8_name_survives_recursion() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xffname")), "").unwrap();
        fs::write(dir.path().join("ok.txt"), "").unwrap();

        let flat = build_tree(dir.path(), false).unwrap();
        let nested = recursive(WalkerConfig::default()).build(dir.path()).unwrap();

        assert_eq!(flat.child_names(), vec!["bad\u{FFFD}name", "ok.txt"]);
        assert_eq!(nested.child_names(), flat.child_names());
        let Some(Children::Entries(entries)) = &nested.children else {
            panic!("expected nested entries");
        };
        assert_eq!(entries[0].file_type, FileTypeTag::Regular);
    }

    #[test]
    fn test_vanished_child_is_skipped_and_siblings_kept() {
        let results = vec![
            (
                PathBuf::from("proj/README.md"),
                Ok(EntryInfo::leaf("README.md", FileTypeTag::Regular)),
            ),
            (
                PathBuf::from("proj/gone.tmp"),
                Err(TreeError::NotFound {
                    path: PathBuf::from("proj/gone.tmp"),
                }),
            ),
            (
                PathBuf::from("proj/locked"),
                Err(TreeError::Io {
                    path: PathBuf::from("proj/locked"),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                }),
            ),
            (
                PathBuf::from("proj/src"),
                Ok(EntryInfo::leaf("src", FileTypeTag::Directory)),
            ),
        ];

        let kept = keep_built_children(results);
        let names: Vec<_> = kept.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "src"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_recursive_skips_children_that_cannot_be_classified() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, proj) = sample_project();
        let listable = proj.join("listable");
        fs::create_dir(&listable).unwrap();
        fs::write(listable.join("inner.txt"), "").unwrap();
        // Readable but not searchable: names list fine, lstat on them fails
        fs::set_permissions(&listable, fs::Permissions::from_mode(0o400)).unwrap();

        let blocked = fs::symlink_metadata(listable.join("inner.txt")).is_err();
        let result = recursive(WalkerConfig {
            parallel_workers: 1,
            ..Default::default()
        })
        .build(&proj);

        fs::set_permissions(&listable, fs::Permissions::from_mode(0o755)).unwrap();

        let info = result.unwrap();
        assert_eq!(info.child_names(), vec!["listable", "README.md", "src"]);
        let Some(Children::Entries(entries)) = &info.children else {
            panic!("expected nested entries");
        };
        if blocked {
            assert!(entries[0].children.is_none());
        } else {
            assert_eq!(entries[0].child_names(), vec!["inner.txt"]);
        }
    }
}
