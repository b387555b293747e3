//! Unix file type classification

use std::fmt;
use std::fs;
use std::path::Path;

use log::trace;
use serde::Serialize;

use crate::error::{Result, TreeError};

/// Unix file types, serialized as their human-readable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileTypeTag {
    #[serde(rename = "directory")]
    Directory,
    #[serde(rename = "regular file")]
    Regular,
    #[serde(rename = "symbolic link")]
    SymLink,
    #[serde(rename = "socket")]
    Socket,
    #[serde(rename = "named pipe")]
    Fifo,
    #[serde(rename = "block device file")]
    BlockDevice,
    #[serde(rename = "character special device file")]
    CharDevice,
    #[serde(rename = "unknown")]
    Unknown,
}

impl FileTypeTag {
    /// Every tag, in the order the mode-bit predicates are tested.
    pub const ALL: [FileTypeTag; 8] = [
        FileTypeTag::Directory,
        FileTypeTag::Regular,
        FileTypeTag::SymLink,
        FileTypeTag::Socket,
        FileTypeTag::Fifo,
        FileTypeTag::BlockDevice,
        FileTypeTag::CharDevice,
        FileTypeTag::Unknown,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FileTypeTag::Directory => "directory",
            FileTypeTag::Regular => "regular file",
            FileTypeTag::SymLink => "symbolic link",
            FileTypeTag::Socket => "socket",
            FileTypeTag::Fifo => "named pipe",
            FileTypeTag::BlockDevice => "block device file",
            FileTypeTag::CharDevice => "character special device file",
            FileTypeTag::Unknown => "unknown",
        }
    }

    /// Test a single predicate against a file type. `Unknown` never matches.
    fn matches(self, file_type: &fs::FileType) -> bool {
        #[cfg(unix)]
        use std::os::unix::fs::FileTypeExt;

        match self {
            FileTypeTag::Directory => file_type.is_dir(),
            FileTypeTag::Regular => file_type.is_file(),
            FileTypeTag::SymLink => file_type.is_symlink(),
            #[cfg(unix)]
            FileTypeTag::Socket => file_type.is_socket(),
            #[cfg(unix)]
            FileTypeTag::Fifo => file_type.is_fifo(),
            #[cfg(unix)]
            FileTypeTag::BlockDevice => file_type.is_block_device(),
            #[cfg(unix)]
            FileTypeTag::CharDevice => file_type.is_char_device(),
            #[cfg(not(unix))]
            FileTypeTag::Socket
            | FileTypeTag::Fifo
            | FileTypeTag::BlockDevice
            | FileTypeTag::CharDevice => false,
            FileTypeTag::Unknown => false,
        }
    }

    /// Map a file type to the first tag whose predicate holds.
    pub fn from_file_type(file_type: fs::FileType) -> Self {
        Self::ALL
            .into_iter()
            .find(|tag| tag.matches(&file_type))
            .unwrap_or(FileTypeTag::Unknown)
    }
}

impl fmt::Display for FileTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify the entry at `path` without following symlinks.
pub fn classify(path: &Path) -> Result<FileTypeTag> {
    let metadata = fs::symlink_metadata(path).map_err(|e| TreeError::from_io(path, e))?;
    let tag = FileTypeTag::from_file_type(metadata.file_type());
    trace!("classified {} as {}", path.display(), tag);
    Ok(tag)
}
