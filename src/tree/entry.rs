//! Serializable entry records

use serde::Serialize;

use crate::file_type::FileTypeTag;

/// Children attached to a directory record.
///
/// The default listing holds names only; recursive builds nest full records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Children {
    Names(Vec<String>),
    Entries(Vec<EntryInfo>),
}

impl Children {
    pub fn len(&self) -> usize {
        match self {
            Children::Names(names) => names.len(),
            Children::Entries(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Child names in output order, whichever form the children take.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Children::Names(names) => names.iter().map(String::as_str).collect(),
            Children::Entries(entries) => entries.iter().map(|e| e.name.as_str()).collect(),
        }
    }
}

/// Record for one filesystem entry. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    #[serde(rename = "type")]
    pub file_type: FileTypeTag,
    pub name: String,
    /// Resolved absolute target, only for symbolic links
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Only for directories with at least one listed child
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
}

impl EntryInfo {
    pub fn leaf(name: impl Into<String>, file_type: FileTypeTag) -> Self {
        Self {
            file_type,
            name: name.into(),
            target: None,
            children: None,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Attach children, dropping an empty list entirely.
    pub fn with_children(mut self, children: Option<Children>) -> Self {
        self.children = children.filter(|c| !c.is_empty());
        self
    }

    pub fn is_dir(&self) -> bool {
        self.file_type == FileTypeTag::Directory
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.children.as_ref().map(Children::names).unwrap_or_default()
    }
}
