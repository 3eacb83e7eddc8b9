//! Core VFS types.
//!
//! Everything here is an owned snapshot: values handed out by queries
//! never alias the tree.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use strum::{Display, EnumString};

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Symbolic link.
    Symlink,
}

impl FileType {
    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileType::File)
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileType::Directory)
    }

    /// Returns true if this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        matches!(self, FileType::Symlink)
    }
}

/// Node metadata.
///
/// `mode` is stored verbatim and never checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Node type.
    pub kind: FileType,
    /// Owning user ID.
    pub uid: u32,
    /// Owning group ID.
    pub gid: u32,
    /// Permission bits (e.g., 0o644).
    pub mode: u32,
    /// Size in bytes: content length for files, target length for
    /// symlinks, zero for directories.
    pub size: u64,
    /// Creation time. Never changes after the node is created.
    pub created: SystemTime,
    /// Last modification time.
    pub modified: SystemTime,
}

impl Metadata {
    pub(crate) fn new(kind: FileType, uid: u32, gid: u32, mode: u32, now: SystemTime) -> Self {
        Self {
            kind,
            uid,
            gid,
            mode,
            size: 0,
            created: now,
            modified: now,
        }
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Returns true if this is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind.is_symlink()
    }
}

/// Directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// Entry name (not full path).
    pub name: String,
    /// Entry metadata.
    pub metadata: Metadata,
}

impl DirEntry {
    /// Entry type.
    pub fn kind(&self) -> FileType {
        self.metadata.kind
    }
}

/// One node visited by [`crate::MemoryFs::walk`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkEntry {
    /// Absolute, normalized path.
    pub path: String,
    /// Entry metadata.
    pub metadata: Metadata,
}

/// Ownership and mode for `write_file` and `symlink`.
///
/// Omitted fields keep the existing value, or the configured default for a
/// new node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOptions {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub mode: Option<u32>,
}

impl WriteOptions {
    /// Create a new empty WriteOptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the owner.
    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = Some(uid);
        self.gid = Some(gid);
        self
    }

    /// Set permissions.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Options for `mkdir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MkdirOptions {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub mode: Option<u32>,
    /// Create missing intermediate directories.
    pub recursive: bool,
}

impl MkdirOptions {
    /// Create a new empty MkdirOptions (non-recursive).
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for `mkdir -p`.
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            ..Default::default()
        }
    }

    /// Set the owner.
    pub fn with_owner(mut self, uid: u32, gid: u32) -> Self {
        self.uid = Some(uid);
        self.gid = Some(gid);
        self
    }

    /// Set permissions.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Options for `rmdir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RmdirOptions {
    /// Remove the whole subtree.
    pub recursive: bool,
}

impl RmdirOptions {
    /// Options for `rm -r`.
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_file_type() {
        assert!(FileType::File.is_file());
        assert!(!FileType::File.is_dir());
        assert!(FileType::Directory.is_dir());
        assert!(FileType::Symlink.is_symlink());
    }

    #[test]
    fn test_file_type_strings() {
        assert_eq!(FileType::Directory.to_string(), "directory");
        assert_eq!(FileType::from_str("symlink").unwrap(), FileType::Symlink);
        assert!(FileType::from_str("socket").is_err());
    }

    #[test]
    fn test_write_options_builder() {
        let opts = WriteOptions::new().with_owner(1000, 100).with_mode(0o600);
        assert_eq!(opts.uid, Some(1000));
        assert_eq!(opts.gid, Some(100));
        assert_eq!(opts.mode, Some(0o600));
    }

    #[test]
    fn test_mkdir_options() {
        let opts = MkdirOptions::recursive().with_mode(0o700);
        assert!(opts.recursive);
        assert_eq!(opts.mode, Some(0o700));
        assert!(opts.uid.is_none());
        assert!(!MkdirOptions::new().recursive);
    }
}
