//! VFS operations trait.
//!
//! The full operation set of the store. Callers talk to a filesystem only
//! through this trait and the snapshot types it returns.

use super::path;
use super::types::{DirEntry, Metadata, MkdirOptions, RmdirOptions, WriteOptions};
use super::{VfsError, VfsResult};

/// Core VFS operations trait.
///
/// Paths are `/`-separated and always resolved from the root; a leading
/// slash is optional. Every method either completes or leaves the tree
/// untouched.
pub trait VfsOps {
    // ========================================================================
    // Reading
    // ========================================================================

    /// Get node metadata.
    fn stat(&self, path: &str) -> VfsResult<Metadata>;

    /// Read directory entries, ordered by name.
    fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>>;

    /// Read entire file contents.
    fn read_file(&self, path: &str) -> VfsResult<Vec<u8>>;

    /// Read symbolic link target, exactly as stored.
    fn readlink(&self, path: &str) -> VfsResult<String>;

    // ========================================================================
    // Writing
    // ========================================================================

    /// Create or overwrite a file.
    fn write_file(&mut self, path: &str, content: &[u8], opts: WriteOptions) -> VfsResult<()>;

    /// Create a directory, optionally with its missing parents.
    fn mkdir(&mut self, path: &str, opts: MkdirOptions) -> VfsResult<()>;

    /// Create a symbolic link at `path` pointing to `target`.
    ///
    /// The target is not validated or resolved.
    fn symlink(&mut self, target: &str, path: &str, opts: WriteOptions) -> VfsResult<()>;

    /// Remove a file or symlink.
    fn unlink(&mut self, path: &str) -> VfsResult<()>;

    /// Remove a directory.
    fn rmdir(&mut self, path: &str, opts: RmdirOptions) -> VfsResult<()>;

    /// Rename a file or directory.
    fn rename(&mut self, from: &str, to: &str) -> VfsResult<()>;

    /// Set permission bits.
    fn chmod(&mut self, path: &str, mode: u32) -> VfsResult<()>;

    /// Set owner and group.
    fn chown(&mut self, path: &str, uid: u32, gid: u32) -> VfsResult<()>;

    // ========================================================================
    // Convenience methods (default implementations)
    // ========================================================================

    /// Check if a path exists.
    fn exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }

    /// Get node metadata without following a final symlink.
    ///
    /// Symlinks are never followed by this store, so this is `stat`.
    fn lstat(&self, path: &str) -> VfsResult<Metadata> {
        self.stat(path)
    }

    /// Read a file as UTF-8 text.
    fn read_to_string(&self, path: &str) -> VfsResult<String> {
        let bytes = self.read_file(path)?;
        String::from_utf8(bytes)
            .map_err(|_| VfsError::InvalidUtf8(path::join(&path::normalize(path))))
    }
}
