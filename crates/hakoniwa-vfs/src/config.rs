//! Store configuration: default ownership and modes for new nodes.
//!
//! Loaded from RON, e.g.
//!
//! ```ron
//! (
//!     uid: 1000,
//!     gid: 1000,
//!     file_mode: 0o600,
//! )
//! ```
//!
//! Missing fields take the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Defaults applied when an operation omits uid/gid/mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Owner of new nodes (and of the root).
    pub uid: u32,
    /// Group of new nodes (and of the root).
    pub gid: u32,
    /// Mode for new files.
    pub file_mode: u32,
    /// Mode for new directories, including the root.
    pub dir_mode: u32,
    /// Mode for new symlinks.
    pub symlink_mode: u32,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            uid: 0,
            gid: 0,
            file_mode: 0o644,
            dir_mode: 0o755,
            symlink_mode: 0o644,
        }
    }
}

impl FsConfig {
    /// Parse a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded fs config");
        Ok(config)
    }
}

/// Error type for config loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}
