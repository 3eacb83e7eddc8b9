//! In-memory hierarchical virtual filesystem.
//!
//! A tree of files, directories and symbolic links addressed by
//! `/`-separated paths. Key components:
//!
//! - [`VfsOps`] - The operation set (stat, read, write, mkdir, ...)
//! - [`MemoryFs`] - The store: one owned tree per instance
//! - [`FsConfig`] - Default ownership and modes, loadable from RON
//! - [`Clock`] - Time source for node timestamps
//!
//! ## Design Decisions
//!
//! - **Parent owns child**: directories hold their children by value in a
//!   `BTreeMap`. No node is reachable from two places and there are no
//!   reference counts.
//! - **Errors are values**: every operation returns [`VfsResult`]; the
//!   store validates a path before mutating anything.
//! - **No symlink traversal**: a symlink is an opaque leaf. `stat` and
//!   `lstat` agree, and a symlink in the middle of a path ends resolution.
//! - **`..` is a name**: paths drop empty and `.` segments only.
//!
//! ```
//! use hakoniwa_vfs::{MemoryFs, MkdirOptions, VfsOps, WriteOptions};
//!
//! let mut fs = MemoryFs::new();
//! fs.mkdir("/a/b", MkdirOptions::recursive())?;
//! fs.write_file("/a/b/hello.txt", b"hello", WriteOptions::new())?;
//! assert_eq!(fs.read_to_string("/a/b/hello.txt")?, "hello");
//! # Ok::<(), hakoniwa_vfs::VfsError>(())
//! ```

mod clock;
mod config;
mod error;
mod memory;
mod node;
mod ops;
pub mod path;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, FsConfig};
pub use error::{VfsError, VfsResult};
pub use memory::MemoryFs;
pub use ops::VfsOps;
pub use types::{
    DirEntry, FileType, Metadata, MkdirOptions, RmdirOptions, WalkEntry, WriteOptions,
};
