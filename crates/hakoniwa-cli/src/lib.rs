//! Script runner for the hakoniwa in-memory filesystem.
//!
//! Each script line is one command (`mkdir -p /a/b`, `write /a/f hello`,
//! `ls /a`, ...) run against a single [`hakoniwa_vfs::MemoryFs`]. Failures
//! are reported per line; the script carries on unless run in strict mode.

pub mod command;
pub mod shell;

pub use command::{Command, Owner};
pub use shell::{ScriptSummary, Shell, ShellError};
