//! Script commands.
//!
//! One command per line, words split on whitespace, parsed with clap so
//! each command gets usage errors for free.

use clap::{Parser, Subcommand};

/// Owner pair parsed from `UID:GID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub uid: u32,
    pub gid: u32,
}

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

/// A single script command.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print whether a path exists
    Exists { path: String },

    /// Print node metadata
    Stat { path: String },

    /// Print node metadata (symlinks are never followed, same as stat)
    Lstat { path: String },

    /// Print file contents
    Cat { path: String },

    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Print a symlink target
    Readlink { path: String },

    /// List a subtree depth-first
    Tree {
        #[arg(default_value = "/")]
        path: String,
    },

    /// Create or overwrite a file; the remaining words, joined by single
    /// spaces, are the content
    Write {
        /// Mode in octal
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<u32>,
        path: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Create a directory
    Mkdir {
        /// Create missing parents
        #[arg(short = 'p')]
        parents: bool,
        /// Mode in octal
        #[arg(short, long, value_parser = parse_mode)]
        mode: Option<u32>,
        path: String,
    },

    /// Create a symlink at PATH pointing to TARGET
    #[command(alias = "ln")]
    Symlink {
        /// Accepted for `ln -s` compatibility
        #[arg(short = 's', hide = true)]
        symbolic: bool,
        target: String,
        path: String,
    },

    /// Remove a file or symlink
    Rm { path: String },

    /// Remove a directory
    Rmdir {
        /// Remove everything beneath it too
        #[arg(short = 'r')]
        recursive: bool,
        path: String,
    },

    /// Set permission bits (octal)
    Chmod {
        #[arg(value_parser = parse_mode)]
        mode: u32,
        path: String,
    },

    /// Set owner and group as UID:GID
    Chown {
        #[arg(value_parser = parse_owner)]
        owner: Owner,
        path: String,
    },

    /// Move a node to a new path
    Mv { from: String, to: String },
}

impl Command {
    /// Parse one script line. Blank lines and `#` comments yield `None`.
    pub fn parse_line(line: &str) -> Result<Option<Self>, clap::Error> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        Line::try_parse_from(line.split_whitespace()).map(|parsed| Some(parsed.command))
    }
}

fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode {s:?}: {e}"))
}

fn parse_owner(s: &str) -> Result<Owner, String> {
    let (uid, gid) = s
        .split_once(':')
        .ok_or_else(|| format!("expected UID:GID, got {s:?}"))?;
    let uid = uid.parse().map_err(|e| format!("invalid uid {uid:?}: {e}"))?;
    let gid = gid.parse().map_err(|e| format!("invalid gid {gid:?}: {e}"))?;
    Ok(Owner { uid, gid })
}
