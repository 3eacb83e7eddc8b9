//! Executes script commands against one store.

use std::io::{self, Write};

use hakoniwa_vfs::{
    DirEntry, Metadata, MemoryFs, MkdirOptions, RmdirOptions, VfsError, VfsOps, WalkEntry,
    WriteOptions,
};

use crate::command::{Command, Owner};

/// Error from a single command.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Vfs(#[from] VfsError),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counts from one script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Commands executed (comments and blank lines excluded).
    pub commands: usize,
    /// Commands that failed to parse or returned an error.
    pub failed: usize,
}

/// A filesystem plus output settings.
#[derive(Debug)]
pub struct Shell {
    fs: MemoryFs,
    json: bool,
}

impl Shell {
    pub fn new(fs: MemoryFs, json: bool) -> Self {
        Self { fs, json }
    }

    /// The underlying store.
    pub fn fs(&self) -> &MemoryFs {
        &self.fs
    }

    /// Run one command and return what it prints (possibly nothing).
    pub fn execute(&mut self, command: &Command) -> Result<String, ShellError> {
        let output = match command {
            Command::Exists { path } => self.fs.exists(path).to_string(),
            Command::Stat { path } => self.render_metadata(&self.fs.stat(path)?)?,
            Command::Lstat { path } => self.render_metadata(&self.fs.lstat(path)?)?,
            Command::Cat { path } => {
                String::from_utf8_lossy(&self.fs.read_file(path)?).into_owned()
            }
            Command::Ls { path } => self.render_listing(&self.fs.readdir(path)?)?,
            Command::Readlink { path } => self.fs.readlink(path)?,
            Command::Tree { path } => self.render_tree(&self.fs.walk(path)?)?,
            Command::Write { mode, path, text } => {
                let opts = WriteOptions {
                    mode: *mode,
                    ..Default::default()
                };
                self.fs.write_file(path, text.join(" ").as_bytes(), opts)?;
                String::new()
            }
            Command::Mkdir {
                parents,
                mode,
                path,
            } => {
                let opts = MkdirOptions {
                    mode: *mode,
                    recursive: *parents,
                    ..Default::default()
                };
                self.fs.mkdir(path, opts)?;
                String::new()
            }
            Command::Symlink { target, path, .. } => {
                self.fs.symlink(target, path, WriteOptions::new())?;
                String::new()
            }
            Command::Rm { path } => {
                self.fs.unlink(path)?;
                String::new()
            }
            Command::Rmdir { recursive, path } => {
                self.fs.rmdir(
                    path,
                    RmdirOptions {
                        recursive: *recursive,
                    },
                )?;
                String::new()
            }
            Command::Chmod { mode, path } => {
                self.fs.chmod(path, *mode)?;
                String::new()
            }
            Command::Chown {
                owner: Owner { uid, gid },
                path,
            } => {
                self.fs.chown(path, *uid, *gid)?;
                String::new()
            }
            Command::Mv { from, to } => {
                self.fs.rename(from, to)?;
                String::new()
            }
        };
        Ok(output)
    }

    /// Run every line of `script`, writing command output and errors to
    /// `out`. With `strict`, stops at the first failure.
    pub fn run_script<W: Write>(
        &mut self,
        script: &str,
        strict: bool,
        out: &mut W,
    ) -> io::Result<ScriptSummary> {
        let mut summary = ScriptSummary::default();
        for (index, line) in script.lines().enumerate() {
            let lineno = index + 1;
            let command = match Command::parse_line(line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    summary.commands += 1;
                    summary.failed += 1;
                    let first = e.to_string();
                    let first = first.lines().next().unwrap_or_default();
                    writeln!(out, "line {lineno}: {first}")?;
                    if strict {
                        break;
                    }
                    continue;
                }
            };

            summary.commands += 1;
            match self.execute(&command) {
                Ok(output) if output.is_empty() => {}
                Ok(output) => writeln!(out, "{}", output.trim_end_matches('\n'))?,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(line = lineno, error = %e, "command failed");
                    writeln!(out, "line {lineno}: error: {e}")?;
                    if strict {
                        break;
                    }
                }
            }
        }
        Ok(summary)
    }

    fn render_metadata(&self, meta: &Metadata) -> Result<String, ShellError> {
        if self.json {
            return Ok(serde_json::to_string(meta)?);
        }
        Ok(describe(meta))
    }

    fn render_listing(&self, entries: &[DirEntry]) -> Result<String, ShellError> {
        if self.json {
            return Ok(serde_json::to_string(entries)?);
        }
        Ok(entries
            .iter()
            .map(|entry| format!("{}\t{}", entry.name, describe(&entry.metadata)))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn render_tree(&self, entries: &[WalkEntry]) -> Result<String, ShellError> {
        if self.json {
            return Ok(serde_json::to_string(entries)?);
        }
        Ok(entries
            .iter()
            .map(|entry| format!("{}\t{}", entry.path, describe(&entry.metadata)))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn describe(meta: &Metadata) -> String {
    format!(
        "{} {:o} {}:{} {}",
        meta.kind, meta.mode, meta.uid, meta.gid, meta.size
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(script: &str, strict: bool) -> (String, ScriptSummary) {
        let mut shell = Shell::new(MemoryFs::new(), false);
        let mut out = Vec::new();
        let summary = shell.run_script(script, strict, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_basic_script() {
        let (out, summary) = run(
            "# setup\n\
             mkdir -p /a/b/c\n\
             write /a/b/c/f.txt hello\n\
             cat /a/b/c/f.txt\n\
             ls /a/b/c\n\
             rmdir -r /a\n\
             exists /a\n",
            false,
        );
        assert_eq!(summary, ScriptSummary { commands: 6, failed: 0 });
        assert_eq!(out, "hello\nf.txt\tfile 644 0:0 5\nfalse\n");
    }

    #[test]
    fn test_failures_are_reported_and_counted() {
        let (out, summary) = run("write /x a\nmkdir /x\nexists /x\n", false);
        assert_eq!(summary, ScriptSummary { commands: 3, failed: 1 });
        assert_eq!(
            out,
            "line 2: error: /x: expected directory, found file\ntrue\n"
        );
    }

    #[test]
    fn test_strict_stops_early() {
        let (out, summary) = run("rm /nope\nwrite /f x\n", true);
        assert_eq!(summary, ScriptSummary { commands: 1, failed: 1 });
        assert_eq!(out, "line 1: error: not found: /nope\n");
    }

    #[test]
    fn test_parse_errors_are_failures() {
        let (out, summary) = run("bogus\nexists /\n", false);
        assert_eq!(summary.failed, 1);
        assert!(out.starts_with("line 1: "));
        assert!(out.ends_with("true\n"));
    }

    #[test]
    fn test_symlink_chmod_chown_mv() {
        let (out, summary) = run(
            "write /f data\n\
             ln -s /f /l\n\
             readlink /l\n\
             chmod 600 /f\n\
             chown 7:8 /f\n\
             mv /f /g\n\
             stat /g\n\
             tree\n",
            true,
        );
        assert_eq!(summary.failed, 0);
        assert_eq!(
            out,
            "/f\n\
             file 600 7:8 4\n\
             /\tdirectory 755 0:0 0\n\
             /g\tfile 600 7:8 4\n\
             /l\tsymlink 644 0:0 2\n"
        );
    }

    #[test]
    fn test_write_joins_words_with_single_spaces() {
        let (out, summary) = run("write /f  a   b\t c \ncat /f\n", true);
        assert_eq!(summary.failed, 0);
        assert_eq!(out, "a b c\n");
    }

    #[test]
    fn test_json_output() {
        let mut shell = Shell::new(MemoryFs::new(), true);
        shell
            .execute(&Command::Mkdir {
                parents: false,
                mode: None,
                path: "/d".into(),
            })
            .unwrap();
        let out = shell.execute(&Command::Ls { path: "/".into() }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "d");
        assert_eq!(value[0]["metadata"]["kind"], "directory");
        assert_eq!(value[0]["metadata"]["mode"], 0o755);
    }
}
