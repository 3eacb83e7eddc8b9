//! In-memory filesystem store.
//!
//! A single owned tree rooted at a directory. All data is ephemeral.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::time::SystemTime;

use crate::clock::{Clock, SystemClock};
use crate::config::FsConfig;
use crate::error::{VfsError, VfsResult};
use crate::node::{Node, NodeKind};
use crate::ops::VfsOps;
use crate::path;
use crate::types::{
    DirEntry, FileType, Metadata, MkdirOptions, RmdirOptions, WalkEntry, WriteOptions,
};

/// In-memory filesystem.
///
/// Each instance is independent. Mutations take `&mut self`; a host that
/// shares one store across threads must wrap it in a single lock.
pub struct MemoryFs {
    root: Node,
    config: FsConfig,
    clock: Box<dyn Clock>,
}

impl fmt::Debug for MemoryFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryFs")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("nodes", &self.node_count())
            .finish()
    }
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create an empty filesystem with default config.
    pub fn new() -> Self {
        Self::with_config(FsConfig::default())
    }

    /// Create an empty filesystem whose root and new nodes use `config`.
    pub fn with_config(config: FsConfig) -> Self {
        let clock: Box<dyn Clock> = Box::new(SystemClock);
        let root = Self::make_root(&config, clock.as_ref());
        Self {
            root,
            config,
            clock,
        }
    }

    /// Replace the time source. The root is re-stamped from the new clock.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        let now = clock.now();
        self.root.metadata.created = now;
        self.root.metadata.modified = now;
        self.clock = Box::new(clock);
        self
    }

    fn make_root(config: &FsConfig, clock: &dyn Clock) -> Node {
        let meta = Metadata::new(
            FileType::Directory,
            config.uid,
            config.gid,
            config.dir_mode,
            clock.now(),
        );
        Node::directory("", meta)
    }

    /// Active configuration.
    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        1 + self.root.descendant_count()
    }

    /// Depth-first, pre-order listing of the subtree at `path`, the node
    /// itself first. Siblings come in name order.
    pub fn walk(&self, path: &str) -> VfsResult<Vec<WalkEntry>> {
        let segments = path::normalize(path);
        let start = self.lookup(&segments)?;

        let mut out = Vec::new();
        let mut stack = vec![(path::join(&segments), start)];
        while let Some((node_path, node)) = stack.pop() {
            if let Some(children) = node.children() {
                for child in children.values().rev() {
                    stack.push((child_path(&node_path, &child.name), child));
                }
            }
            out.push(WalkEntry {
                path: node_path,
                metadata: node.metadata.clone(),
            });
        }
        Ok(out)
    }

    // ========================================================================
    // Path resolution
    // ========================================================================

    fn lookup(&self, segments: &[&str]) -> VfsResult<&Node> {
        let mut node = &self.root;
        for (i, segment) in segments.iter().enumerate() {
            let found = node.file_type();
            let children = node.children().ok_or_else(|| {
                VfsError::type_mismatch(path::join(&segments[..i]), FileType::Directory, found)
            })?;
            node = children
                .get(*segment)
                .ok_or_else(|| VfsError::not_found(path::join(&segments[..=i])))?;
        }
        Ok(node)
    }

    fn lookup_mut(&mut self, segments: &[&str]) -> VfsResult<&mut Node> {
        let mut node = &mut self.root;
        for (i, segment) in segments.iter().enumerate() {
            let found = node.file_type();
            let children = node.children_mut().ok_or_else(|| {
                VfsError::type_mismatch(path::join(&segments[..i]), FileType::Directory, found)
            })?;
            node = children
                .get_mut(*segment)
                .ok_or_else(|| VfsError::not_found(path::join(&segments[..=i])))?;
        }
        Ok(node)
    }

    /// Resolve everything but the last segment. Yields the parent's
    /// children and the basename.
    fn parent_mut<'p>(
        &mut self,
        segments: &[&'p str],
    ) -> VfsResult<(&mut BTreeMap<String, Node>, &'p str)> {
        let (name, parent) = segments
            .split_last()
            .ok_or_else(|| VfsError::invalid_path("/"))?;
        let dir = self.lookup_mut(parent).inspect_err(trace_miss)?;
        let found = dir.file_type();
        let children = dir.children_mut().ok_or_else(|| {
            VfsError::type_mismatch(path::join(parent), FileType::Directory, found)
        })?;
        Ok((children, *name))
    }

    fn node<'a, 'p>(&'a self, path: &'p str) -> VfsResult<(&'a Node, Vec<&'p str>)> {
        let segments = path::normalize(path);
        let node = self.lookup(&segments).inspect_err(trace_miss)?;
        Ok((node, segments))
    }

    fn new_metadata(
        &self,
        kind: FileType,
        mode: u32,
        opts: &WriteOptions,
        now: SystemTime,
    ) -> Metadata {
        let mut meta = Metadata::new(kind, self.config.uid, self.config.gid, mode, now);
        apply_options(&mut meta, opts);
        meta
    }
}

fn apply_options(meta: &mut Metadata, opts: &WriteOptions) {
    if let Some(uid) = opts.uid {
        meta.uid = uid;
    }
    if let Some(gid) = opts.gid {
        meta.gid = gid;
    }
    if let Some(mode) = opts.mode {
        meta.mode = mode;
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn trace_miss(err: &VfsError) {
    tracing::trace!(error = %err, "resolve failed");
}

impl VfsOps for MemoryFs {
    fn stat(&self, path: &str) -> VfsResult<Metadata> {
        let (node, _) = self.node(path)?;
        Ok(node.metadata.clone())
    }

    fn readdir(&self, path: &str) -> VfsResult<Vec<DirEntry>> {
        let (node, segments) = self.node(path)?;
        let children = node.children().ok_or_else(|| {
            VfsError::type_mismatch(path::join(&segments), FileType::Directory, node.file_type())
        })?;
        Ok(children
            .values()
            .map(|child| DirEntry {
                name: child.name.clone(),
                metadata: child.metadata.clone(),
            })
            .collect())
    }

    fn read_file(&self, path: &str) -> VfsResult<Vec<u8>> {
        let (node, segments) = self.node(path)?;
        match &node.kind {
            NodeKind::File { content } => Ok(content.clone()),
            _ => Err(VfsError::type_mismatch(
                path::join(&segments),
                FileType::File,
                node.file_type(),
            )),
        }
    }

    fn readlink(&self, path: &str) -> VfsResult<String> {
        let (node, segments) = self.node(path)?;
        match &node.kind {
            NodeKind::Symlink { target } => Ok(target.clone()),
            _ => Err(VfsError::type_mismatch(
                path::join(&segments),
                FileType::Symlink,
                node.file_type(),
            )),
        }
    }

    fn write_file(&mut self, path: &str, content: &[u8], opts: WriteOptions) -> VfsResult<()> {
        let segments = path::normalize(path);
        let shown = path::join(&segments);
        let now = self.clock.now();
        let fresh = self.new_metadata(FileType::File, self.config.file_mode, &opts, now);

        let (children, name) = self.parent_mut(&segments)?;
        let node = match children.entry(name.to_string()) {
            Entry::Occupied(entry) => {
                let node = entry.into_mut();
                if !node.file_type().is_file() {
                    return Err(VfsError::type_mismatch(
                        shown,
                        FileType::File,
                        node.file_type(),
                    ));
                }
                apply_options(&mut node.metadata, &opts);
                node
            }
            Entry::Vacant(entry) => entry.insert(Node::file(name, fresh)),
        };
        node.set_content(content, now);

        tracing::debug!(path = %shown, size = content.len(), "write_file");
        Ok(())
    }

    fn mkdir(&mut self, path: &str, opts: MkdirOptions) -> VfsResult<()> {
        let segments = path::normalize(path);
        let now = self.clock.now();
        let uid = opts.uid.unwrap_or(self.config.uid);
        let gid = opts.gid.unwrap_or(self.config.gid);
        let mode = opts.mode.unwrap_or(self.config.dir_mode);
        let last = segments.len().saturating_sub(1);

        let mut created = 0usize;
        let mut node = &mut self.root;
        for (i, segment) in segments.iter().enumerate() {
            let found = node.file_type();
            let children = node.children_mut().ok_or_else(|| {
                VfsError::type_mismatch(path::join(&segments[..i]), FileType::Directory, found)
            })?;
            let child = match children.entry(segment.to_string()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    if !opts.recursive && i != last {
                        return Err(VfsError::not_found(path::join(&segments[..=i])));
                    }
                    created += 1;
                    let meta = Metadata::new(FileType::Directory, uid, gid, mode, now);
                    entry.insert(Node::directory(*segment, meta))
                }
            };
            if !child.is_dir() {
                return Err(VfsError::type_mismatch(
                    path::join(&segments[..=i]),
                    FileType::Directory,
                    child.file_type(),
                ));
            }
            node = child;
        }

        tracing::debug!(path = %path::join(&segments), created, "mkdir");
        Ok(())
    }

    fn symlink(&mut self, target: &str, path: &str, opts: WriteOptions) -> VfsResult<()> {
        let segments = path::normalize(path);
        let shown = path::join(&segments);
        let now = self.clock.now();
        let meta = self.new_metadata(FileType::Symlink, self.config.symlink_mode, &opts, now);

        let (children, name) = self.parent_mut(&segments)?;
        match children.entry(name.to_string()) {
            Entry::Occupied(_) => return Err(VfsError::already_exists(shown)),
            Entry::Vacant(entry) => {
                entry.insert(Node::symlink(name, target.to_string(), meta));
            }
        }

        tracing::debug!(path = %shown, target, "symlink");
        Ok(())
    }

    fn unlink(&mut self, path: &str) -> VfsResult<()> {
        let segments = path::normalize(path);
        let shown = path::join(&segments);

        let (children, name) = self.parent_mut(&segments)?;
        match children.get(name) {
            None => return Err(VfsError::not_found(shown)),
            Some(node) if node.is_dir() => {
                return Err(VfsError::type_mismatch(
                    shown,
                    FileType::File,
                    FileType::Directory,
                ));
            }
            Some(_) => {}
        }
        children.remove(name);

        tracing::debug!(path = %shown, "unlink");
        Ok(())
    }

    fn rmdir(&mut self, path: &str, opts: RmdirOptions) -> VfsResult<()> {
        let segments = path::normalize(path);
        let shown = path::join(&segments);

        let (children, name) = self.parent_mut(&segments)?;
        let node = children
            .get(name)
            .ok_or_else(|| VfsError::not_found(shown.clone()))?;
        let Some(entries) = node.children() else {
            return Err(VfsError::type_mismatch(
                shown,
                FileType::Directory,
                node.file_type(),
            ));
        };
        if !entries.is_empty() && !opts.recursive {
            return Err(VfsError::directory_not_empty(shown));
        }
        let removed = node.descendant_count();

        // Dropping the detached subtree tears it down with a work stack.
        children.remove(name);

        tracing::debug!(path = %shown, removed, "rmdir");
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> VfsResult<()> {
        let from_segments = path::normalize(from);
        let to_segments = path::normalize(to);
        let from_display = path::join(&from_segments);
        let to_display = path::join(&to_segments);

        if from_segments.is_empty() {
            return Err(VfsError::invalid_path(from_display));
        }
        self.lookup(&from_segments)?;
        if path::is_within(&from_segments, &to_segments) {
            if from_segments == to_segments {
                return Ok(());
            }
            return Err(VfsError::InvalidMove {
                from: from_display,
                to: to_display,
            });
        }
        let Some((to_name, to_parent)) = to_segments.split_last() else {
            return Err(VfsError::invalid_path(to_display));
        };
        let parent = self.lookup(to_parent)?;
        let siblings = parent.children().ok_or_else(|| {
            VfsError::type_mismatch(path::join(to_parent), FileType::Directory, parent.file_type())
        })?;
        if siblings.contains_key(*to_name) {
            return Err(VfsError::already_exists(to_display));
        }

        let (children, name) = self.parent_mut(&from_segments)?;
        let mut node = children
            .remove(name)
            .ok_or_else(|| VfsError::not_found(from_display.clone()))?;
        node.name = to_name.to_string();
        let (children, name) = self.parent_mut(&to_segments)?;
        children.insert(name.to_string(), node);

        tracing::debug!(from = %from_display, to = %to_display, "rename");
        Ok(())
    }

    fn chmod(&mut self, path: &str, mode: u32) -> VfsResult<()> {
        let segments = path::normalize(path);
        let now = self.clock.now();
        let node = self.lookup_mut(&segments).inspect_err(trace_miss)?;
        node.metadata.mode = mode;
        node.touch(now);

        tracing::debug!(path = %path::join(&segments), mode = %format!("{mode:o}"), "chmod");
        Ok(())
    }

    fn chown(&mut self, path: &str, uid: u32, gid: u32) -> VfsResult<()> {
        let segments = path::normalize(path);
        let now = self.clock.now();
        let node = self.lookup_mut(&segments).inspect_err(trace_miss)?;
        node.metadata.uid = uid;
        node.metadata.gid = gid;
        node.touch(now);

        tracing::debug!(path = %path::join(&segments), uid, gid, "chown");
        Ok(())
    }
}
