//! Tree nodes.
//!
//! Each directory owns its children outright. Nothing is shared, so the
//! tree stays acyclic as long as `rename` refuses to move a directory
//! beneath itself.

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::types::{FileType, Metadata};

/// Payload of a node. The variant never changes after creation.
#[derive(Debug)]
pub(crate) enum NodeKind {
    File { content: Vec<u8> },
    Directory { children: BTreeMap<String, Node> },
    Symlink { target: String },
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) metadata: Metadata,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn file(name: impl Into<String>, metadata: Metadata) -> Self {
        debug_assert!(metadata.kind.is_file());
        Self {
            name: name.into(),
            metadata,
            kind: NodeKind::File {
                content: Vec::new(),
            },
        }
    }

    pub(crate) fn directory(name: impl Into<String>, metadata: Metadata) -> Self {
        debug_assert!(metadata.kind.is_dir());
        Self {
            name: name.into(),
            metadata,
            kind: NodeKind::Directory {
                children: BTreeMap::new(),
            },
        }
    }

    pub(crate) fn symlink(name: impl Into<String>, target: String, mut metadata: Metadata) -> Self {
        debug_assert!(metadata.kind.is_symlink());
        metadata.size = target.len() as u64;
        Self {
            name: name.into(),
            metadata,
            kind: NodeKind::Symlink { target },
        }
    }

    pub(crate) fn file_type(&self) -> FileType {
        self.metadata.kind
    }

    pub(crate) fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory { .. })
    }

    pub(crate) fn children(&self) -> Option<&BTreeMap<String, Node>> {
        match &self.kind {
            NodeKind::Directory { children } => Some(children),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut BTreeMap<String, Node>> {
        match &mut self.kind {
            NodeKind::Directory { children } => Some(children),
            _ => None,
        }
    }

    /// Replace file content and keep `size` in step. No-op for non-files.
    pub(crate) fn set_content(&mut self, bytes: &[u8], now: SystemTime) {
        if let NodeKind::File { content } = &mut self.kind {
            content.clear();
            content.extend_from_slice(bytes);
            self.metadata.size = content.len() as u64;
            self.metadata.modified = now;
        }
    }

    pub(crate) fn touch(&mut self, now: SystemTime) {
        self.metadata.modified = now;
    }

    /// Number of nodes below this one.
    pub(crate) fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Node> = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(children) = node.children() {
                count += children.len();
                stack.extend(children.values());
            }
        }
        count
    }

    fn take_children(&mut self) -> Vec<Node> {
        match &mut self.kind {
            NodeKind::Directory { children } => {
                std::mem::take(children).into_values().collect()
            }
            _ => Vec::new(),
        }
    }
}

// Tear down subtrees with a work stack. The derived drop would recurse once
// per level and overflow on deep chains.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = self.take_children();
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.take_children());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(kind: FileType) -> Metadata {
        Metadata::new(kind, 0, 0, 0o644, SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn test_set_content_tracks_size() {
        let mut node = Node::file("f", meta(FileType::File));
        node.set_content(b"hello", SystemTime::now());
        assert_eq!(node.metadata.size, 5);
        node.set_content(b"", SystemTime::now());
        assert_eq!(node.metadata.size, 0);
    }

    #[test]
    fn test_symlink_size_is_target_len() {
        let node = Node::symlink("l", "../target".to_string(), meta(FileType::Symlink));
        assert_eq!(node.metadata.size, 9);
        assert!(node.children().is_none());
    }

    #[test]
    fn test_descendant_count() {
        let mut root = Node::directory("", meta(FileType::Directory));
        let mut sub = Node::directory("sub", meta(FileType::Directory));
        sub.children_mut()
            .unwrap()
            .insert("f".into(), Node::file("f", meta(FileType::File)));
        root.children_mut().unwrap().insert("sub".into(), sub);
        root.children_mut()
            .unwrap()
            .insert("g".into(), Node::file("g", meta(FileType::File)));
        assert_eq!(root.descendant_count(), 3);
    }

    #[test]
    fn test_deep_chain_drops_without_overflow() {
        let mut top = Node::directory("d", meta(FileType::Directory));
        for _ in 0..100_000 {
            let mut parent = Node::directory("d", meta(FileType::Directory));
            parent.children_mut().unwrap().insert("d".into(), top);
            top = parent;
        }
        assert_eq!(top.descendant_count(), 100_000);
        drop(top);
    }
}
