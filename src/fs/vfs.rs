//! Virtual filesystem tree
//!
//! A single rooted tree of `FsNode`s addressed by path segments. Paths are
//! resolved lexically (`..` is clamped at the root) before any lookup, so the
//! tree never needs parent pointers.

use crate::fs::types::FsNode;
use crate::permissions::{can_access, Access};
use crate::users::User;

/// Why a permission-checked walk stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkError {
    NotFound,
    NotADirectory,
    PermissionDenied,
}

#[derive(Debug, Clone)]
pub struct Vfs {
    root: FsNode,
    // Bumped on every mutable access; compared to detect unsaved changes.
    revision: u64,
}

impl Vfs {
    pub fn new(root: FsNode) -> Self {
        Self { root, revision: 0 }
    }

    pub fn root(&self) -> &FsNode {
        &self.root
    }

    pub fn replace_root(&mut self, root: FsNode) {
        self.root = root;
        self.revision += 1;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Turn `input` into absolute segments relative to `cwd`.
    ///
    /// A leading `~` segment starts from `home`; `.` is ignored and `..` past
    /// the root stays at the root.
    pub fn resolve_path(input: &str, cwd: &[String], home: &[String]) -> Vec<String> {
        let mut segments: Vec<String> = if input.starts_with('/') {
            Vec::new()
        } else {
            cwd.to_vec()
        };

        for (i, part) in input.split('/').enumerate() {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                "~" if i == 0 => segments = home.to_vec(),
                name => segments.push(name.to_string()),
            }
        }
        segments
    }

    pub fn get_node(&self, segments: &[String]) -> Option<&FsNode> {
        let mut node = &self.root;
        for seg in segments {
            node = node.child(seg)?;
        }
        Some(node)
    }

    pub fn get_node_mut(&mut self, segments: &[String]) -> Option<&mut FsNode> {
        self.revision += 1;
        let mut node = &mut self.root;
        for seg in segments {
            node = node.children_mut()?.get_mut(seg)?;
        }
        Some(node)
    }

    /// The directory containing `segments`. The root has no parent.
    pub fn get_parent(&self, segments: &[String]) -> Option<&FsNode> {
        let (_, parent) = segments.split_last()?;
        self.get_node(parent)
    }

    pub fn exists(&self, segments: &[String]) -> bool {
        self.get_node(segments).is_some()
    }

    /// Walk to `segments` requiring search (execute) permission on every
    /// directory passed through.
    pub fn walk(&self, segments: &[String], user: &User) -> Result<&FsNode, WalkError> {
        let mut node = &self.root;
        for seg in segments {
            if !node.is_dir() {
                return Err(WalkError::NotADirectory);
            }
            if !can_access(node, user, Access::Execute) {
                return Err(WalkError::PermissionDenied);
            }
            node = node.child(seg).ok_or(WalkError::NotFound)?;
        }
        Ok(node)
    }

    /// Insert `node` as `name` inside the directory at `parent`, returning the
    /// node it replaced. `None` from the outer option means `parent` is not a
    /// directory.
    pub fn insert(&mut self, parent: &[String], name: &str, node: FsNode) -> Option<Option<FsNode>> {
        let dir = self.get_node_mut(parent)?;
        let children = dir.children_mut()?;
        let replaced = children.insert(name.to_string(), node);
        dir.touch();
        Some(replaced)
    }

    pub fn remove(&mut self, parent: &[String], name: &str) -> Option<FsNode> {
        let dir = self.get_node_mut(parent)?;
        let removed = dir.children_mut()?.remove(name)?;
        dir.touch();
        Some(removed)
    }

    /// Every path in the tree, depth first, starting with `/`.
    pub fn all_paths(&self) -> Vec<String> {
        fn visit(node: &FsNode, prefix: &str, out: &mut Vec<String>) {
            if let Some(children) = node.children() {
                for (name, child) in children {
                    let path = format!("{}/{}", prefix, name);
                    out.push(path.clone());
                    visit(child, &path, out);
                }
            }
        }
        let mut out = vec!["/".to_string()];
        visit(&self.root, "", &mut out);
        out
    }
}

/// `/`-joined absolute form of `segments`.
pub fn display_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

pub fn segments_of(path: &str) -> Vec<String> {
    path.split('/').filter(|s| !s.is_empty()).map(|s| s.to_string()).collect()
}
