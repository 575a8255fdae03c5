use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Size reported for every directory node.
pub const DIRECTORY_SIZE: u64 = 4096;

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
}

/// A file or directory. The node's name lives in its parent's `children` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsNode {
    pub owner: String,
    pub group: String,
    /// Low 12 bits of `st_mode`: special bits then owner/group/other rwx.
    pub permissions: u32,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub modified: i64,
    #[serde(flatten)]
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeData {
    File {
        #[serde(default)]
        content: String,
    },
    Directory {
        #[serde(default)]
        children: BTreeMap<String, FsNode>,
    },
}

impl FsNode {
    pub fn file(owner: &str, group: &str, permissions: u32, content: &str) -> Self {
        let now = now_millis();
        Self {
            owner: owner.to_string(),
            group: group.to_string(),
            permissions: permissions & 0o7777,
            size: content.len() as u64,
            created: now,
            modified: now,
            data: NodeData::File { content: content.to_string() },
        }
    }

    pub fn directory(owner: &str, group: &str, permissions: u32) -> Self {
        let now = now_millis();
        Self {
            owner: owner.to_string(),
            group: group.to_string(),
            permissions: permissions & 0o7777,
            size: DIRECTORY_SIZE,
            created: now,
            modified: now,
            data: NodeData::Directory { children: BTreeMap::new() },
        }
    }

    /// Add a child, builder style. Used to assemble seed trees.
    pub fn with_child(mut self, name: &str, child: FsNode) -> Self {
        if let NodeData::Directory { children } = &mut self.data {
            children.insert(name.to_string(), child);
        }
        self
    }

    pub fn kind(&self) -> FileKind {
        match self.data {
            NodeData::File { .. } => FileKind::File,
            NodeData::Directory { .. } => FileKind::Directory,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.data, NodeData::Directory { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.data, NodeData::File { .. })
    }

    pub fn children(&self) -> Option<&BTreeMap<String, FsNode>> {
        match &self.data {
            NodeData::Directory { children } => Some(children),
            NodeData::File { .. } => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut BTreeMap<String, FsNode>> {
        match &mut self.data {
            NodeData::Directory { children } => Some(children),
            NodeData::File { .. } => None,
        }
    }

    pub fn child(&self, name: &str) -> Option<&FsNode> {
        self.children().and_then(|c| c.get(name))
    }

    pub fn content(&self) -> Option<&str> {
        match &self.data {
            NodeData::File { content } => Some(content),
            NodeData::Directory { .. } => None,
        }
    }

    /// Empty file or directory without children.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            NodeData::File { content } => content.is_empty(),
            NodeData::Directory { children } => children.is_empty(),
        }
    }

    pub fn set_content(&mut self, new_content: String) {
        if let NodeData::File { content } = &mut self.data {
            self.size = new_content.len() as u64;
            *content = new_content;
            self.modified = now_millis();
        }
    }

    pub fn append_content(&mut self, extra: &str) {
        if let NodeData::File { content } = &mut self.data {
            content.push_str(extra);
            self.size = content.len() as u64;
            self.modified = now_millis();
        }
    }

    pub fn touch(&mut self) {
        self.modified = now_millis();
    }

    pub fn set_permissions(&mut self, mode: u32) {
        self.permissions = mode & 0o7777;
        self.touch();
    }

    /// Re-establish the invariants a hand-edited snapshot may break: modes
    /// fit in 12 bits, file sizes match content, directories report
    /// `DIRECTORY_SIZE`.
    pub fn normalize(&mut self) {
        self.permissions &= 0o7777;
        match &mut self.data {
            NodeData::File { content } => self.size = content.len() as u64,
            NodeData::Directory { children } => {
                self.size = DIRECTORY_SIZE;
                for child in children.values_mut() {
                    child.normalize();
                }
            }
        }
    }

    /// Number of nodes in this subtree, including itself.
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.values().map(|n| n.count_nodes()).sum())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_node_tracks_size() {
        let mut f = FsNode::file("user", "user", 0o644, "hello");
        assert_eq!(f.size, 5);
        assert!(f.is_file());
        assert!(f.children().is_none());
        f.append_content(" world");
        assert_eq!(f.content(), Some("hello world"));
        assert_eq!(f.size, 11);
        f.set_content(String::new());
        assert!(f.is_empty());
        assert_eq!(f.size, 0);
    }

    #[test]
    fn test_directory_node_always_has_children() {
        let d = FsNode::directory("root", "root", 0o755)
            .with_child("a", FsNode::file("root", "root", 0o644, "x"));
        assert!(d.is_dir());
        assert_eq!(d.size, DIRECTORY_SIZE);
        assert_eq!(d.children().map(|c| c.len()), Some(1));
        assert!(d.child("a").is_some());
        assert_eq!(d.count_nodes(), 2);
    }

    #[test]
    fn test_permissions_are_masked() {
        let mut f = FsNode::file("user", "user", 0o17777, "");
        assert_eq!(f.permissions, 0o7777);
        f.set_permissions(0o100644);
        assert_eq!(f.permissions, 0o644);
    }

    #[test]
    fn test_json_shape() {
        let d = FsNode::directory("user", "user", 0o755)
            .with_child("f.txt", FsNode::file("user", "user", 0o644, "hi"));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "directory");
        assert_eq!(json["children"]["f.txt"]["type"], "file");
        assert_eq!(json["children"]["f.txt"]["content"], "hi");
        let back: FsNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, d);
    }
}
