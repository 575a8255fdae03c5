pub mod default_tree;
pub mod persistence;
pub mod types;
pub mod vfs;

pub use default_tree::default_tree;
pub use persistence::{AutoSave, BlobStore, FileStore, MemoryStore, PersistError};
pub use types::{FileKind, FsNode, NodeData};
pub use vfs::{display_path, segments_of, Vfs, WalkError};
