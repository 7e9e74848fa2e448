pub mod directory_node;
pub mod file_handle;
pub mod reference;

pub use directory_node::{DirectoryNode, DirectoryTree, NodeHandle, NodeId, NodeKind};
pub use file_handle::{FileHandle, PreviewKind};
pub use reference::ReferenceMark;
