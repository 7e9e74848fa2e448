use std::io;

use super::capability::{DirectoryCapability, EntryKind};
use super::path;
use crate::core::config::TreeConfig;
use crate::core::errors::{Error, Result};
use crate::models::directory_node::{DirectoryTree, NodeHandle, NodeId, NodeKind};

/// Mirrors a directory capability into a [`DirectoryTree`].
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    spreadsheet_extension: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(&TreeConfig::default())
    }
}

impl TreeBuilder {
    pub fn new(config: &TreeConfig) -> Self {
        Self {
            spreadsheet_extension: config.spreadsheet_extension.clone(),
        }
    }

    /// Builds the tree with the root separator as parent path.
    pub async fn build(&self, root: Box<dyn DirectoryCapability>) -> Result<DirectoryTree> {
        self.build_under(root, path::ROOT).await
    }

    /// Walks every directory below `root` with an explicit worklist.
    ///
    /// Any enumeration or acquisition failure aborts the whole build; no
    /// partial tree is returned.
    pub async fn build_under(
        &self,
        root: Box<dyn DirectoryCapability>,
        parent_path: &str,
    ) -> Result<DirectoryTree> {
        let kind = if parent_path == path::ROOT {
            NodeKind::Root
        } else {
            NodeKind::Folder
        };
        let name = root.name().to_string();
        let root_path = path::join(parent_path, &name);
        let mut tree = DirectoryTree::with_root(name, kind, root_path, root);

        let mut pending = vec![NodeId(0)];
        while let Some(id) = pending.pop() {
            let node_path = tree.node(id).path.clone();
            let entries = match tree.node(id).directory_capability() {
                Some(dir) => dir.entries().await,
                None => continue,
            }
            .map_err(|source| build_error(&node_path, source))?;

            let mut subdirs = Vec::new();
            for entry in entries {
                let child_path = path::join(&node_path, &entry.name);
                let Some(dir) = tree.node(id).directory_capability() else {
                    break;
                };
                let (kind, handle) = match entry.kind {
                    EntryKind::Directory => {
                        let child = dir
                            .directory(&entry.name)
                            .await
                            .map_err(|source| build_error(&child_path, source))?;
                        (NodeKind::Folder, NodeHandle::Directory(child))
                    }
                    EntryKind::File => {
                        let file = dir
                            .file(&entry.name)
                            .await
                            .map_err(|source| build_error(&child_path, source))?;
                        let kind = NodeKind::classify_file(&entry.name, &self.spreadsheet_extension);
                        (kind, NodeHandle::File(file))
                    }
                };
                let child_id = tree.push_child(id, entry.name, kind, handle).ok_or_else(|| {
                    build_error(
                        &child_path,
                        io::Error::new(io::ErrorKind::AlreadyExists, "duplicate entry name"),
                    )
                })?;
                if kind.is_container() {
                    subdirs.push(child_id);
                }
            }
            // Reversed so siblings are walked in enumeration order.
            pending.extend(subdirs.into_iter().rev());
        }

        tracing::debug!(root = tree.root_path(), nodes = tree.len(), "built directory tree");
        Ok(tree)
    }
}

fn build_error(path: &str, source: io::Error) -> Error {
    tracing::debug!(path, "directory tree build failed: {}", source);
    Error::DirectoryBuild {
        path: path.to_string(),
        source,
    }
}
