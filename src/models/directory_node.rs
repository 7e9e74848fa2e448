use std::collections::HashMap;

use serde::Serialize;

use crate::services::fs::capability::{DirectoryCapability, FileCapability};
use crate::services::fs::path;

/// Index of a node inside its [`DirectoryTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    Folder,
    Spreadsheet,
    ListDocument,
}

impl NodeKind {
    /// Classifies a leaf by its extension, compared case-insensitively.
    pub fn classify_file(name: &str, spreadsheet_extension: &str) -> NodeKind {
        match path::extension(name) {
            Some(ext) if ext.eq_ignore_ascii_case(spreadsheet_extension) => NodeKind::Spreadsheet,
            _ => NodeKind::ListDocument,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Root | NodeKind::Folder)
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Folder => "folder",
            NodeKind::Spreadsheet => "spreadsheet",
            NodeKind::ListDocument => "list",
        }
    }
}

/// The capability a node owns for later content access.
#[derive(Debug)]
pub enum NodeHandle {
    Directory(Box<dyn DirectoryCapability>),
    File(Box<dyn FileCapability>),
}

#[derive(Debug)]
pub struct DirectoryNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    pub parent: Option<NodeId>,
    /// `Some` for containers only, even when they are empty.
    pub children: Option<Vec<NodeId>>,
    pub handle: NodeHandle,
}

impl DirectoryNode {
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    pub fn child_ids(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn file_capability(&self) -> Option<&dyn FileCapability> {
        match &self.handle {
            NodeHandle::File(file) => Some(file.as_ref()),
            NodeHandle::Directory(_) => None,
        }
    }

    pub fn directory_capability(&self) -> Option<&dyn DirectoryCapability> {
        match &self.handle {
            NodeHandle::Directory(dir) => Some(dir.as_ref()),
            NodeHandle::File(_) => None,
        }
    }
}

/// Immutable snapshot of a picked folder. Root is always `NodeId(0)`.
#[derive(Debug)]
pub struct DirectoryTree {
    nodes: Vec<DirectoryNode>,
    by_path: HashMap<String, NodeId>,
}

impl DirectoryTree {
    pub(crate) fn with_root(
        name: String,
        kind: NodeKind,
        path: String,
        handle: Box<dyn DirectoryCapability>,
    ) -> Self {
        let root = DirectoryNode {
            id: NodeId(0),
            name,
            kind,
            path: path.clone(),
            parent: None,
            children: Some(Vec::new()),
            handle: NodeHandle::Directory(handle),
        };
        let mut by_path = HashMap::new();
        by_path.insert(path, NodeId(0));
        Self {
            nodes: vec![root],
            by_path,
        }
    }

    /// Appends a node under `parent`. Returns `None` when the path is already taken.
    pub(crate) fn push_child(
        &mut self,
        parent: NodeId,
        name: String,
        kind: NodeKind,
        handle: NodeHandle,
    ) -> Option<NodeId> {
        let path = path::join(&self.nodes[parent.0].path, &name);
        if self.by_path.contains_key(&path) {
            return None;
        }
        let id = NodeId(self.nodes.len());
        let children = kind.is_container().then(Vec::new);
        self.nodes.push(DirectoryNode {
            id,
            name,
            kind,
            path: path.clone(),
            parent: Some(parent),
            children,
            handle,
        });
        self.by_path.insert(path, id);
        if let Some(children) = self.nodes[parent.0].children.as_mut() {
            children.push(id);
        }
        Some(id)
    }

    pub fn root(&self) -> &DirectoryNode {
        &self.nodes[0]
    }

    pub fn root_path(&self) -> &str {
        &self.nodes[0].path
    }

    pub fn node(&self, id: NodeId) -> &DirectoryNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, path: &str) -> Option<&DirectoryNode> {
        self.by_path.get(path).map(|id| &self.nodes[id.0])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &DirectoryNode> {
        self.nodes[id.0].child_ids().iter().map(|c| &self.nodes[c.0])
    }

    pub fn parent(&self, id: NodeId) -> Option<&DirectoryNode> {
        self.nodes[id.0].parent.map(|p| &self.nodes[p.0])
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &DirectoryNode> {
        let mut next = self.nodes[id.0].parent;
        std::iter::from_fn(move || {
            let node = &self.nodes[next?.0];
            next = node.parent;
            Some(node)
        })
    }

    /// Nodes in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &DirectoryNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
