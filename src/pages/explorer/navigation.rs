use std::collections::HashSet;
use std::io;

use crate::core::errors::{Error, Result};
use crate::models::directory_node::{DirectoryTree, NodeId};
use crate::models::file_handle::FileHandle;

/// Outcome of a `select` on a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A root or folder; nothing to open.
    Container,
    /// A file whose content must be opened and handed back via `complete_select`.
    File(FileAccessTicket),
}

/// Pending file access, tagged with the selection generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAccessTicket {
    pub node: NodeId,
    pub path: String,
    generation: u64,
}

impl FileAccessTicket {
    /// Opens the file through the node's capability in `tree`.
    pub async fn open(&self, tree: &DirectoryTree) -> io::Result<FileHandle> {
        match tree.node(self.node).file_capability() {
            Some(file) => file.open().await,
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a file", self.path),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Applied,
    Stale,
}

/// Expanded folders and current selection over one [`DirectoryTree`].
///
/// Holds paths only; the tree itself is passed in by the session that owns it.
#[derive(Debug, Clone)]
pub struct NavigationState {
    root_path: String,
    expanded: HashSet<String>,
    selected_path: String,
    selected_file: Option<FileHandle>,
    access_generation: u64,
}

impl NavigationState {
    pub fn new(tree: &DirectoryTree) -> Self {
        let root_path = tree.root_path().to_string();
        Self {
            expanded: HashSet::from([root_path.clone()]),
            selected_path: root_path.clone(),
            root_path,
            selected_file: None,
            access_generation: 0,
        }
    }

    /// Back to the root with only the root expanded.
    pub fn reset(&mut self, tree: &DirectoryTree) {
        self.root_path = tree.root_path().to_string();
        self.expanded.clear();
        self.expanded.insert(self.root_path.clone());
        self.selected_path = self.root_path.clone();
        self.selected_file = None;
        // Pending accesses belong to the old selection.
        self.access_generation += 1;
    }

    pub fn toggle_expand(&mut self, tree: &DirectoryTree, path: &str) -> Result<bool> {
        if !tree.contains(path) {
            return Err(Error::UnknownPath(path.to_string()));
        }
        if self.expanded.remove(path) {
            Ok(false)
        } else {
            self.expanded.insert(path.to_string());
            Ok(true)
        }
    }

    /// Moves the selection to `path`.
    ///
    /// The previous file handle is always dropped. For files the caller must
    /// open the returned ticket and pass the result to [`Self::complete_select`].
    pub fn begin_select(&mut self, tree: &DirectoryTree, path: &str) -> Result<Selection> {
        let node = tree
            .get(path)
            .ok_or_else(|| Error::UnknownPath(path.to_string()))?;

        self.access_generation += 1;
        self.selected_path = node.path.clone();
        self.selected_file = None;

        if node.is_container() {
            return Ok(Selection::Container);
        }
        Ok(Selection::File(FileAccessTicket {
            node: node.id,
            path: node.path.clone(),
            generation: self.access_generation,
        }))
    }

    /// Applies an opened file, unless a newer selection superseded the ticket.
    ///
    /// A failed open leaves the path selected with no handle and returns
    /// `FileAccess`.
    pub fn complete_select(
        &mut self,
        ticket: FileAccessTicket,
        result: io::Result<FileHandle>,
    ) -> Result<Applied> {
        if ticket.generation != self.access_generation {
            tracing::debug!(path = %ticket.path, "dropping stale file access result");
            return Ok(Applied::Stale);
        }
        match result {
            Ok(handle) => {
                self.selected_file = Some(handle);
                Ok(Applied::Applied)
            }
            Err(source) => {
                tracing::warn!(path = %ticket.path, "failed to open file: {}", source);
                self.selected_file = None;
                Err(Error::FileAccess {
                    path: ticket.path,
                    source,
                })
            }
        }
    }

    /// `begin_select` followed by the file open, for callers without concurrency.
    pub async fn select(&mut self, tree: &DirectoryTree, path: &str) -> Result<Applied> {
        match self.begin_select(tree, path)? {
            Selection::Container => Ok(Applied::Applied),
            Selection::File(ticket) => {
                let result = ticket.open(tree).await;
                self.complete_select(ticket, result)
            }
        }
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn selected_path(&self) -> &str {
        &self.selected_path
    }

    pub fn selected_file(&self) -> Option<&FileHandle> {
        self.selected_file.as_ref()
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.expanded.contains(path)
    }

    pub fn expanded(&self) -> &HashSet<String> {
        &self.expanded
    }
}
