use std::fmt;
use std::io;

use async_trait::async_trait;

use crate::models::file_handle::FileHandle;

/// Kind tag an enumerated entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl EntryInfo {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Access to one directory of some hierarchical store.
///
/// Entries come back in whatever order the store yields them.
#[async_trait]
pub trait DirectoryCapability: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn entries(&self) -> io::Result<Vec<EntryInfo>>;

    async fn directory(&self, name: &str) -> io::Result<Box<dyn DirectoryCapability>>;

    async fn file(&self, name: &str) -> io::Result<Box<dyn FileCapability>>;
}

/// Access to a single file. Content is only read on `open`.
#[async_trait]
pub trait FileCapability: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    async fn open(&self) -> io::Result<FileHandle>;
}
