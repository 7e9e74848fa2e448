//! In-memory capability tree with failure injection, used by tests and demos.

use std::io;

use async_trait::async_trait;

use super::capability::{DirectoryCapability, EntryInfo, EntryKind, FileCapability};
use crate::models::file_handle::FileHandle;

#[derive(Debug, Clone)]
enum MemoryEntry {
    Directory(MemoryDirectory),
    File(MemoryFile),
}

impl MemoryEntry {
    fn name(&self) -> &str {
        match self {
            MemoryEntry::Directory(dir) => &dir.name,
            MemoryEntry::File(file) => &file.name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    name: String,
    entries: Vec<MemoryEntry>,
    fail_entries: bool,
    fail_acquire: bool,
}

impl MemoryDirectory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_dir(mut self, dir: MemoryDirectory) -> Self {
        self.entries.push(MemoryEntry::Directory(dir));
        self
    }

    pub fn with_file(mut self, file: MemoryFile) -> Self {
        self.entries.push(MemoryEntry::File(file));
        self
    }

    /// Enumerating this directory fails.
    pub fn failing_entries(mut self) -> Self {
        self.fail_entries = true;
        self
    }

    /// Acquiring this directory from its parent fails.
    pub fn failing_acquire(mut self) -> Self {
        self.fail_acquire = true;
        self
    }

    fn lookup(&self, name: &str) -> io::Result<&MemoryEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .ok_or_else(|| not_found(name))
    }
}

#[async_trait]
impl DirectoryCapability for MemoryDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    async fn entries(&self) -> io::Result<Vec<EntryInfo>> {
        if self.fail_entries {
            return Err(injected(&self.name));
        }
        Ok(self
            .entries
            .iter()
            .map(|entry| match entry {
                MemoryEntry::Directory(dir) => EntryInfo::new(&dir.name, EntryKind::Directory),
                MemoryEntry::File(file) => EntryInfo::new(&file.name, EntryKind::File),
            })
            .collect())
    }

    async fn directory(&self, name: &str) -> io::Result<Box<dyn DirectoryCapability>> {
        match self.lookup(name)? {
            MemoryEntry::Directory(dir) if dir.fail_acquire => Err(injected(name)),
            MemoryEntry::Directory(dir) => Ok(Box::new(dir.clone())),
            MemoryEntry::File(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{name}' is not a directory"),
            )),
        }
    }

    async fn file(&self, name: &str) -> io::Result<Box<dyn FileCapability>> {
        match self.lookup(name)? {
            MemoryEntry::File(file) if file.fail_acquire => Err(injected(name)),
            MemoryEntry::File(file) => Ok(Box::new(file.clone())),
            MemoryEntry::Directory(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{name}' is not a file"),
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFile {
    name: String,
    contents: Vec<u8>,
    fail_open: bool,
    fail_acquire: bool,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
            ..Self::default()
        }
    }

    /// Opening the file content fails.
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Acquiring the file capability from its parent fails.
    pub fn failing_acquire(mut self) -> Self {
        self.fail_acquire = true;
        self
    }
}

#[async_trait]
impl FileCapability for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> io::Result<FileHandle> {
        if self.fail_open {
            return Err(injected(&self.name));
        }
        Ok(FileHandle {
            name: self.name.clone(),
            size: self.contents.len() as u64,
            modified: None,
            contents: self.contents.clone(),
        })
    }
}

fn not_found(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no entry named '{name}'"))
}

fn injected(name: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("access to '{name}' denied"),
    )
}
