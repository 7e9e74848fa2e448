use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::fs;

use super::capability::{DirectoryCapability, EntryInfo, EntryKind, FileCapability};
use crate::models::file_handle::FileHandle;

/// Directory capability backed by the host filesystem.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    path: PathBuf,
    name: String,
}

impl LocalDirectory {
    pub async fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = fs::canonicalize(path.into()).await?;
        let md = fs::metadata(&path).await?;
        if !md.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a directory", path.display()),
            ));
        }
        let name = file_name(&path);
        Ok(Self { path, name })
    }
}

#[async_trait]
impl DirectoryCapability for LocalDirectory {
    fn name(&self) -> &str {
        &self.name
    }

    /// Lists files and real subdirectories.
    ///
    /// Symlinks to files are kept as files; symlinks to directories are never
    /// followed.
    /// Dangling links, special files and names that are not UTF-8 are skipped.
    async fn entries(&self) -> io::Result<Vec<EntryInfo>> {
        let mut read_dir = fs::read_dir(&self.path).await?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::debug!(name = ?raw, "skipping entry with non UTF-8 name");
                    continue;
                }
            };
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_symlink() {
                match fs::metadata(entry.path()).await {
                    Ok(md) if md.is_file() => Some(EntryKind::File),
                    Ok(md) if md.is_dir() => {
                        tracing::debug!(path = ?entry.path(), "skipping directory link");
                        None
                    }
                    Ok(_) => {
                        tracing::debug!(path = ?entry.path(), "skipping link to special file");
                        None
                    }
                    Err(e) => {
                        tracing::debug!(path = ?entry.path(), "skipping dangling link: {}", e);
                        None
                    }
                }
            } else if file_type.is_dir() {
                Some(EntryKind::Directory)
            } else if file_type.is_file() {
                Some(EntryKind::File)
            } else {
                tracing::debug!(path = ?entry.path(), "skipping special file");
                None
            };
            if let Some(kind) = kind {
                entries.push(EntryInfo::new(name, kind));
            }
        }
        Ok(entries)
    }

    async fn directory(&self, name: &str) -> io::Result<Box<dyn DirectoryCapability>> {
        let path = self.path.join(name);
        if !fs::symlink_metadata(&path).await?.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a directory", path.display()),
            ));
        }
        Ok(Box::new(LocalDirectory {
            path,
            name: name.to_string(),
        }))
    }

    async fn file(&self, name: &str) -> io::Result<Box<dyn FileCapability>> {
        let path = self.path.join(name);
        if !fs::metadata(&path).await?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a file", path.display()),
            ));
        }
        Ok(Box::new(LocalFile {
            path,
            name: name.to_string(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
}

#[async_trait]
impl FileCapability for LocalFile {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self) -> io::Result<FileHandle> {
        let md = fs::metadata(&self.path).await?;
        let modified = md.modified().ok().map(OffsetDateTime::from);
        let contents = fs::read(&self.path).await?;
        Ok(FileHandle {
            name: self.name.clone(),
            size: md.len(),
            modified,
            contents,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
