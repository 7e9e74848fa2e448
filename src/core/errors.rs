use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to build directory tree at {path}: {source}")]
    DirectoryBuild {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to access file {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("path '{0}' is not part of the current tree")]
    UnknownPath(String),
    #[error("no directory tree has been loaded")]
    NoTree,
    #[error("invalid config: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
