pub mod capability;
pub mod local;
pub mod memory;
pub mod path;
pub mod tree_builder;

pub use capability::{DirectoryCapability, EntryInfo, EntryKind, FileCapability};
pub use local::LocalDirectory;
pub use tree_builder::TreeBuilder;
