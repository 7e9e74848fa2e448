pub mod chat;
pub mod fs;
pub mod references;
