//! Directory tree mirroring with chat source-reference overlays.

pub mod core;
pub mod models;
pub mod pages;
pub mod services;
