//! Configuration model for git-flow.
//!
//! The permanent branch names, the remote and the per-kind prefixes live in
//! a flat key-value store (`gitflow.*` keys in `git config`). This module
//! loads them into a typed [`FlowConfig`], validates them, and writes them
//! back during `init`.

mod model;
mod operations;
mod store;
pub mod types;


// Re-export public API
pub use model::FlowConfig;
pub use store::{ConfigStore, GitConfigStore};
pub use types::Prefixes;
