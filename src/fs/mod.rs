//! Filesystem helpers for state kept under `.git/.gitflow`.

pub mod atomic;

pub use atomic::replace_file;
