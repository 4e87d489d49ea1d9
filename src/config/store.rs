//! Key-value configuration stores.

use crate::error::Result;
use crate::git::Git;
use std::collections::BTreeMap;

/// A flat key-value store holding namespaced configuration values.
pub trait ConfigStore {
    /// Read a value. `Ok(None)` means the key is not set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store backed by the repository's `git config`.
#[derive(Debug, Clone)]
pub struct GitConfigStore {
    git: Git,
}

impl GitConfigStore {
    /// Create a store that reads and writes through `git`.
    pub fn new(git: Git) -> Self {
        Self { git }
    }
}

impl ConfigStore for GitConfigStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        // `git config --get` exits 1 for a missing key.
        let output = self.git.execute(&["config", "--get", key])?;
        Ok(output.success.then_some(output.stdout))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.git.run(&["config", key, value])?;
        Ok(())
    }
}

impl ConfigStore for BTreeMap<String, String> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(BTreeMap::get(self, key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
