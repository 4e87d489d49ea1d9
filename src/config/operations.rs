//! Config loading, validation, and persistence.

use super::model::FlowConfig;
use super::store::ConfigStore;
use super::types::*;
use crate::error::{FlowError, Result};

const NOT_INITIALIZED: &str =
    "fatal: Not a gitflow-enabled repo yet. Please run \"git flow init\" first.";

/// Read a key, treating an empty value as unset.
fn get_nonempty(store: &dyn ConfigStore, key: &str) -> Result<Option<String>> {
    Ok(store.get(key)?.filter(|v| !v.is_empty()))
}

fn require_key(store: &dyn ConfigStore, key: &str) -> Result<String> {
    get_nonempty(store, key)?.ok_or_else(|| FlowError::UserError(NOT_INITIALIZED.to_string()))
}

impl FlowConfig {
    /// Load and validate the configuration from a store.
    ///
    /// The permanent branch names and the four branch prefixes are required;
    /// the remote defaults to "origin" and the version tag prefix to "".
    ///
    /// # Returns
    ///
    /// * `Ok(FlowConfig)` - Successfully loaded and validated config
    /// * `Err(FlowError::UserError)` - Repository not initialized or invalid values
    pub fn load(store: &dyn ConfigStore) -> Result<Self> {
        let config = Self {
            master_branch: require_key(store, KEY_MASTER)?,
            develop_branch: require_key(store, KEY_DEVELOP)?,
            origin: get_nonempty(store, KEY_ORIGIN)?.unwrap_or_else(default_origin),
            prefixes: Prefixes {
                feature: require_key(store, KEY_PREFIX_FEATURE)?,
                release: require_key(store, KEY_PREFIX_RELEASE)?,
                hotfix: require_key(store, KEY_PREFIX_HOTFIX)?,
                support: require_key(store, KEY_PREFIX_SUPPORT)?,
                versiontag: store.get(KEY_PREFIX_VERSIONTAG)?.unwrap_or_default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Whether the store holds a complete, valid configuration.
    pub fn is_initialized(store: &dyn ConfigStore) -> Result<bool> {
        match Self::load(store) {
            Ok(_) => Ok(true),
            Err(FlowError::UserError(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Write every key to the store.
    pub fn save(&self, store: &mut dyn ConfigStore) -> Result<()> {
        self.validate()?;
        store.set(KEY_MASTER, &self.master_branch)?;
        store.set(KEY_DEVELOP, &self.develop_branch)?;
        store.set(KEY_PREFIX_FEATURE, &self.prefixes.feature)?;
        store.set(KEY_PREFIX_RELEASE, &self.prefixes.release)?;
        store.set(KEY_PREFIX_HOTFIX, &self.prefixes.hotfix)?;
        store.set(KEY_PREFIX_SUPPORT, &self.prefixes.support)?;
        store.set(KEY_PREFIX_VERSIONTAG, &self.prefixes.versiontag)?;
        if self.origin != default_origin() {
            store.set(KEY_ORIGIN, &self.origin)?;
        }
        Ok(())
    }

    /// Serialize config to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| FlowError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return an error on invalid values.
    ///
    /// Validation rules:
    /// - permanent branch names and the remote must be non-empty
    /// - production and integration branches must differ
    /// - branch prefixes must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.master_branch.is_empty() || self.develop_branch.is_empty() {
            return Err(FlowError::UserError(NOT_INITIALIZED.to_string()));
        }

        if self.master_branch == self.develop_branch {
            return Err(FlowError::UserError(
                "Production and integration branches should differ.".to_string(),
            ));
        }

        if self.origin.is_empty() {
            return Err(FlowError::UserError(
                "config validation failed: gitflow.origin must not be empty".to_string(),
            ));
        }

        let prefixes = [
            ("feature", &self.prefixes.feature),
            ("release", &self.prefixes.release),
            ("hotfix", &self.prefixes.hotfix),
            ("support", &self.prefixes.support),
        ];
        for (name, prefix) in prefixes {
            if prefix.is_empty() {
                return Err(FlowError::UserError(format!(
                    "config validation failed: gitflow.prefix.{} must not be empty",
                    name
                )));
            }
        }

        Ok(())
    }
}
