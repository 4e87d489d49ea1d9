//! FlowConfig struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for a git-flow enabled repository.
///
/// Populated once by `git flow init`, read on every other invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Branch that brings forth production releases (default: "master").
    #[serde(default = "default_master_branch")]
    pub master_branch: String,

    /// Branch used to integrate the next release (default: "develop").
    #[serde(default = "default_develop_branch")]
    pub develop_branch: String,

    /// Remote used for fetch, publish, track and push (default: "origin").
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Supporting branch and version tag prefixes.
    #[serde(default)]
    pub prefixes: Prefixes,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            master_branch: default_master_branch(),
            develop_branch: default_develop_branch(),
            origin: default_origin(),
            prefixes: Prefixes::default(),
        }
    }
}
