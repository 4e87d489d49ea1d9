//! Configuration keys, nested types and defaults for git-flow.

use serde::{Deserialize, Serialize};

/// Key holding the production line's branch name.
pub const KEY_MASTER: &str = "gitflow.branch.master";
/// Key holding the integration line's branch name.
pub const KEY_DEVELOP: &str = "gitflow.branch.develop";
/// Key holding the remote name.
pub const KEY_ORIGIN: &str = "gitflow.origin";
/// Key holding the feature branch prefix.
pub const KEY_PREFIX_FEATURE: &str = "gitflow.prefix.feature";
/// Key holding the release branch prefix.
pub const KEY_PREFIX_RELEASE: &str = "gitflow.prefix.release";
/// Key holding the hotfix branch prefix.
pub const KEY_PREFIX_HOTFIX: &str = "gitflow.prefix.hotfix";
/// Key holding the support branch prefix.
pub const KEY_PREFIX_SUPPORT: &str = "gitflow.prefix.support";
/// Key holding the version tag prefix (may be empty).
pub const KEY_PREFIX_VERSIONTAG: &str = "gitflow.prefix.versiontag";

/// Namespace prefixes for supporting branches and version tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefixes {
    /// Prefix for feature branches (default: "feature/").
    pub feature: String,
    /// Prefix for release branches (default: "release/").
    pub release: String,
    /// Prefix for hotfix branches (default: "hotfix/").
    pub hotfix: String,
    /// Prefix for support branches (default: "support/").
    pub support: String,
    /// Prefix prepended to version tags (default: empty).
    pub versiontag: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            feature: default_feature_prefix(),
            release: default_release_prefix(),
            hotfix: default_hotfix_prefix(),
            support: default_support_prefix(),
            versiontag: String::new(),
        }
    }
}

pub(crate) fn default_master_branch() -> String {
    "master".to_string()
}

pub(crate) fn default_develop_branch() -> String {
    "develop".to_string()
}

pub(crate) fn default_origin() -> String {
    "origin".to_string()
}

pub(crate) fn default_feature_prefix() -> String {
    "feature/".to_string()
}

pub(crate) fn default_release_prefix() -> String {
    "release/".to_string()
}

pub(crate) fn default_hotfix_prefix() -> String {
    "hotfix/".to_string()
}

pub(crate) fn default_support_prefix() -> String {
    "support/".to_string()
}
