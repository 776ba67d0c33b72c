use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `pkgguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PkgguardConfigV1 {
    /// Optional schema string for tooling (`pkgguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Treat the package as a library. Defaults to `!private`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<bool>,

    /// Rewrite fixable ranges in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<bool>,

    #[serde(default)]
    pub recommended: RecommendedConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,

    #[serde(default)]
    pub checks: ChecksConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RecommendedConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_range_versions_in_dependencies: Option<bool>,

    #[serde(default)]
    pub exact_versions_only_warns_for: Vec<String>,

    #[serde(default)]
    pub internal_exact_versions_ignore: Vec<String>,

    #[serde(default)]
    pub direct_duplicate_dependencies_only_warns_for: OnlyWarnsForConfig,

    #[serde(default)]
    pub peer_dependencies_missing_only_warns_for: OnlyWarnsForConfig,

    #[serde(default)]
    pub peer_dependencies_invalid_only_warns_for: OnlyWarnsForConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolutions_explanation_min_length: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkspaceConfig {
    /// Check the directory as a monorepo. Defaults to whether the root declares `workspaces`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub monorepo_direct_duplicate_dependencies_only_warns_for: OnlyWarnsForConfig,
}

/// Names demoted to warnings: a list, or a table of names per related dependency
/// (`"*"` applies to every dependency).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OnlyWarnsForConfig {
    List(Vec<String>),
    Mapping(BTreeMap<String, Vec<String>>),
}

impl Default for OnlyWarnsForConfig {
    fn default() -> Self {
        OnlyWarnsForConfig::List(Vec::new())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChecksConfig {
    #[serde(default)]
    pub satisfies_versions: Vec<SatisfiesVersionsConfig>,

    #[serde(default)]
    pub identical_versions: Vec<IdenticalVersionsConfig>,

    #[serde(default)]
    pub satisfies_versions_from_dependency: Vec<SatisfiesVersionsFromDependencyConfig>,
}

/// Declared ranges in `section` must satisfy the given ranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SatisfiesVersionsConfig {
    pub section: String,
    pub versions: BTreeMap<String, String>,
}

/// Each group anchor's version must be repeated exactly by the names that follow it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IdenticalVersionsConfig {
    pub section: String,
    pub groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub only_warns_for: Vec<String>,
}

/// Ranges of `names` must satisfy the ranges an installed dependency declares.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SatisfiesVersionsFromDependencyConfig {
    pub dependency: String,
    #[serde(default = "default_dependency_section")]
    pub dependency_section: String,
    pub section: String,
    pub names: Vec<String>,
}

fn default_dependency_section() -> String {
    "dependencies".to_string()
}
