use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Path of a manifest as shown in findings and reports, relative to the checked root.
///
/// Normalization rules:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - an empty path becomes `.`
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct RepoPath(String);

impl Default for RepoPath {
    fn default() -> Self {
        RepoPath::new("package.json")
    }
}

impl RepoPath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while let Some(rest) = v.strip_prefix("./") {
            v = rest.to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    pub fn join(&self, segment: &str) -> RepoPath {
        let base = Utf8Path::new(self.as_str());
        RepoPath::new(base.join(segment).as_str())
    }

    /// Directory holding this manifest (`.` for a top-level `package.json`).
    pub fn parent_dir(&self) -> RepoPath {
        let parent = Utf8Path::new(self.as_str())
            .parent()
            .map(|p| p.as_str())
            .unwrap_or("");
        RepoPath::new(parent)
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for RepoPath {
    fn from(value: &Utf8Path) -> Self {
        RepoPath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for RepoPath {
    fn from(value: Utf8PathBuf) -> Self {
        RepoPath::new(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_separators_and_leading_dot() {
        assert_eq!(
            RepoPath::new(".\\packages\\a\\package.json").as_str(),
            "packages/a/package.json"
        );
        assert_eq!(RepoPath::new("././package.json").as_str(), "package.json");
        assert_eq!(RepoPath::new("").as_str(), ".");
    }

    #[test]
    fn parent_dir_of_root_manifest_is_dot() {
        assert_eq!(RepoPath::new("package.json").parent_dir().as_str(), ".");
        assert_eq!(
            RepoPath::new("packages/a/package.json").parent_dir().as_str(),
            "packages/a"
        );
    }
}
