//! Repository adapters: read and write `package.json` files, discover workspace members,
//! resolve installed dependencies.
//!
//! This crate is allowed to do filesystem IO. It never installs anything and never touches
//! `node_modules` beyond reading manifests.

#![forbid(unsafe_code)]

mod discover;
mod parse;
mod resolve;
mod write;

use anyhow::Context;
use camino::Utf8Path;
use pkgguard_domain::Manifest;
use pkgguard_types::RepoPath;

pub use discover::discover_members;
pub use parse::parse_manifest;
pub use resolve::{NodeModulesResolver, WorkspaceResolver};
pub use write::{FsManifestWriter, ManifestFile};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a `package.json`.
    ///
    /// Returns `Err(...)` on anything that is not a manifest. **Never panics** on any input.
    pub fn parse_manifest(text: &str) -> anyhow::Result<()> {
        let _ = super::parse_manifest(text, &RepoPath::new("package.json"))?;
        Ok(())
    }

    /// Parse then re-render arbitrary text. **Never panics** on any input.
    pub fn render_manifest(text: &str) -> anyhow::Result<String> {
        let manifest = super::parse_manifest(text, &RepoPath::new("package.json"))?;
        ManifestFile::from_text(text)?.render(&manifest)
    }
}

/// Read and parse the manifest at `rel_path` under `root`.
pub fn load_manifest(root: &Utf8Path, rel_path: &RepoPath) -> anyhow::Result<Manifest> {
    let abs = root.join(rel_path.as_str());
    let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
    parse_manifest(&text, rel_path).with_context(|| format!("parse {rel_path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn fuzz_parsers_never_panic(input in ".*") {
            let _ = fuzz::parse_manifest(&input);
            let _ = fuzz::render_manifest(&input);
        }

        /// Rendering a manifest that was just parsed gives back the exact text.
        #[test]
        fn render_of_parsed_text_is_identity(
            name in "[a-z][a-z0-9-]{0,10}",
            deps in prop::collection::btree_map(
                "[a-z][a-z0-9-]{0,8}",
                "\\^?[0-9]\\.[0-9]\\.[0-9]",
                0..5,
            ),
        ) {
            let body: Vec<String> = deps
                .iter()
                .map(|(k, v)| format!("    \"{k}\": \"{v}\""))
                .collect();
            let text = format!(
                "{{\n  \"name\": \"{name}\",\n  \"dependencies\": {{\n{}\n  }}\n}}\n",
                body.join(",\n")
            );
            prop_assert_eq!(fuzz::render_manifest(&text).ok(), Some(text.clone()));
        }
    }
}
