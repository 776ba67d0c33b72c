use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use pkgguard_domain::{DependencyResolver, Manifest, ResolveError};
use pkgguard_types::RepoPath;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::parse::parse_manifest;

/// Resolves installed packages the way Node does: `node_modules/<name>/package.json` in the
/// package directory, then in each parent directory.
///
/// Parsed manifests are cached for the lifetime of the resolver.
#[derive(Debug)]
pub struct NodeModulesResolver {
    root: Utf8PathBuf,
    package_dir: Utf8PathBuf,
    cache: RefCell<BTreeMap<String, Rc<Manifest>>>,
}

impl NodeModulesResolver {
    /// `root` is the directory report paths are relative to; `package_dir` the directory of
    /// the manifest under check.
    pub fn new(root: impl Into<Utf8PathBuf>, package_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            package_dir: package_dir.into(),
            cache: RefCell::new(BTreeMap::new()),
        }
    }

    fn locate(&self, name: &str) -> Option<Utf8PathBuf> {
        self.package_dir
            .ancestors()
            .map(|dir| dir.join("node_modules").join(name).join("package.json"))
            .find(|candidate| candidate.is_file())
    }

    fn repo_path(&self, path: &Utf8Path) -> RepoPath {
        match path.strip_prefix(&self.root) {
            Ok(rel) => RepoPath::new(rel.as_str()),
            Err(_) => RepoPath::new(path.as_str()),
        }
    }
}

impl DependencyResolver for NodeModulesResolver {
    fn resolve(&self, name: &str) -> Result<Rc<Manifest>, ResolveError> {
        if let Some(hit) = self.cache.borrow().get(name) {
            return Ok(Rc::clone(hit));
        }

        let Some(path) = self.locate(name) else {
            tracing::debug!(name, from = %self.package_dir, "dependency not installed");
            return Err(ResolveError::NotFound(name.to_string()));
        };

        let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
        let manifest = parse_manifest(&text, &self.repo_path(&path))
            .with_context(|| format!("parse {path}"))?;
        let manifest = Rc::new(manifest);
        self.cache
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&manifest));
        Ok(manifest)
    }
}

/// Resolves workspace members by name before falling back to installed packages.
pub struct WorkspaceResolver<R> {
    members: BTreeMap<String, Rc<Manifest>>,
    fallback: R,
}

impl<R: DependencyResolver> WorkspaceResolver<R> {
    pub fn new(members: impl IntoIterator<Item = Rc<Manifest>>, fallback: R) -> Self {
        Self {
            members: members
                .into_iter()
                .map(|m| (m.name.clone(), m))
                .collect(),
            fallback,
        }
    }
}

impl<R: DependencyResolver> DependencyResolver for WorkspaceResolver<R> {
    fn resolve(&self, name: &str) -> Result<Rc<Manifest>, ResolveError> {
        match self.members.get(name) {
            Some(member) => Ok(Rc::clone(member)),
            None => self.fallback.resolve(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgguard_domain::Section;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn install(dir: &Utf8Path, name: &str, version: &str) {
        let path = dir.join("node_modules").join(name);
        std::fs::create_dir_all(&path).expect("create dir");
        std::fs::write(
            path.join("package.json"),
            format!(
                "{{\"name\": \"{name}\", \"version\": \"{version}\", \"peerDependencies\": {{\"react\": \"^18.0.0\"}}}}"
            ),
        )
        .expect("write manifest");
    }

    #[test]
    fn resolves_from_package_dir_then_parents() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let member = root.join("packages/a");
        std::fs::create_dir_all(&member).expect("create dir");
        install(&root, "hoisted", "1.0.0");
        install(&root, "@scope/lib", "2.0.0");
        install(&member, "hoisted", "2.0.0");

        let resolver = NodeModulesResolver::new(root.clone(), member);
        let hoisted = resolver.resolve("hoisted").expect("local copy");
        assert_eq!(hoisted.version.as_deref(), Some("2.0.0"));
        assert_eq!(
            hoisted.path.as_str(),
            "packages/a/node_modules/hoisted/package.json"
        );

        let scoped = resolver.resolve("@scope/lib").expect("scoped");
        assert_eq!(scoped.version.as_deref(), Some("2.0.0"));
        assert_eq!(
            scoped.range(Section::PeerDependencies, "react"),
            Some("^18.0.0")
        );
    }

    #[test]
    fn missing_package_is_not_found() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let resolver = NodeModulesResolver::new(root.clone(), root);
        let err = resolver.resolve("left-pad").expect_err("not installed");
        assert!(err.is_not_found());
    }

    #[test]
    fn malformed_manifest_is_not_a_miss() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        let dir = root.join("node_modules/broken");
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(dir.join("package.json"), "{ nope").expect("write");

        let resolver = NodeModulesResolver::new(root.clone(), root);
        let err = resolver.resolve("broken").expect_err("malformed");
        assert!(!err.is_not_found());
    }

    #[test]
    fn cached_manifest_is_shared() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        install(&root, "dep", "1.0.0");

        let resolver = NodeModulesResolver::new(root.clone(), root.clone());
        let first = resolver.resolve("dep").expect("dep");
        std::fs::remove_dir_all(root.join("node_modules")).expect("remove");
        let second = resolver.resolve("dep").expect("cached");
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn workspace_members_win_over_node_modules() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        install(&root, "shared", "0.1.0");

        let mut member = Manifest::new("shared", RepoPath::new("packages/shared/package.json"));
        member.version = Some("2.0.0".to_string());
        let resolver = WorkspaceResolver::new(
            [Rc::new(member)],
            NodeModulesResolver::new(root.clone(), root),
        );

        let shared = resolver.resolve("shared").expect("member");
        assert_eq!(shared.version.as_deref(), Some("2.0.0"));
        assert!(resolver.resolve("other").expect_err("missing").is_not_found());
    }
}
