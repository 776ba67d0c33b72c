use crate::model::{Manifest, Section};
use crate::ports::{DependencyResolver, ResolveError};
use pkgguard_types::{Finding, Location, RepoPath};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Published package at the root `package.json`.
pub fn library(name: &str) -> Manifest {
    Manifest::new(name, RepoPath::new("package.json"))
}

/// Private package at the root `package.json`.
pub fn app(name: &str) -> Manifest {
    let mut manifest = library(name);
    manifest.private = true;
    manifest
}

/// Installed dependency, as a resolver would return it.
pub fn installed(name: &str, version: &str) -> Manifest {
    let mut manifest = Manifest::new(
        name,
        RepoPath::new(format!("node_modules/{name}/package.json")),
    );
    manifest.version = Some(version.to_string());
    manifest
}

/// Give every entry of `section` a line, in name order, starting at `first_line`.
pub fn with_lines(mut manifest: Manifest, section: Section, first_line: u32) -> Manifest {
    let path = manifest.path.clone();
    if let Some(entries) = manifest.sections.get_mut(&section) {
        for (line, entry) in (first_line..).zip(entries.values_mut()) {
            entry.location = Some(Location {
                path: path.clone(),
                line: Some(line),
                col: None,
            });
        }
    }
    manifest
}

#[derive(Default)]
pub struct MapResolver {
    manifests: BTreeMap<String, Rc<Manifest>>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, manifest: Manifest) -> Self {
        self.manifests
            .insert(manifest.name.clone(), Rc::new(manifest));
        self
    }
}

impl DependencyResolver for MapResolver {
    fn resolve(&self, name: &str) -> Result<Rc<Manifest>, ResolveError> {
        self.manifests
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(name.to_string()))
    }
}

/// Resolver failing with something other than "not found".
pub struct BrokenResolver;

impl DependencyResolver for BrokenResolver {
    fn resolve(&self, name: &str) -> Result<Rc<Manifest>, ResolveError> {
        Err(ResolveError::Other(anyhow::anyhow!(
            "malformed manifest for {name}"
        )))
    }
}

/// `(message, details)` pairs, for compact assertions.
pub fn messages(findings: &[Finding]) -> Vec<(String, Option<String>)> {
    findings
        .iter()
        .map(|f| (f.message.clone(), f.details.clone()))
        .collect()
}

pub fn msg(message: &str, details: Option<&str>) -> (String, Option<String>) {
    (message.to_string(), details.map(str::to_string))
}
