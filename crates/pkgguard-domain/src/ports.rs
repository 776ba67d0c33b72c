//! Collaborators the engine depends on, implemented by adapter crates.

use crate::model::Manifest;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The package is not installed where the manifest under check can see it.
    #[error("cannot resolve \"{0}\"")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }
}

/// Looks up the manifest of a package reachable from the manifest under check.
pub trait DependencyResolver {
    fn resolve(&self, name: &str) -> Result<Rc<Manifest>, ResolveError>;
}

/// Persists a manifest after autofix rewrote some of its ranges.
pub trait ManifestWriter {
    fn write(&self, manifest: &Manifest) -> anyhow::Result<()>;
}
