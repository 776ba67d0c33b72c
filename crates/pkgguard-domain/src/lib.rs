//! Pure dependency range evaluation (no IO).
//!
//! Input: manifests parsed elsewhere, plus a resolver port for dependency manifests.
//! Output: findings, and in-memory range rewrites on the manifest under check.

#![forbid(unsafe_code)]

pub mod checks;
pub mod error;
pub mod fingerprint;
pub mod model;
pub mod policy;
pub mod ports;
pub mod range;
pub mod report;
pub mod warn_policy;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use error::ConfigError;
pub use model::{DependencyEntry, Manifest, PeerMeta, Section};
pub use policy::{ExtraCheck, RecommendedOptions, WorkspaceOptions};
pub use ports::{DependencyResolver, ManifestWriter, ResolveError};
pub use report::{ReportSink, SeverityCounts};
pub use warn_policy::{
    NeverWarn, OnlyWarnsFor, OnlyWarnsForArrayCheck, OnlyWarnsForMappingCheck, WarnFor,
};
