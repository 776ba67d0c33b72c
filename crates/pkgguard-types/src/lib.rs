//! Stable DTOs and IDs used across the pkgguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for findings and the emitted report
//! - stable string IDs and codes
//! - canonical repo-relative path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod path;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use path::RepoPath;
pub use receipt::{
    Finding, Location, PkgguardData, PkgguardReport, SCHEMA_REPORT_V1, Severity, ToolMeta,
    Verdict,
};
