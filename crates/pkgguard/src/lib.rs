//! Programmatic API for pkgguard.
//!
//! Build a [`CheckPackage`] for one `package.json` (or a [`CheckWorkspace`] for a monorepo),
//! queue checks on it and run it into a [`ReportSink`]:
//!
//! ```no_run
//! use pkgguard::{CheckPackage, RecommendedOptions, ReportSink, RepoPath};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sink = ReportSink::new();
//! let mut check = CheckPackage::from_dir(camino::Utf8Path::new("web"), &RepoPath::default())?;
//! check.check_recommended(&RecommendedOptions::default());
//! check.run(&mut sink)?;
//! assert!(!sink.has_errors());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use pkgguard_app::{CheckPackage, CheckWorkspace, ExactVersionsConfig, ExplanationValidator};
pub use pkgguard_domain::{
    ConfigError, DependencyResolver, ExtraCheck, Manifest, ManifestWriter, OnlyWarnsFor,
    RecommendedOptions, ReportSink, ResolveError, Section, SeverityCounts, WorkspaceOptions,
};
pub use pkgguard_repo::{FsManifestWriter, NodeModulesResolver, WorkspaceResolver};
pub use pkgguard_settings::{Overrides, ResolvedConfig, parse_config_toml, resolve_config};
pub use pkgguard_types::{Finding, RepoPath, Severity, Verdict};

/// Range helpers (normalization, satisfaction, minimum versions).
pub mod range {
    pub use pkgguard_domain::range::*;
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;

    #[test]
    fn facade_runs_recommended_checks() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let dir = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        std::fs::write(
            dir.join("package.json"),
            r#"{ "name": "app", "private": true, "devDependencies": { "typescript": "^5.0.0" } }"#,
        )
        .expect("write manifest");

        let mut sink = ReportSink::new();
        let mut check = CheckPackage::from_dir(dir, &RepoPath::default()).expect("load");
        check.check_recommended(&RecommendedOptions::default());
        check.run(&mut sink).expect("run");

        assert_eq!(sink.verdict(), Verdict::Fail);
        assert_eq!(sink.findings()[0].severity, Severity::Error);
    }
}
