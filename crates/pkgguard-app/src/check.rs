//! The `check` use case: resolve config, run the orchestrators and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use pkgguard_domain::{ReportSink, SeverityCounts};
use pkgguard_settings::{Overrides, PkgguardConfigV1, ResolvedConfig};
use pkgguard_types::{PkgguardData, PkgguardReport, RepoPath, SCHEMA_REPORT_V1, Verdict};
use time::OffsetDateTime;

use crate::package::CheckPackage;
use crate::report::tool_meta;
use crate::workspace::CheckWorkspace;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Directory holding the root `package.json`.
    pub dir: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: PkgguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case. Fixes are written back before the report is returned.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Empty config is allowed, defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        PkgguardConfigV1::default()
    } else {
        pkgguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        pkgguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let root_path = RepoPath::default();
    let root = pkgguard_repo::load_manifest(input.dir, &root_path)?;
    let as_workspace = resolved.workspace.unwrap_or(root.workspaces.is_some());

    let mut sink = ReportSink::new();
    let mut data = PkgguardData::default();

    if as_workspace {
        let mut workspace = CheckWorkspace::from_dir(input.dir)?;
        workspace.autofix(resolved.fix);
        if let Some(is_library) = resolved.library {
            workspace.for_root().library(is_library);
        }
        workspace.check_recommended(&resolved.recommended, &resolved.monorepo);
        for extra in &resolved.extra_checks {
            workspace.for_root().check_extra(extra);
        }
        tracing::info!(
            members = workspace.members().count(),
            "checking workspace"
        );
        workspace.run(&mut sink)?;

        data.manifests_checked = 1 + workspace.members().count() as u32;
        data.fixed_manifests = std::iter::once(workspace.root())
            .chain(workspace.members())
            .filter(|p| p.was_fixed())
            .map(|p| p.manifest().path.clone())
            .collect();
    } else {
        let mut package = CheckPackage::from_dir(input.dir, &root_path)?;
        package.autofix(resolved.fix);
        if let Some(is_library) = resolved.library {
            package.library(is_library);
        }
        package.check_recommended(&resolved.recommended);
        for extra in &resolved.extra_checks {
            package.check_extra(extra);
        }
        tracing::info!(name = package.name(), "checking package");
        package.run(&mut sink)?;

        data.manifests_checked = 1;
        if package.was_fixed() {
            data.fixed_manifests.push(package.manifest().path.clone());
        }
    }

    let counts = SeverityCounts::from_findings(sink.findings());
    data.errors = counts.error;
    data.warnings = counts.warning;
    data.auto_fixable = counts.auto_fixable;

    let report = PkgguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict: counts.verdict(),
        findings: sink.into_findings(),
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
