use anyhow::Context;
use pkgguard_render::{
    RenderableData, RenderableFinding, RenderableLocation, RenderableReport, RenderableSeverity,
    RenderableVerdictStatus,
};
use pkgguard_types::{
    Finding, PkgguardData, PkgguardReport, SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, ids,
};
use time::OffsetDateTime;

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "pkgguard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

pub fn parse_report_json(text: &str) -> anyhow::Result<PkgguardReport> {
    let report: PkgguardReport = serde_json::from_str(text).context("parse report json")?;
    anyhow::ensure!(
        report.schema == SCHEMA_REPORT_V1,
        "unsupported report schema \"{}\"",
        report.schema
    );
    Ok(report)
}

pub fn serialize_report(report: &PkgguardReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub fn to_renderable(report: &PkgguardReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdictStatus::Pass,
            Verdict::Warn => RenderableVerdictStatus::Warn,
            Verdict::Fail => RenderableVerdictStatus::Fail,
        },
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            manifests_checked: report.data.manifests_checked,
            errors: report.data.errors,
            warnings: report.data.warnings,
            auto_fixable: report.data.auto_fixable,
            fixed_manifests: report
                .data
                .fixed_manifests
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        },
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        details: f.details.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
            col: loc.col,
        }),
        fix: f.fix.clone(),
    }
}

/// Report carrying a single `tool.runtime` finding, for runs that could not complete.
pub fn runtime_error_report(message: &str) -> PkgguardReport {
    let now = OffsetDateTime::now_utc();
    PkgguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings: vec![Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            details: Some("Fix the tool error and re-run pkgguard.".to_string()),
            dependency: None,
            location: None,
            fix: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        data: PkgguardData {
            errors: 1,
            ..PkgguardData::default()
        },
    }
}
