use crate::{RenderableData, RenderableReport, RenderableSeverity};

/// Console output: findings grouped by manifest, then the summary line.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();
    let mut current: Option<&str> = None;

    for f in &report.findings {
        let path = f.location.as_ref().map(|l| l.path.as_str()).unwrap_or("");
        if current != Some(path) {
            if current.is_some() {
                out.push('\n');
            }
            if !path.is_empty() {
                out.push_str(path);
                out.push('\n');
            }
            current = Some(path);
        }

        let sev = match f.severity {
            RenderableSeverity::Warning => "warning",
            RenderableSeverity::Error => "error",
        };
        let line = f
            .location
            .as_ref()
            .and_then(|l| l.line)
            .map(|l| format!("{l}:"))
            .unwrap_or_default();
        out.push_str(&format!("  {line:<5} {sev:<8} {}  {}\n", f.message, f.check_id));

        if let Some(details) = &f.details {
            for d in details.lines() {
                out.push_str(&format!("        {d}\n"));
            }
        }
        if let Some(fix) = &f.fix {
            out.push_str(&format!("        fix: \"{fix}\"\n"));
        }
    }

    if !report.findings.is_empty() {
        out.push('\n');
    }
    for path in &report.data.fixed_manifests {
        out.push_str(&format!("fixed {path}\n"));
    }
    out.push_str(&render_summary(&report.data));
    out.push('\n');
    out
}

/// `N errors, M warnings, K auto-fixable`
pub fn render_summary(data: &RenderableData) -> String {
    format!(
        "{} errors, {} warnings, {} auto-fixable",
        data.errors, data.warnings, data.auto_fixable
    )
}
