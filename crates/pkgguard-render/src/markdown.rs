use crate::{RenderableReport, RenderableSeverity, RenderableVerdictStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# pkgguard report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    let d = &report.data;
    out.push_str(&format!(
        "- Verdict: **{}**\n- Manifests checked: {}\n- Findings: {} errors, {} warnings, {} auto-fixable\n\n",
        verdict, d.manifests_checked, d.errors, d.warnings, d.auto_fixable
    ));

    if !d.fixed_manifests.is_empty() {
        out.push_str("Fixed:\n\n");
        for path in &d.fixed_manifests {
            out.push_str(&format!("- `{}`\n", path));
        }
        out.push('\n');
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        out.push_str(&format!(
            "- [{}] `{}` / `{}`: {}",
            sev, f.check_id, f.code, f.message
        ));
        if let Some(loc) = &f.location {
            match loc.line {
                Some(line) => out.push_str(&format!(" (`{}`:{})", loc.path, line)),
                None => out.push_str(&format!(" (`{}`)", loc.path)),
            }
        }
        out.push('\n');

        if let Some(details) = &f.details {
            out.push_str(&format!("  - {}\n", details));
        }
        if let Some(fix) = &f.fix {
            out.push_str(&format!("  - fix: `{}`\n", fix));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{finding, report};

    #[test]
    fn renders_empty_report() {
        let md = render_markdown(&report(RenderableVerdictStatus::Pass, Vec::new()));
        assert!(md.starts_with("# pkgguard report"));
        assert!(md.contains("Verdict: **PASS**"));
        assert!(md.contains("No findings"));
    }

    #[test]
    fn empty_report_snapshot() {
        let md = render_markdown(&report(RenderableVerdictStatus::Pass, Vec::new()));
        insta::assert_snapshot!(md.trim_end(), @r"
# pkgguard report

- Verdict: **PASS**
- Manifests checked: 1
- Findings: 0 errors, 0 warnings, 0 auto-fixable

No findings.
");
    }

    #[test]
    fn renders_findings_with_location_details_and_fix() {
        let mut fixable = finding(RenderableSeverity::Warning, None);
        fixable.check_id = "package.exact_versions".to_string();
        fixable.message =
            "Unexpected range dependency in \"devDependencies\" for \"typescript\"".to_string();
        fixable.details = None;
        fixable.fix = Some("5.3.3".to_string());

        let mut r = report(
            RenderableVerdictStatus::Fail,
            vec![finding(RenderableSeverity::Error, Some(7)), fixable],
        );
        r.data.fixed_manifests = vec!["packages/ui/package.json".to_string()];

        let md = render_markdown(&r);
        assert!(md.contains("Verdict: **FAIL**"));
        assert!(md.contains("Findings: 1 errors, 1 warnings, 1 auto-fixable"));
        assert!(md.contains("- `packages/ui/package.json`"));
        assert!(md.contains("## Findings"));
        assert!(md.contains("[ERROR] `package.peer_dependencies` / `invalid_peer`"));
        assert!(md.contains("(`package.json`:7)"));
        assert!(md.contains("  - \"2.0.0\" (in devDependencies)"));
        assert!(md.contains("[WARN]"));
        assert!(md.contains("(`package.json`)\n"));
        assert!(md.contains("  - fix: `5.3.3`"));
    }
}
