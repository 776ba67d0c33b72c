use pkgguard_types::{Finding, RepoPath, Severity, Verdict};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub warning: u32,
    pub error: u32,
    pub auto_fixable: u32,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = SeverityCounts::default();
        for f in findings {
            match f.severity {
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
            }
            if f.is_auto_fixable() {
                counts.auto_fixable += 1;
            }
        }
        counts
    }

    pub fn verdict(&self) -> Verdict {
        if self.error > 0 {
            Verdict::Fail
        } else if self.warning > 0 {
            Verdict::Warn
        } else {
            Verdict::Pass
        }
    }
}

/// Append-only collection of findings for one check session.
///
/// Every orchestrator and every rule invocation receives the same sink explicitly.
#[derive(Clone, Debug, Default)]
pub struct ReportSink {
    findings: Vec<Finding>,
}

impl ReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::from_findings(&self.findings)
    }

    /// At least one finding that is not a warning was recorded.
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| !f.is_warning())
    }

    pub fn verdict(&self) -> Verdict {
        self.counts().verdict()
    }

    /// Findings grouped by manifest path, keeping emission order within a group.
    pub fn by_manifest(&self) -> BTreeMap<RepoPath, Vec<&Finding>> {
        let mut grouped: BTreeMap<RepoPath, Vec<&Finding>> = BTreeMap::new();
        for f in &self.findings {
            let path = f.manifest_path().cloned().unwrap_or_default();
            grouped.entry(path).or_default().push(f);
        }
        grouped
    }

    pub fn into_findings(self) -> Vec<Finding> {
        self.findings
    }
}
