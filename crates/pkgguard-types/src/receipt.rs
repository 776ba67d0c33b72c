use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;

/// Stable schema identifier for pkgguard reports.
pub const SCHEMA_REPORT_V1: &str = "pkgguard.report.v1";

/// Severity is intentionally small: a finding either fails the run or only warns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: RepoPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

impl Location {
    pub fn manifest(path: RepoPath) -> Self {
        Self {
            path,
            line: None,
            col: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub severity: Severity,
    pub check_id: String,
    pub code: String,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// Name of the offending dependency, when the finding is about one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Replacement range that resolves the finding when applied to the checked manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,

    /// Stable identifier intended for dedup and trending. A hash of:
    /// `check_id + code + manifest path + dependency`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Check-specific structured payload (kept open-ended for forward compatibility).
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

impl Finding {
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn is_auto_fixable(&self) -> bool {
        self.fix.is_some()
    }

    pub fn manifest_path(&self) -> Option<&RepoPath> {
        self.location.as_ref().map(|l| &l.path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct PkgguardData {
    pub manifests_checked: u32,
    pub errors: u32,
    pub warnings: u32,
    pub auto_fixable: u32,

    /// Manifests rewritten by `--fix`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fixed_manifests: Vec<RepoPath>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PkgguardReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: PkgguardData,
}
