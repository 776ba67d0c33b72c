use crate::fingerprint::fingerprint_for_dep;
use crate::model::{Manifest, Section};
use pkgguard_types::{Finding, Location, Severity, ids};
use serde_json::{Map, Value, json};

/// Incrementally built finding; the fingerprint is computed in `build`.
pub(crate) struct Draft {
    finding: Finding,
    section: Option<Section>,
}

pub(crate) fn draft(check_id: &str, code: &str, message: impl Into<String>) -> Draft {
    Draft {
        finding: Finding {
            severity: Severity::Error,
            check_id: check_id.to_string(),
            code: code.to_string(),
            message: message.into(),
            details: None,
            dependency: None,
            location: None,
            fix: None,
            fingerprint: None,
            data: Value::Null,
        },
        section: None,
    }
}

impl Draft {
    pub(crate) fn details(mut self, details: impl Into<String>) -> Self {
        self.finding.details = Some(details.into());
        self
    }

    pub(crate) fn warn(mut self, only_warns: bool) -> Self {
        self.finding.severity = if only_warns {
            Severity::Warning
        } else {
            Severity::Error
        };
        self
    }

    pub(crate) fn fix(mut self, fix: Option<String>) -> Self {
        self.finding.fix = fix;
        self
    }

    /// Manifest-level finding.
    pub(crate) fn at(mut self, manifest: &Manifest) -> Self {
        self.finding.location = Some(Location::manifest(manifest.path.clone()));
        self
    }

    /// Finding about one entry of `manifest`; located on the entry when it exists.
    pub(crate) fn on(mut self, manifest: &Manifest, section: Section, name: &str) -> Self {
        self.finding.location = Some(manifest.location_of(section, name));
        self.finding.dependency = Some(name.to_string());
        self.section = Some(section);
        self
    }

    /// Finding about a dependency that has no entry in the manifest being reported on.
    pub(crate) fn about(mut self, manifest: &Manifest, name: &str) -> Self {
        self.finding.location = Some(Location::manifest(manifest.path.clone()));
        self.finding.dependency = Some(name.to_string());
        self
    }

    pub(crate) fn data(mut self, key: &str, value: Value) -> Self {
        if !self.finding.data.is_object() {
            self.finding.data = Value::Object(Map::new());
        }
        if let Some(obj) = self.finding.data.as_object_mut() {
            obj.insert(key.to_string(), value);
        }
        self
    }

    pub(crate) fn build(mut self) -> Finding {
        if let Some(section) = self.section {
            self = self.data("section", json!(section.key()));
        }
        let path = self
            .finding
            .location
            .as_ref()
            .map(|l| l.path.as_str().to_string())
            .unwrap_or_default();
        self.finding.fingerprint = Some(fingerprint_for_dep(
            &self.finding.check_id,
            &self.finding.code,
            &path,
            self.finding.dependency.as_deref().unwrap_or(""),
            self.section.map(Section::key),
        ));
        self.finding
    }
}

/// `"a", "b"` as used in details.
pub(crate) fn quoted_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `dependencies or devDependencies`.
pub(crate) fn sections_joined(sections: &[Section], separator: &str) -> String {
    sections
        .iter()
        .map(|s| s.key())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Finding raised when a rule needs a dependency manifest that is not installed.
pub(crate) fn unresolved(subject: &Manifest, check_id: &str, name: &str) -> Finding {
    draft(
        check_id,
        ids::CODE_UNRESOLVED_DEPENDENCY,
        format!("Cannot resolve \"{name}\""),
    )
    .details(format!(
        "\"{name}\" is not installed next to \"{}\", install dependencies first.",
        subject.name
    ))
    .about(subject, name)
    .build()
}
