use crate::checks::utils::draft;
use crate::model::{Manifest, Section};
use crate::range;
use pkgguard_types::{Finding, ids};
use serde_json::json;

/// Validates the wording of a `resolutionsExplained` entry: `(name, explanation)` to an
/// error message.
pub type ExplanationValidator<'a> = &'a dyn Fn(&str, &str) -> Option<String>;

/// Dependency name and forced version of a `resolutions` entry.
///
/// `name@npm:1.2.3` keys and `patch:name@npm:1.2.3#./patches/...` values are unwrapped.
pub fn unwrap_resolution(key: &str, value: &str) -> (String, String) {
    let (name, key_version) = match key.get(1..).and_then(|rest| rest.find("@npm:")) {
        Some(at) => (&key[..at + 1], Some(&key[at + 1 + "@npm:".len()..])),
        None => (key, None),
    };

    let version = match value.strip_prefix("patch:") {
        Some(patched) => {
            let inner = patched.split('#').next().unwrap_or(patched);
            let inner = inner.replace("%3A", ":");
            match inner.find("@npm:") {
                Some(at) => inner[at + "@npm:".len()..].to_string(),
                None => key_version.unwrap_or(value).to_string(),
            }
        }
        None => range::normalize(value).into_owned(),
    };

    (name.to_string(), version)
}

/// Direct dependencies also listed in `resolutions` must accept the forced version.
pub fn check_resolutions_versions_match(subject: &mut Manifest, autofix: bool) -> Vec<Finding> {
    let mut out = Vec::new();

    let resolutions: Vec<(String, String)> = subject
        .ranges(Section::Resolutions)
        .map(|(key, value)| unwrap_resolution(key, value))
        .collect();

    for (name, version) in resolutions {
        for section in [Section::Dependencies, Section::DevDependencies] {
            let Some(declared) = subject.range(section, &name).map(str::to_string) else {
                continue;
            };
            if range::is_local_reference(&declared) || range::satisfies(&version, &declared) {
                continue;
            }
            if autofix {
                subject.set_range(section, &name, version.clone());
                continue;
            }
            out.push(
                draft(
                    ids::CHECK_RESOLUTIONS_MATCH,
                    ids::CODE_RESOLUTION_MISMATCH,
                    format!("Invalid \"{name}\" in {section}"),
                )
                .details(format!(
                    "expecting \"{declared}\" be \"{version}\" from resolutions."
                ))
                .fix(Some(version.clone()))
                .on(subject, section, &name)
                .data("resolution", json!(version))
                .build(),
            );
        }
    }

    out
}

/// Every resolution is explained, and every explanation belongs to a resolution.
pub fn check_resolutions_has_explanation(
    subject: &Manifest,
    validator: Option<ExplanationValidator<'_>>,
) -> Vec<Finding> {
    let mut out = Vec::new();

    for (key, _) in subject.ranges(Section::Resolutions) {
        match subject.range(Section::ResolutionsExplained, key) {
            None => out.push(
                draft(
                    ids::CHECK_RESOLUTIONS_EXPLANATION,
                    ids::CODE_MISSING_EXPLANATION,
                    format!("Missing \"{key}\" in resolutionsExplained."),
                )
                .on(subject, Section::Resolutions, key)
                .build(),
            ),
            Some(explanation) => {
                if let Some(error) = validator.and_then(|validate| validate(key, explanation)) {
                    out.push(
                        draft(
                            ids::CHECK_RESOLUTIONS_EXPLANATION,
                            ids::CODE_INVALID_EXPLANATION,
                            format!("Invalid message for \"{key}\" in resolutionsExplained"),
                        )
                        .details(error)
                        .on(subject, Section::ResolutionsExplained, key)
                        .build(),
                    );
                }
            }
        }
    }

    for (key, _) in subject.ranges(Section::ResolutionsExplained) {
        if subject.entry(Section::Resolutions, key).is_none() {
            out.push(
                draft(
                    ids::CHECK_RESOLUTIONS_EXPLANATION,
                    ids::CODE_ORPHAN_EXPLANATION,
                    format!("Found \"{key}\" in resolutionsExplained but not in resolutions"),
                )
                .on(subject, Section::ResolutionsExplained, key)
                .build(),
            );
        }
    }

    out
}

/// Validator requiring explanations of at least `min_length` characters.
pub fn min_length_validator(min_length: usize) -> impl Fn(&str, &str) -> Option<String> {
    move |_, explanation| {
        let length = explanation.trim().chars().count();
        (length < min_length).then(|| {
            format!("explanation should be at least {min_length} characters long, got {length}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_patched_resolutions() {
        assert_eq!(
            unwrap_resolution("semver", "7.5.4"),
            ("semver".to_string(), "7.5.4".to_string())
        );
        assert_eq!(
            unwrap_resolution(
                "rollup@npm:2.79.1",
                "patch:rollup@npm%3A2.79.1#./.yarn/patches/rollup.patch"
            ),
            ("rollup".to_string(), "2.79.1".to_string())
        );
        assert_eq!(
            unwrap_resolution("@scope/pkg@npm:1.0.0", "patch:@scope/pkg@npm:1.0.0#p.patch"),
            ("@scope/pkg".to_string(), "1.0.0".to_string())
        );
    }

    #[test]
    fn min_length_validator_rejects_short_messages() {
        let validate = min_length_validator(10);
        assert!(validate("a", "because").is_some());
        assert!(validate("a", "fixes a regression in 2.0").is_none());
    }
}
