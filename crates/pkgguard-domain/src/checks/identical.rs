use crate::checks::utils::draft;
use crate::model::{Manifest, Section};
use crate::warn_policy::{OnlyWarnsForArrayCheck, WarnFor, report_not_warned_for};
use pkgguard_types::{Finding, ids};
use serde_json::json;
use std::collections::BTreeMap;

/// Each group's members must be declared with exactly the anchor's text.
///
/// `groups` maps an anchor dependency to the names that follow it. Never autofixed.
pub fn check_identical_versions(
    subject: &Manifest,
    section: Section,
    groups: &BTreeMap<String, Vec<String>>,
    warn: &mut OnlyWarnsForArrayCheck,
) -> Vec<Finding> {
    let mut out = Vec::new();

    for (anchor, followers) in groups {
        let Some(expected) = subject.range(section, anchor) else {
            out.push(
                draft(
                    ids::CHECK_IDENTICAL_VERSIONS,
                    ids::CODE_MISSING_DEPENDENCY,
                    format!("Unexpected missing {section} for \"{anchor}\"."),
                )
                .about(subject, anchor)
                .build(),
            );
            continue;
        };

        for name in followers {
            out.extend(compare_identical(
                subject, section, name, expected, anchor, warn,
            ));
        }
    }

    out.extend(report_not_warned_for(subject, warn));
    out
}

/// Listed names must carry exactly the version `dependency` declares for them in its own
/// `dependencies`.
pub fn check_identical_versions_than_dependency(
    subject: &Manifest,
    section: Section,
    names: &[String],
    dependency: &Manifest,
    warn: &mut OnlyWarnsForArrayCheck,
) -> Vec<Finding> {
    let mut out = Vec::new();

    for name in names {
        let Some(expected) = dependency.range(Section::Dependencies, name) else {
            out.push(
                draft(
                    ids::CHECK_IDENTICAL_VERSIONS,
                    ids::CODE_UNEXPECTED_DEPENDENCY,
                    format!(
                        "Unexpected missing dependency \"{name}\" in \"{}\".",
                        dependency.name
                    ),
                )
                .about(subject, name)
                .build(),
            );
            continue;
        };

        if expected.starts_with(['^', '~']) {
            out.push(
                draft(
                    ids::CHECK_IDENTICAL_VERSIONS,
                    ids::CODE_UNSUPPORTED_RANGE,
                    format!(
                        "Unsupported range \"{expected}\" for \"{name}\" in \"{}\".",
                        dependency.name
                    ),
                )
                .about(subject, name)
                .build(),
            );
            continue;
        }

        out.extend(compare_identical(
            subject,
            section,
            name,
            expected,
            &dependency.name,
            warn,
        ));
    }

    out.extend(report_not_warned_for(subject, warn));
    out
}

fn compare_identical(
    subject: &Manifest,
    section: Section,
    name: &str,
    expected: &str,
    anchor: &str,
    warn: &mut dyn WarnFor,
) -> Option<Finding> {
    match subject.range(section, name) {
        None => Some(
            draft(
                ids::CHECK_IDENTICAL_VERSIONS,
                ids::CODE_MISSING_DEPENDENCY,
                format!("Missing \"{name}\" in {section}"),
            )
            .details(format!("it should be \"{expected}\"."))
            .warn(warn.should_warn_for(name))
            .about(subject, name)
            .data("anchor", json!(anchor))
            .build(),
        ),
        Some(value) if value != expected => Some(
            draft(
                ids::CHECK_IDENTICAL_VERSIONS,
                ids::CODE_INVALID_RANGE,
                format!("Invalid \"{name}\" in {section}"),
            )
            .details(format!("expecting \"{value}\" to be \"{expected}\"."))
            .warn(warn.should_warn_for(name))
            .on(subject, section, name)
            .data("anchor", json!(anchor))
            .build(),
        ),
        Some(_) => None,
    }
}
