use crate::checks::utils::draft;
use crate::model::{Manifest, Section};
use crate::range::{self, Operator};
use crate::warn_policy::{NeverWarn, OnlyWarnsForArrayCheck, WarnFor, report_not_warned_for};
use pkgguard_types::{Finding, Location, ids};
use serde_json::json;
use std::collections::BTreeMap;

/// Tells whether ranges of a section are expected to be pinned.
pub type ExactVersionsPredicate<'a> = &'a dyn Fn(Section) -> bool;

/// Declared ranges in `section` must satisfy literal ranges.
pub fn check_satisfies_versions(
    subject: &Manifest,
    section: Section,
    expected: &BTreeMap<String, String>,
    warn: &mut OnlyWarnsForArrayCheck,
) -> Vec<Finding> {
    let mut out = Vec::new();

    for (name, required) in expected {
        match subject.range(section, name) {
            None => out.push(
                draft(
                    ids::CHECK_SATISFIES_VERSIONS,
                    ids::CODE_MISSING_DEPENDENCY,
                    format!("Missing \"{name}\" in {section}"),
                )
                .details(format!("should satisfies \"{required}\""))
                .warn(warn.should_warn_for(name))
                .about(subject, name)
                .build(),
            ),
            Some(declared) => {
                if !min_satisfies(declared, required) {
                    out.push(
                        draft(
                            ids::CHECK_SATISFIES_VERSIONS,
                            ids::CODE_INVALID_RANGE,
                            format!("Invalid \"{name}\" in {section}"),
                        )
                        .details(format!(
                            "\"{declared}\" (in \"{name}\") should satisfies \"{required}\"."
                        ))
                        .warn(warn.should_warn_for(name))
                        .on(subject, section, name)
                        .build(),
                    );
                }
            }
        }
    }

    out.extend(report_not_warned_for(subject, warn));
    out
}

fn min_satisfies(declared: &str, required: &str) -> bool {
    if range::is_local_reference(declared) {
        return true;
    }
    range::min_version(declared).is_some_and(|min| range::satisfies(&min.to_string(), required))
}

/// Where the expected ranges come from, and which names to compare.
pub struct FromDependency<'a> {
    pub dependency: &'a Manifest,
    pub dependency_section: Section,
    pub section: Section,
    pub names: &'a [String],
}

/// Replacement range for `existing` so that it satisfies `expected`, keeping the existing
/// comparator style.
pub fn satisfying_fix(
    existing: Option<&str>,
    expected: &str,
    section: Section,
    should_have_exact_versions: ExactVersionsPredicate<'_>,
) -> Option<String> {
    let operator = existing
        .and_then(range::get_operator)
        .or_else(|| {
            if should_have_exact_versions(section) {
                Some(Operator::Exact)
            } else {
                range::get_operator(expected)
            }
        })?;
    let min = range::min_version(expected)?;
    range::with_operator(&min.to_string(), operator)
}

enum Outcome {
    Report(Finding),
    Fix { name: String, value: String },
}

/// Ranges of `target` must satisfy the ranges `source` declares for the same names.
fn compare_with_source(
    target: &Manifest,
    from: &FromDependency<'_>,
    should_have_exact_versions: Option<ExactVersionsPredicate<'_>>,
    autofix: bool,
    warn: &mut dyn WarnFor,
) -> Vec<Outcome> {
    let mut out = Vec::new();
    let source = from.dependency;
    let (section, source_section) = (from.section, from.dependency_section);

    for name in from.names {
        let Some(required) = source.range(source_section, name) else {
            out.push(Outcome::Report(
                draft(
                    ids::CHECK_SATISFIES_VERSIONS,
                    ids::CODE_UNEXPECTED_DEPENDENCY,
                    format!(
                        "Unexpected missing dependency \"{name}\" in \"{}\".",
                        source.name
                    ),
                )
                .details(format!(
                    "config expects \"{name}\" in \"{source_section}\" of \"{}\".",
                    source.name
                ))
                .about(target, name)
                .build(),
            ));
            continue;
        };

        let declared = target.range(section, name);
        if declared.is_some_and(|d| min_satisfies(d, required)) {
            continue;
        }

        let fix = should_have_exact_versions
            .and_then(|exact| satisfying_fix(declared, required, section, exact));
        if autofix && let Some(value) = fix {
            out.push(Outcome::Fix {
                name: name.clone(),
                value,
            });
            continue;
        }

        let finding = match declared {
            None => draft(
                ids::CHECK_SATISFIES_VERSIONS,
                ids::CODE_MISSING_DEPENDENCY,
                format!("Missing \"{name}\" in \"{section}\" of \"{}\"", target.name),
            )
            .details(format!("should satisfies \"{required}\""))
            .about(target, name),
            Some(declared) => draft(
                ids::CHECK_SATISFIES_VERSIONS,
                ids::CODE_INVALID_RANGE,
                format!("Invalid \"{name}\" in \"{section}\" of \"{}\"", target.name),
            )
            .details(format!(
                "\"{declared}\" should satisfies \"{required}\" from \"{}\" in \"{source_section}\".",
                source.name
            ))
            .on(target, section, name),
        }
        .warn(warn.should_warn_for(name))
        .fix(fix)
        .data("expected", json!(required))
        .build();

        out.push(Outcome::Report(finding));
    }

    out
}

/// Ranges of the manifest under check must satisfy the ranges a dependency declares.
///
/// With autofix, entries with a computable replacement are rewritten (or added) instead of
/// being reported.
pub fn check_satisfies_versions_from_dependency(
    subject: &mut Manifest,
    from: &FromDependency<'_>,
    should_have_exact_versions: ExactVersionsPredicate<'_>,
    autofix: bool,
    warn: &mut OnlyWarnsForArrayCheck,
) -> Vec<Finding> {
    let mut out = Vec::new();

    let outcomes = compare_with_source(
        subject,
        from,
        Some(should_have_exact_versions),
        autofix,
        warn,
    );
    for outcome in outcomes {
        match outcome {
            Outcome::Fix { name, value } => subject.insert(from.section, name, value),
            Outcome::Report(finding) => out.push(finding),
        }
    }

    out.extend(report_not_warned_for(subject, warn));
    out
}

/// Assertions about a third-party manifest: `None` means the name must be absent.
pub fn check_satisfies_versions_in_dependency(
    subject: &Manifest,
    dependency: &Manifest,
    expected: &BTreeMap<Section, BTreeMap<String, Option<String>>>,
) -> Vec<Finding> {
    let mut out = Vec::new();

    for (section, ranges) in expected {
        for (name, required) in ranges {
            let declared = dependency.range(*section, name);
            match (declared, required) {
                (None, None) => {}
                (None, Some(required)) => out.push(
                    draft(
                        ids::CHECK_SATISFIES_VERSIONS,
                        ids::CODE_MISSING_DEPENDENCY,
                        format!(
                            "Missing \"{name}\" in {section} of \"{}\"",
                            dependency.name
                        ),
                    )
                    .details(format!(
                        "\"{name}\" is missing but should satisfies \"{required}\"."
                    ))
                    .about(subject, name)
                    .build(),
                ),
                (Some(_), None) => out.push(
                    draft(
                        ids::CHECK_SATISFIES_VERSIONS,
                        ids::CODE_INVALID_RANGE,
                        format!(
                            "Invalid \"{name}\" in {section} of \"{}\"",
                            dependency.name
                        ),
                    )
                    .details("it should not be present")
                    .about(subject, name)
                    .build(),
                ),
                (Some(declared), Some(required)) => {
                    if range::satisfies(declared, required)
                        || range::intersects(declared, required)
                    {
                        continue;
                    }
                    out.push(
                        draft(
                            ids::CHECK_SATISFIES_VERSIONS,
                            ids::CODE_INVALID_RANGE,
                            format!(
                                "Invalid \"{name}\" in {section} of \"{}\"",
                                dependency.name
                            ),
                        )
                        .details(format!("\"{declared}\" does not satisfies \"{required}\""))
                        .about(subject, name)
                        .build(),
                    );
                }
            }
        }
    }

    out
}

/// Ranges `second` declares must satisfy the ranges `first` declares, per section.
///
/// Findings are located on `subject`, the manifest that configured the contract.
pub fn check_satisfies_versions_between_dependencies(
    subject: &Manifest,
    first: &Manifest,
    second: &Manifest,
    names_by_section: &BTreeMap<Section, Vec<String>>,
) -> Vec<Finding> {
    let mut out = Vec::new();
    let mut never = NeverWarn;

    for (section, names) in names_by_section {
        let from = FromDependency {
            dependency: first,
            dependency_section: *section,
            section: *section,
            names,
        };
        out.extend(
            compare_with_source(second, &from, None, false, &mut never)
                .into_iter()
                .filter_map(|outcome| match outcome {
                    Outcome::Report(mut finding) => {
                        finding.location = Some(Location::manifest(subject.path.clone()));
                        Some(finding)
                    }
                    Outcome::Fix { .. } => None,
                }),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_keeps_existing_operator() {
        let never_exact = |_: Section| false;
        assert_eq!(
            satisfying_fix(Some("^1.0.0"), "^2.1.0", Section::Dependencies, &never_exact)
                .as_deref(),
            Some("^2.1.0")
        );
        assert_eq!(
            satisfying_fix(Some("~1.0.0"), ">=2.1", Section::Dependencies, &never_exact)
                .as_deref(),
            Some("~2.1.0")
        );
    }

    #[test]
    fn fix_for_missing_entry_follows_section_policy() {
        let dev_exact = |s: Section| s == Section::DevDependencies;
        assert_eq!(
            satisfying_fix(None, "^2.1.0", Section::DevDependencies, &dev_exact).as_deref(),
            Some("2.1.0")
        );
        assert_eq!(
            satisfying_fix(None, "^2.1.0", Section::Dependencies, &dev_exact).as_deref(),
            Some("^2.1.0")
        );
        assert_eq!(
            satisfying_fix(None, "<2.1.0", Section::Dependencies, &dev_exact),
            None
        );
    }
}
