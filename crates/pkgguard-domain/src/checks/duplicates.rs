use crate::checks::utils::{draft, sections_joined, unresolved};
use crate::model::{Manifest, Section};
use crate::ports::{DependencyResolver, ResolveError};
use crate::range;
use crate::warn_policy::{OnlyWarnsForMappingCheck, WarnFor, report_not_warned_for_mapping};
use pkgguard_types::{Finding, ids};
use serde_json::json;
use std::collections::BTreeSet;

/// Sections of the manifest under check compared with a dependency's `dependencies`.
pub const DIRECT_SEARCH_IN: [Section; 2] = [Section::Dependencies, Section::DevDependencies];

/// Compare every entry of `related[related_section]` with the declarations of the same name
/// in `subject`, among `search_in`.
pub fn check_duplicate_dependencies(
    check_id: &str,
    subject: &Manifest,
    is_library: bool,
    related_section: Section,
    search_in: &[Section],
    related: &Manifest,
    warn: &mut dyn WarnFor,
) -> Vec<Finding> {
    let mut out = Vec::new();

    for (name, related_range) in related.ranges(related_section) {
        let found_in = subject.sections_declaring(name, search_in);

        match found_in.as_slice() {
            [] => continue,
            [a, b] if is_library && is_library_pair(*a, *b) => {
                let (Some(x), Some(y)) = (subject.range(*a, name), subject.range(*b, name)) else {
                    continue;
                };
                if x == y {
                    out.push(
                        draft(
                            check_id,
                            ids::CODE_SAME_VERSION_IN_SECTIONS,
                            format!(
                                "Invalid \"{name}\" has same version in dependencies and devDependencies"
                            ),
                        )
                        .details(
                            "please place it only in dependencies or use range in dependencies",
                        )
                        .on(subject, Section::Dependencies, name)
                        .build(),
                    );
                }
                // A range in dependencies with a pin in devDependencies is the expected layout.
                continue;
            }
            [_, _, ..] => {
                out.push(
                    draft(
                        check_id,
                        ids::CODE_DUPLICATE_SECTIONS,
                        format!(
                            "Invalid \"{name}\" present in {}",
                            sections_joined(&found_in, " and ")
                        ),
                    )
                    .details("please place it only in dependencies")
                    .on(subject, found_in[0], name)
                    .build(),
                );
                continue;
            }
            [section] => {
                let Some(version) = subject.range(*section, name) else {
                    continue;
                };
                if range::is_local_reference(version) || range::is_local_reference(related_range)
                {
                    continue;
                }
                let normalized = range::normalize(version);
                if range::satisfies(&normalized, related_range)
                    || range::intersects(&normalized, related_range)
                {
                    continue;
                }
                // Overrides are checked against `resolutions` by their own rule.
                if subject.entry(Section::Resolutions, name).is_some() {
                    continue;
                }
                out.push(
                    draft(
                        check_id,
                        ids::CODE_DUPLICATE_UNSATISFIED,
                        format!("Invalid duplicate dependency \"{name}\""),
                    )
                    .details(format!(
                        "\"{version}\" (in {section}) should satisfies \"{related_range}\" from \"{}\" {related_section}.",
                        related.name
                    ))
                    .warn(warn.should_warn_for(name))
                    .on(subject, *section, name)
                    .data("related", json!(related.name))
                    .data("expected", json!(related_range))
                    .build(),
                );
            }
        }
    }

    out
}

fn is_library_pair(a: Section, b: Section) -> bool {
    matches!(
        (a, b),
        (Section::Dependencies, Section::DevDependencies)
            | (Section::DevDependencies, Section::Dependencies)
    )
}

/// Compare each direct dependency's own `dependencies` with the manifest under check.
pub fn check_direct_duplicate_dependencies(
    subject: &Manifest,
    is_library: bool,
    resolver: &dyn DependencyResolver,
    warn: &mut OnlyWarnsForMappingCheck,
) -> Result<Vec<Finding>, ResolveError> {
    let mut out = Vec::new();

    let names: BTreeSet<&str> = [Section::Dependencies, Section::DevDependencies]
        .into_iter()
        .flat_map(|s| subject.ranges(s).map(|(name, _)| name))
        .collect();

    for name in names {
        let dependency = match resolver.resolve(name) {
            Ok(manifest) => manifest,
            Err(ResolveError::NotFound(_)) => {
                out.push(unresolved(subject, ids::CHECK_DUPLICATE_DEPENDENCIES, name));
                continue;
            }
            Err(err) => return Err(err),
        };
        let mut scope = warn.create_for(name);
        out.extend(check_duplicate_dependencies(
            ids::CHECK_DUPLICATE_DEPENDENCIES,
            subject,
            is_library,
            Section::Dependencies,
            &DIRECT_SEARCH_IN,
            &dependency,
            &mut scope,
        ));
    }

    out.extend(report_not_warned_for_mapping(subject, warn));
    Ok(out)
}
