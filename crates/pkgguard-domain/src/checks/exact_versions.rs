use crate::checks::utils::draft;
use crate::model::{Manifest, Section};
use crate::ports::{DependencyResolver, ResolveError};
use crate::range;
use crate::warn_policy::{OnlyWarnsForArrayCheck, WarnFor, report_not_warned_for};
use pkgguard_types::{Finding, ids};
use serde_json::json;
use std::collections::BTreeSet;

pub struct ExactVersionsOptions<'a> {
    pub sections: &'a [Section],
    /// Never reported, e.g. packages of the same workspace.
    pub ignore: &'a BTreeSet<String>,
    pub autofix: bool,
}

/// Ranges in `sections` must be exact versions.
///
/// With a resolver, the suggested pin is the installed version; without one it is derived
/// from the range itself.
pub fn check_exact_versions(
    subject: &mut Manifest,
    options: &ExactVersionsOptions<'_>,
    resolver: Option<&dyn DependencyResolver>,
    warn: &mut OnlyWarnsForArrayCheck,
) -> Result<Vec<Finding>, ResolveError> {
    let mut out = Vec::new();

    for &section in options.sections {
        let declared: Vec<(String, String)> = subject
            .ranges(section)
            .map(|(name, range)| (name.to_string(), range.to_string()))
            .collect();

        for (name, raw) in declared {
            if !range::has_range_operator(&raw) || options.ignore.contains(&name) {
                continue;
            }
            let version = range::normalize(&raw).into_owned();
            let message = format!("Unexpected range dependency in \"{section}\" for \"{name}\"");

            if warn.should_warn_for(&name) {
                out.push(
                    draft(ids::CHECK_EXACT_VERSIONS, ids::CODE_RANGE_NOT_EXACT, message)
                        .details(format!("expecting \"{version}\" to be exact"))
                        .warn(true)
                        .on(subject, section, &name)
                        .build(),
                );
                continue;
            }

            let Some(resolver) = resolver else {
                let exact = range::exact_from_range(&version);
                out.push(
                    draft(ids::CHECK_EXACT_VERSIONS, ids::CODE_RANGE_NOT_EXACT, message)
                        .details(format!("expecting \"{version}\" to be exact \"{exact}\"."))
                        .fix(Some(with_alias_prefix(&raw, &exact)))
                        .on(subject, section, &name)
                        .build(),
                );
                continue;
            };

            let resolved = match resolver.resolve(&name) {
                Ok(manifest) => manifest.version.clone(),
                Err(ResolveError::NotFound(_)) => None,
                Err(err) => return Err(err),
            };

            let Some(resolved) = resolved else {
                out.push(
                    draft(ids::CHECK_EXACT_VERSIONS, ids::CODE_RANGE_NOT_EXACT, message)
                        .details(format!(
                            "expecting \"{version}\" to be exact, autofix failed to resolve \"{name}\"."
                        ))
                        .on(subject, section, &name)
                        .build(),
                );
                continue;
            };

            if !range::satisfies(&resolved, &version) {
                out.push(
                    draft(ids::CHECK_EXACT_VERSIONS, ids::CODE_RANGE_NOT_EXACT, message)
                        .details(format!(
                            "expecting \"{version}\" to be exact, autofix failed as \"{name}\"'s resolved version is \"{resolved}\" and doesn't satisfies \"{version}\"."
                        ))
                        .on(subject, section, &name)
                        .data("resolved", json!(resolved))
                        .build(),
                );
                continue;
            }

            let pinned = with_alias_prefix(&raw, &resolved);
            if options.autofix {
                subject.set_range(section, &name, pinned);
                continue;
            }
            out.push(
                draft(ids::CHECK_EXACT_VERSIONS, ids::CODE_RANGE_NOT_EXACT, message)
                    .details(format!("expecting \"{version}\" to be exact \"{resolved}\"."))
                    .fix(Some(pinned))
                    .on(subject, section, &name)
                    .build(),
            );
        }
    }

    out.extend(report_not_warned_for(subject, warn));
    Ok(out)
}

/// Keep an `npm:<name>@` alias in front of the pinned version.
fn with_alias_prefix(raw: &str, version: &str) -> String {
    match raw.trim().strip_prefix("npm:") {
        Some(alias) => match alias.get(1..).and_then(|rest| rest.find('@')) {
            Some(at) => format!("npm:{}@{version}", &alias[..at + 1]),
            None => version.to_string(),
        },
        None => version.to_string(),
    }
}
