use crate::checks::utils::{draft, sections_joined, unresolved};
use crate::model::{Manifest, Section};
use crate::ports::{DependencyResolver, ResolveError};
use crate::range;
use crate::warn_policy::{OnlyWarnsForMappingCheck, WarnFor, report_not_warned_for_mapping};
use pkgguard_types::{Finding, ids};
use serde_json::json;
use std::rc::Rc;

/// Sections of the manifest under check allowed to provide a peer dependency, by the section
/// the dependent package is declared in.
pub fn allowed_peer_sections(dependent_section: Section, is_library: bool) -> &'static [Section] {
    use Section::{Dependencies, DevDependencies, OptionalDependencies, PeerDependencies};
    match (dependent_section, is_library) {
        (Dependencies, true) => &[Dependencies, PeerDependencies],
        (OptionalDependencies, true) => &[Dependencies, OptionalDependencies, PeerDependencies],
        _ => &[DevDependencies, Dependencies],
    }
}

/// What the peer requirements of one dependency are checked against.
pub struct PeerContext<'a> {
    /// Section of the manifest under check declaring the dependency.
    pub dependent_section: Section,
    pub allowed_sections: &'a [Section],
    /// The manifest under check re-exposes the dependency as its own peer.
    pub allow_missing: bool,
    /// `(name, range)` pairs declared in `dependencies` of the other direct dependencies.
    pub provided: &'a [(String, String)],
    pub dependency: &'a Manifest,
}

pub fn check_peer_dependencies(
    subject: &Manifest,
    ctx: &PeerContext<'_>,
    missing_warn: &mut dyn WarnFor,
    invalid_warn: &mut dyn WarnFor,
) -> Vec<Finding> {
    let mut out = Vec::new();
    let dependency = ctx.dependency;

    for (peer, required) in dependency.ranges(Section::PeerDependencies) {
        let found_in = subject.sections_declaring(peer, ctx.allowed_sections);

        if found_in.is_empty() {
            if ctx.allow_missing || dependency.is_optional_peer(peer) {
                continue;
            }

            let mut caveat = "";
            let providers: Vec<&str> = ctx
                .provided
                .iter()
                .filter(|(name, _)| name == peer)
                .map(|(_, range)| range.as_str())
                .collect();
            if !providers.is_empty() {
                if providers.iter().all(|r| range::intersects(r, required)) {
                    continue;
                }
                caveat = " (required as some dependencies have non-satisfying range too)";
            }

            out.push(
                draft(
                    ids::CHECK_PEER_DEPENDENCIES,
                    ids::CODE_MISSING_PEER,
                    format!(
                        "Missing \"{peer}\" peer dependency from \"{}\" in {}",
                        dependency.name, ctx.dependent_section
                    ),
                )
                .details(format!(
                    "it should satisfies \"{required}\" and be in {}{caveat}",
                    sections_joined(ctx.allowed_sections, " or ")
                ))
                .warn(missing_warn.should_warn_for(peer))
                .about(subject, peer)
                .data("required_by", json!(dependency.name))
                .data("expected", json!(required))
                .build(),
            );
            continue;
        }

        for section in found_in {
            let Some(declared) = subject.range(section, peer) else {
                continue;
            };
            if range::is_local_reference(declared) {
                continue;
            }
            let normalized = range::normalize(declared);
            if normalized == "*" {
                continue;
            }
            let satisfied = range::min_version(&normalized)
                .is_some_and(|min| range::satisfies(&min.to_string(), required));
            if satisfied {
                continue;
            }
            out.push(
                draft(
                    ids::CHECK_PEER_DEPENDENCIES,
                    ids::CODE_INVALID_PEER,
                    format!("Invalid \"{peer}\" peer dependency"),
                )
                .details(format!(
                    "\"{declared}\" (in {section}) should satisfies \"{required}\" from \"{}\" {}",
                    dependency.name, ctx.dependent_section
                ))
                .warn(invalid_warn.should_warn_for(peer))
                .on(subject, section, peer)
                .data("required_by", json!(dependency.name))
                .data("expected", json!(required))
                .build(),
            );
        }
    }

    out
}

/// Peer requirements of every direct dependency of the manifest under check.
pub fn check_direct_peer_dependencies(
    subject: &Manifest,
    is_library: bool,
    resolver: &dyn DependencyResolver,
    missing_warn: &mut OnlyWarnsForMappingCheck,
    invalid_warn: &mut OnlyWarnsForMappingCheck,
) -> Result<Vec<Finding>, ResolveError> {
    let mut out = Vec::new();
    let mut resolved: Vec<(Section, String, Rc<Manifest>)> = Vec::new();
    let mut provided: Vec<(String, String)> = Vec::new();

    for section in Section::DIRECT {
        for (name, _) in subject.ranges(section) {
            match resolver.resolve(name) {
                Ok(manifest) => {
                    provided.extend(
                        manifest
                            .ranges(Section::Dependencies)
                            .map(|(n, r)| (n.to_string(), r.to_string())),
                    );
                    resolved.push((section, name.to_string(), manifest));
                }
                Err(ResolveError::NotFound(_)) => {
                    out.push(unresolved(subject, ids::CHECK_PEER_DEPENDENCIES, name));
                }
                Err(err) => return Err(err),
            }
        }
    }

    for (section, name, dependency) in &resolved {
        if !dependency.has_section(Section::PeerDependencies) {
            continue;
        }

        let allow_missing = match (
            subject.range(*section, name),
            subject.range(Section::PeerDependencies, name),
        ) {
            (Some(declared), Some(as_peer)) => range::intersects(declared, as_peer),
            _ => false,
        };

        let ctx = PeerContext {
            dependent_section: *section,
            allowed_sections: allowed_peer_sections(*section, is_library),
            allow_missing,
            provided: &provided,
            dependency,
        };
        let mut missing = missing_warn.create_for(name);
        let mut invalid = invalid_warn.create_for(name);
        out.extend(check_peer_dependencies(
            subject,
            &ctx,
            &mut missing,
            &mut invalid,
        ));
    }

    out.extend(report_not_warned_for_mapping(subject, missing_warn));
    out.extend(report_not_warned_for_mapping(subject, invalid_warn));
    Ok(out)
}

/// Peers of a workspace member's dependencies must come from the root `devDependencies` when
/// the member does not declare them itself.
pub fn check_workspace_peer_dependencies(
    member: &Manifest,
    root: &Manifest,
    resolver: &dyn DependencyResolver,
) -> Result<Vec<Finding>, ResolveError> {
    let mut out = Vec::new();
    let own_sections = [
        Section::Dependencies,
        Section::DevDependencies,
        Section::PeerDependencies,
        Section::OptionalDependencies,
    ];

    for section in Section::DIRECT {
        for (name, _) in member.ranges(section) {
            let dependency = match resolver.resolve(name) {
                Ok(manifest) => manifest,
                // Already reported by the member's own peer check.
                Err(ResolveError::NotFound(_)) => continue,
                Err(err) => return Err(err),
            };

            for (peer, required) in dependency.ranges(Section::PeerDependencies) {
                if dependency.is_optional_peer(peer)
                    || !member.sections_declaring(peer, &own_sections).is_empty()
                {
                    continue;
                }

                match root.range(Section::DevDependencies, peer) {
                    None => out.push(
                        draft(
                            ids::CHECK_MONOREPO_PEER_DEPENDENCIES,
                            ids::CODE_MISSING_PEER,
                            format!(
                                "Missing \"{peer}\" peer dependency from \"{}\" in monorepo root",
                                dependency.name
                            ),
                        )
                        .details(format!(
                            "it should satisfies \"{required}\" and be in devDependencies of \"{}\"",
                            root.name
                        ))
                        .about(member, peer)
                        .data("required_by", json!(dependency.name))
                        .build(),
                    ),
                    Some(declared) => {
                        let satisfied = range::is_local_reference(declared)
                            || range::min_version(declared)
                                .is_some_and(|min| range::satisfies(&min.to_string(), required));
                        if !satisfied {
                            out.push(
                                draft(
                                    ids::CHECK_MONOREPO_PEER_DEPENDENCIES,
                                    ids::CODE_INVALID_PEER,
                                    format!("Invalid \"{peer}\" peer dependency in monorepo root"),
                                )
                                .details(format!(
                                    "\"{declared}\" (in devDependencies of \"{}\") should satisfies \"{required}\" from \"{}\"",
                                    root.name, dependency.name
                                ))
                                .about(member, peer)
                                .data("required_by", json!(dependency.name))
                                .build(),
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(out)
}
