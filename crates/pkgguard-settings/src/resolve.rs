use crate::model::{ChecksConfig, OnlyWarnsForConfig, PkgguardConfigV1};
use pkgguard_domain::{
    ConfigError, ExtraCheck, OnlyWarnsFor, RecommendedOptions, Section, WorkspaceOptions,
};
use pkgguard_types::ids;

/// Command-line values that win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub library: Option<bool>,
    pub fix: Option<bool>,
    pub workspace: Option<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    /// `None` lets the manifest decide (`!private`).
    pub library: Option<bool>,
    pub fix: bool,
    /// `None` checks as a monorepo when the root declares `workspaces`.
    pub workspace: Option<bool>,
    pub recommended: RecommendedOptions,
    pub monorepo: WorkspaceOptions,
    pub extra_checks: Vec<ExtraCheck>,
}

pub fn resolve_config(
    cfg: PkgguardConfigV1,
    overrides: Overrides,
) -> Result<ResolvedConfig, ConfigError> {
    let rec = cfg.recommended;
    let recommended = RecommendedOptions {
        allow_range_versions_in_dependencies: rec
            .allow_range_versions_in_dependencies
            .unwrap_or(false),
        exact_versions_only_warns_for: rec.exact_versions_only_warns_for,
        internal_exact_versions_ignore: rec.internal_exact_versions_ignore,
        direct_duplicate_dependencies_only_warns_for: only_warns_for(
            rec.direct_duplicate_dependencies_only_warns_for,
        ),
        peer_dependencies_missing_only_warns_for: only_warns_for(
            rec.peer_dependencies_missing_only_warns_for,
        ),
        peer_dependencies_invalid_only_warns_for: only_warns_for(
            rec.peer_dependencies_invalid_only_warns_for,
        ),
        resolutions_explanation_min_length: rec.resolutions_explanation_min_length,
    };

    let monorepo = WorkspaceOptions {
        monorepo_direct_duplicate_dependencies_only_warns_for: only_warns_for(
            cfg.workspace.monorepo_direct_duplicate_dependencies_only_warns_for,
        ),
    };

    Ok(ResolvedConfig {
        library: overrides.library.or(cfg.library),
        fix: overrides.fix.or(cfg.fix).unwrap_or(false),
        workspace: overrides.workspace.or(cfg.workspace.enabled),
        recommended,
        monorepo,
        extra_checks: extra_checks(cfg.checks)?,
    })
}

fn only_warns_for(value: OnlyWarnsForConfig) -> OnlyWarnsFor {
    match value {
        OnlyWarnsForConfig::List(names) => OnlyWarnsFor::List(names),
        OnlyWarnsForConfig::Mapping(map) => OnlyWarnsFor::Mapping(map),
    }
}

fn extra_checks(checks: ChecksConfig) -> Result<Vec<ExtraCheck>, ConfigError> {
    let mut out = Vec::new();

    for c in checks.satisfies_versions {
        if c.versions.is_empty() {
            return Err(ConfigError::invalid_options(
                ids::CHECK_SATISFIES_VERSIONS,
                "versions must not be empty",
            ));
        }
        out.push(ExtraCheck::SatisfiesVersions {
            section: parse_section(ids::CHECK_SATISFIES_VERSIONS, &c.section)?,
            versions: c.versions,
        });
    }

    for c in checks.identical_versions {
        if c.groups.is_empty() {
            return Err(ConfigError::invalid_options(
                ids::CHECK_IDENTICAL_VERSIONS,
                "groups must not be empty",
            ));
        }
        if let Some((anchor, _)) = c.groups.iter().find(|(_, names)| names.is_empty()) {
            return Err(ConfigError::invalid_options(
                ids::CHECK_IDENTICAL_VERSIONS,
                format!("group \"{anchor}\" has no names"),
            ));
        }
        out.push(ExtraCheck::IdenticalVersions {
            section: parse_section(ids::CHECK_IDENTICAL_VERSIONS, &c.section)?,
            groups: c.groups,
            only_warns_for: c.only_warns_for,
        });
    }

    for c in checks.satisfies_versions_from_dependency {
        if c.names.is_empty() {
            return Err(ConfigError::invalid_options(
                ids::CHECK_SATISFIES_VERSIONS,
                format!("names for \"{}\" must not be empty", c.dependency),
            ));
        }
        out.push(ExtraCheck::SatisfiesVersionsFromDependency {
            dependency_section: parse_section(
                ids::CHECK_SATISFIES_VERSIONS,
                &c.dependency_section,
            )?,
            section: parse_section(ids::CHECK_SATISFIES_VERSIONS, &c.section)?,
            dependency: c.dependency,
            names: c.names,
        });
    }

    Ok(out)
}

fn parse_section(check: &'static str, key: &str) -> Result<Section, ConfigError> {
    Section::from_key(key).ok_or_else(|| {
        ConfigError::invalid_options(check, format!("unknown section \"{key}\""))
    })
}
