//! Config parsing and resolution into check options.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{
    ChecksConfig, IdenticalVersionsConfig, OnlyWarnsForConfig, PkgguardConfigV1,
    RecommendedConfig, SatisfiesVersionsConfig, SatisfiesVersionsFromDependencyConfig,
    WorkspaceConfig,
};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `pkgguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<PkgguardConfigV1> {
    let cfg: PkgguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the options the orchestrators run with (config file + command-line overrides).
pub fn resolve_config(
    cfg: PkgguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    Ok(resolve::resolve_config(cfg, overrides)?)
}

/// JSON schema of `pkgguard.toml`.
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(PkgguardConfigV1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgguard_domain::{ConfigError, ExtraCheck, OnlyWarnsFor, RecommendedOptions, Section};
    use std::collections::BTreeMap;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let cfg = parse_config_toml("").expect("parse");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");

        assert_eq!(resolved.library, None);
        assert!(!resolved.fix);
        assert_eq!(resolved.workspace, None);
        assert_eq!(resolved.recommended, RecommendedOptions::default());
        assert!(resolved.extra_checks.is_empty());
    }

    #[test]
    fn recommended_options_and_overrides() {
        let cfg = parse_config_toml(
            r#"
library = true
fix = false

[recommended]
allow_range_versions_in_dependencies = true
exact_versions_only_warns_for = ["typescript"]
resolutions_explanation_min_length = 20
direct_duplicate_dependencies_only_warns_for = ["semver"]

[recommended.peer_dependencies_missing_only_warns_for]
"@babel/core" = ["@babel/runtime"]

[workspace]
enabled = true
monorepo_direct_duplicate_dependencies_only_warns_for = ["react"]
"#,
        )
        .expect("parse");

        let resolved = resolve_config(
            cfg,
            Overrides {
                fix: Some(true),
                library: Some(false),
                workspace: None,
            },
        )
        .expect("resolve");

        assert_eq!(resolved.library, Some(false));
        assert!(resolved.fix);
        assert_eq!(resolved.workspace, Some(true));
        let rec = &resolved.recommended;
        assert!(rec.allow_range_versions_in_dependencies);
        assert_eq!(rec.exact_versions_only_warns_for, vec!["typescript".to_string()]);
        assert_eq!(rec.resolutions_explanation_min_length, Some(20));
        assert_eq!(
            rec.direct_duplicate_dependencies_only_warns_for,
            OnlyWarnsFor::List(vec!["semver".to_string()])
        );
        let mut mapping = BTreeMap::new();
        mapping.insert("@babel/core".to_string(), vec!["@babel/runtime".to_string()]);
        assert_eq!(
            rec.peer_dependencies_missing_only_warns_for,
            OnlyWarnsFor::Mapping(mapping)
        );
        assert_eq!(
            resolved
                .monorepo
                .monorepo_direct_duplicate_dependencies_only_warns_for,
            OnlyWarnsFor::List(vec!["react".to_string()])
        );
    }

    #[test]
    fn extra_checks_are_validated() {
        let cfg = parse_config_toml(
            r#"
[[checks.identical_versions]]
section = "devDependencies"
groups = { "@babel/core" = ["@babel/preset-env"] }

[[checks.satisfies_versions_from_dependency]]
dependency = "@company/preset"
section = "devDependencies"
names = ["eslint"]
"#,
        )
        .expect("parse");
        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");
        assert_eq!(resolved.extra_checks.len(), 2);
        assert!(matches!(
            &resolved.extra_checks[1],
            ExtraCheck::SatisfiesVersionsFromDependency {
                dependency_section: Section::Dependencies,
                section: Section::DevDependencies,
                ..
            }
        ));

        let cfg = parse_config_toml(
            r#"
[[checks.identical_versions]]
section = "devDependencies"
groups = { "@babel/core" = [] }
"#,
        )
        .expect("parse");
        let err = resolve_config(cfg, Overrides::default()).expect_err("empty group");
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidOptions { .. })
        ));

        let cfg = parse_config_toml(
            r#"
[[checks.satisfies_versions]]
section = "bundledDependencies"
versions = { react = "^18.0.0" }
"#,
        )
        .expect("parse");
        let err = resolve_config(cfg, Overrides::default()).expect_err("unknown section");
        assert!(err.to_string().contains("unknown section \"bundledDependencies\""));
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(parse_config_toml("library = ").is_err());
        assert!(parse_config_toml("[recommended]\nexact_versions_only_warns_for = 3").is_err());
    }

    #[test]
    fn schema_describes_recommended_options() {
        let schema = serde_json::to_string(&config_schema()).expect("serialize schema");
        assert!(schema.contains("allow_range_versions_in_dependencies"));
        assert!(schema.contains("monorepo_direct_duplicate_dependencies_only_warns_for"));
    }
}
