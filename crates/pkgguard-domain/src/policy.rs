use crate::model::Section;
use crate::warn_policy::OnlyWarnsFor;
use std::collections::BTreeMap;

/// Options of the recommended check set for one package.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecommendedOptions {
    /// Libraries may keep ranges in `dependencies`; only `devDependencies` must be pinned.
    pub allow_range_versions_in_dependencies: bool,
    pub exact_versions_only_warns_for: Vec<String>,
    /// Never reported by the exact-versions rule (workspace members are added automatically).
    pub internal_exact_versions_ignore: Vec<String>,
    pub direct_duplicate_dependencies_only_warns_for: OnlyWarnsFor,
    pub peer_dependencies_missing_only_warns_for: OnlyWarnsFor,
    pub peer_dependencies_invalid_only_warns_for: OnlyWarnsFor,
    /// Minimum length of each `resolutionsExplained` entry, unchecked when `None`.
    pub resolutions_explanation_min_length: Option<usize>,
}

impl RecommendedOptions {
    /// Whether ranges of `section` are expected to be exact versions.
    pub fn should_have_exact_versions(&self, section: Section, is_library: bool) -> bool {
        match section {
            Section::DevDependencies => true,
            Section::Dependencies => !(is_library && self.allow_range_versions_in_dependencies),
            _ => false,
        }
    }

    /// Sections the exact-versions rule looks at.
    pub fn exact_version_sections(&self, is_library: bool) -> &'static [Section] {
        if is_library && self.allow_range_versions_in_dependencies {
            &[Section::DevDependencies]
        } else {
            &[Section::Dependencies, Section::DevDependencies]
        }
    }
}

/// Options that only make sense across the members of a monorepo.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceOptions {
    pub monorepo_direct_duplicate_dependencies_only_warns_for: OnlyWarnsFor,
}

/// Optional checks configured on top of the recommended set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtraCheck {
    SatisfiesVersions {
        section: Section,
        versions: BTreeMap<String, String>,
    },
    IdenticalVersions {
        section: Section,
        groups: BTreeMap<String, Vec<String>>,
        only_warns_for: Vec<String>,
    },
    SatisfiesVersionsFromDependency {
        dependency: String,
        dependency_section: Section,
        section: Section,
        names: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn libraries_may_opt_out_of_pinning_dependencies() {
        let strict = RecommendedOptions::default();
        let relaxed = RecommendedOptions {
            allow_range_versions_in_dependencies: true,
            ..RecommendedOptions::default()
        };

        assert!(strict.should_have_exact_versions(Section::Dependencies, true));
        assert!(!relaxed.should_have_exact_versions(Section::Dependencies, true));
        assert!(relaxed.should_have_exact_versions(Section::Dependencies, false));
        assert!(relaxed.should_have_exact_versions(Section::DevDependencies, true));
        assert!(!strict.should_have_exact_versions(Section::PeerDependencies, false));

        assert_eq!(relaxed.exact_version_sections(true), &[Section::DevDependencies]);
        assert_eq!(
            relaxed.exact_version_sections(false),
            &[Section::Dependencies, Section::DevDependencies]
        );
    }
}
