//! `*_only_warns_for` configuration: names demoted from error to warning, with tracking of
//! entries that never demoted anything.

use crate::checks::utils::{draft, quoted_list};
use crate::model::Manifest;
use pkgguard_types::{Finding, ids};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Owner key matching every owner of a mapping.
pub const WILDCARD: &str = "*";

/// Decides whether a finding about `name` is only a warning.
///
/// Answering `true` marks the configured entry as used.
pub trait WarnFor {
    fn should_warn_for(&mut self, name: &str) -> bool;
}

/// Policy with nothing configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverWarn;

impl WarnFor for NeverWarn {
    fn should_warn_for(&mut self, _name: &str) -> bool {
        false
    }
}

/// Configured value: a flat list, or names keyed by the related dependency they apply to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OnlyWarnsFor {
    List(Vec<String>),
    Mapping(BTreeMap<String, Vec<String>>),
}

impl Default for OnlyWarnsFor {
    fn default() -> Self {
        OnlyWarnsFor::List(Vec::new())
    }
}

impl OnlyWarnsFor {
    pub fn is_empty(&self) -> bool {
        match self {
            OnlyWarnsFor::List(names) => names.is_empty(),
            OnlyWarnsFor::Mapping(map) => map.values().all(Vec::is_empty),
        }
    }

    /// A list is the mapping `{"*": list}`.
    fn into_mapping(self) -> BTreeMap<String, BTreeSet<String>> {
        match self {
            OnlyWarnsFor::List(names) => {
                let mut map = BTreeMap::new();
                if !names.is_empty() {
                    map.insert(WILDCARD.to_string(), names.into_iter().collect());
                }
                map
            }
            OnlyWarnsFor::Mapping(map) => map
                .into_iter()
                .map(|(owner, names)| (owner, names.into_iter().collect()))
                .collect(),
        }
    }
}

impl From<Vec<String>> for OnlyWarnsFor {
    fn from(value: Vec<String>) -> Self {
        OnlyWarnsFor::List(value)
    }
}

#[derive(Clone, Debug)]
pub struct OnlyWarnsForArrayCheck {
    config_name: String,
    names: BTreeSet<String>,
    not_warned: BTreeSet<String>,
}

impl OnlyWarnsForArrayCheck {
    pub fn new<I, S>(config_name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self {
            config_name: config_name.into(),
            not_warned: names.clone(),
            names,
        }
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// Configured names that have not demoted any finding yet, sorted.
    pub fn not_warned_for(&self) -> Vec<String> {
        self.not_warned.iter().cloned().collect()
    }
}

impl WarnFor for OnlyWarnsForArrayCheck {
    fn should_warn_for(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            self.not_warned.remove(name);
            true
        } else {
            false
        }
    }
}

#[derive(Clone, Debug)]
pub struct OnlyWarnsForMappingCheck {
    config_name: String,
    mapping: BTreeMap<String, BTreeSet<String>>,
    not_warned: BTreeMap<String, BTreeSet<String>>,
}

impl OnlyWarnsForMappingCheck {
    pub fn new(config_name: impl Into<String>, config: OnlyWarnsFor) -> Self {
        let mapping = config.into_mapping();
        Self {
            config_name: config_name.into(),
            not_warned: mapping.clone(),
            mapping,
        }
    }

    pub fn config_name(&self) -> &str {
        &self.config_name
    }

    /// Scope narrowed to one owner, sharing this check's tracking state.
    pub fn create_for(&mut self, owner: &str) -> OnlyWarnsForScope<'_> {
        OnlyWarnsForScope {
            check: self,
            owner: owner.to_string(),
        }
    }

    /// Owner -> configured names not used yet. Owners with nothing left are omitted.
    pub fn not_warned_for(&self) -> BTreeMap<String, Vec<String>> {
        self.not_warned
            .iter()
            .filter(|(_, names)| !names.is_empty())
            .map(|(owner, names)| (owner.clone(), names.iter().cloned().collect()))
            .collect()
    }

    fn hit(&mut self, owner: &str, name: &str) -> bool {
        if !self
            .mapping
            .get(owner)
            .is_some_and(|names| names.contains(name))
        {
            return false;
        }
        if let Some(names) = self.not_warned.get_mut(owner) {
            names.remove(name);
        }
        true
    }
}

pub struct OnlyWarnsForScope<'a> {
    check: &'a mut OnlyWarnsForMappingCheck,
    owner: String,
}

impl WarnFor for OnlyWarnsForScope<'_> {
    fn should_warn_for(&mut self, name: &str) -> bool {
        self.check.hit(WILDCARD, name) || self.check.hit(&self.owner, name)
    }
}

/// Stale entries of a flat policy, reported on `manifest`.
pub fn report_not_warned_for(manifest: &Manifest, check: &OnlyWarnsForArrayCheck) -> Vec<Finding> {
    let remaining = check.not_warned_for();
    if remaining.is_empty() {
        return Vec::new();
    }
    vec![stale_config(manifest, check.config_name(), None, &remaining)]
}

/// Stale entries of a mapping policy, one finding per owner.
pub fn report_not_warned_for_mapping(
    manifest: &Manifest,
    check: &OnlyWarnsForMappingCheck,
) -> Vec<Finding> {
    check
        .not_warned_for()
        .iter()
        .map(|(owner, names)| {
            let owner = (owner != WILDCARD).then_some(owner.as_str());
            stale_config(manifest, check.config_name(), owner, names)
        })
        .collect()
}

fn stale_config(
    manifest: &Manifest,
    config_name: &str,
    owner: Option<&str>,
    names: &[String],
) -> Finding {
    let message = match owner {
        Some(owner) => format!("Invalid config in \"{config_name}\" for \"{owner}\""),
        None => format!("Invalid config in \"{config_name}\""),
    };
    draft(ids::CHECK_CONFIG, ids::CODE_UNUSED_ONLY_WARNS_FOR, message)
        .details(format!(
            "no warning was raised for {}",
            quoted_list(names.iter().map(String::as_str))
        ))
        .at(manifest)
        .data("config", serde_json::json!(config_name))
        .data("names", serde_json::json!(names))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgguard_types::RepoPath;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn array_check_tracks_used_entries() {
        let mut check = OnlyWarnsForArrayCheck::new("cfg", ["a", "b"]);
        assert!(check.should_warn_for("a"));
        assert_eq!(check.not_warned_for(), names(&["b"]));

        assert!(check.should_warn_for("b"));
        assert!(check.not_warned_for().is_empty());

        assert!(!check.should_warn_for("c"));
    }

    #[test]
    fn array_check_keeps_warning_after_first_hit() {
        let mut check = OnlyWarnsForArrayCheck::new("cfg", ["a"]);
        assert!(check.should_warn_for("a"));
        assert!(check.should_warn_for("a"));
    }

    #[test]
    fn mapping_scope_consults_wildcard_then_owner() {
        let mut map = BTreeMap::new();
        map.insert("*".to_string(), names(&["everywhere"]));
        map.insert("rollup".to_string(), names(&["tslib", "acorn"]));
        let mut check = OnlyWarnsForMappingCheck::new("cfg", OnlyWarnsFor::Mapping(map));

        {
            let mut scope = check.create_for("rollup");
            assert!(scope.should_warn_for("everywhere"));
            assert!(scope.should_warn_for("tslib"));
        }
        {
            let mut scope = check.create_for("webpack");
            assert!(!scope.should_warn_for("acorn"));
        }

        let remaining = check.not_warned_for();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining["rollup"], names(&["acorn"]));
    }

    #[test]
    fn list_config_applies_to_every_owner() {
        let mut check =
            OnlyWarnsForMappingCheck::new("cfg", OnlyWarnsFor::List(names(&["tslib"])));
        assert!(check.create_for("anything").should_warn_for("tslib"));
        assert!(check.not_warned_for().is_empty());
    }

    #[test]
    fn only_warns_for_deserializes_both_shapes() {
        let list: OnlyWarnsFor = serde_json::from_str(r#"["a"]"#).expect("list");
        assert_eq!(list, OnlyWarnsFor::List(names(&["a"])));

        let mapping: OnlyWarnsFor = serde_json::from_str(r#"{"*": ["a"]}"#).expect("map");
        assert!(matches!(mapping, OnlyWarnsFor::Mapping(_)));
    }

    #[test]
    fn stale_entries_become_findings() {
        let manifest = Manifest::new("pkg", RepoPath::default());
        let check = OnlyWarnsForArrayCheck::new("exactVersionsOnlyWarnsFor", ["a", "b"]);
        let findings = report_not_warned_for(&manifest, &check);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message,
            "Invalid config in \"exactVersionsOnlyWarnsFor\""
        );
        assert_eq!(
            findings[0].details.as_deref(),
            Some("no warning was raised for \"a\", \"b\"")
        );

        let mut map = BTreeMap::new();
        map.insert("rollup".to_string(), names(&["tslib"]));
        let mapping = OnlyWarnsForMappingCheck::new("cfg", OnlyWarnsFor::Mapping(map));
        let findings = report_not_warned_for_mapping(&manifest, &mapping);
        assert_eq!(findings[0].message, "Invalid config in \"cfg\" for \"rollup\"");
    }
}
