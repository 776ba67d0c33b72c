//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Range matching, intersection and minimum versions
//! - Local references never producing duplicate findings
//! - Autofix reaching a fixed point

use crate::checks::{
    DIRECT_SEARCH_IN, ExactVersionsOptions, check_duplicate_dependencies, check_exact_versions,
    check_min_range_satisfies,
};
use crate::model::{Manifest, Section};
use crate::range;
use crate::test_support::{MapResolver, app, installed, library};
use crate::warn_policy::{NeverWarn, OnlyWarnsForArrayCheck};
use pkgguard_types::ids;
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for npm package names, scoped or not.
fn arb_dep_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-z][a-z0-9-]{0,15}").unwrap(),
        (
            prop::string::string_regex("[a-z][a-z0-9]{0,7}").unwrap(),
            prop::string::string_regex("[a-z][a-z0-9-]{0,7}").unwrap(),
        )
            .prop_map(|(scope, name)| format!("@{scope}/{name}")),
    ]
}

fn arb_version() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0u64..20, 0u64..20, 0u64..20)
            .prop_map(|(major, minor, patch)| format!("{major}.{minor}.{patch}")),
        1 => (0u64..20, 0u64..20, 0u64..20, 0u32..5)
            .prop_map(|(major, minor, patch, pre)| format!("{major}.{minor}.{patch}-beta.{pre}")),
    ]
}

/// Single-comparator ranges with a lower bound.
fn arb_bounded_range() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("^"), Just("~"), Just(">="), Just("=")],
        arb_version(),
    )
        .prop_map(|(op, version)| format!("{op}{version}"))
}

/// Any range the comparator understands, including unions and partials.
fn arb_range() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_bounded_range(),
        1 => (0u64..20).prop_map(|major| format!("^{major}")),
        1 => (0u64..20, 0u64..20).prop_map(|(major, minor)| format!("~{major}.{minor}")),
        1 => (0u64..20).prop_map(|major| format!("{major}.x")),
        1 => (arb_bounded_range(), arb_bounded_range()).prop_map(|(a, b)| format!("{a} || {b}")),
        1 => (arb_version(), arb_version()).prop_map(|(a, b)| format!("{a} - {b}")),
        1 => Just("*".to_string()),
    ]
}

fn arb_local_reference() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_dep_name().prop_map(|name| format!("file:../{name}")),
        arb_dep_name().prop_map(|name| format!("link:../{name}")),
        arb_dep_name().prop_map(|name| format!("portal:../{name}")),
        Just("workspace:*".to_string()),
        arb_bounded_range().prop_map(|r| format!("workspace:{r}")),
    ]
}

fn arb_section() -> impl Strategy<Value = Section> {
    prop_oneof![Just(Section::Dependencies), Just(Section::DevDependencies)]
}

// ============================================================================
// Property tests: range comparator
// ============================================================================

proptest! {
    /// A version always satisfies itself as an exact range.
    #[test]
    fn exact_version_satisfies_itself(version in arb_version()) {
        prop_assert!(range::satisfies(&version, &version));
        prop_assert!(range::is_exact_version(&version));
        prop_assert!(!range::has_range_operator(&version));
    }

    /// The minimum version of a range is inside the range.
    #[test]
    fn min_version_satisfies_its_range(r in arb_range()) {
        if let Some(min) = range::min_version(&r) {
            prop_assert!(
                range::satisfies(&min.to_string(), &r),
                "{} is not in {}", min, r
            );
        }
    }

    /// Bounded single comparators always have a minimum.
    #[test]
    fn bounded_ranges_have_a_minimum(r in arb_bounded_range()) {
        prop_assert!(range::min_version(&r).is_some(), "no minimum for {}", r);
    }

    #[test]
    fn intersects_is_symmetric(a in arb_range(), b in arb_range()) {
        prop_assert_eq!(range::intersects(&a, &b), range::intersects(&b, &a));
    }

    /// A range intersects every range its own minimum satisfies.
    #[test]
    fn satisfying_min_implies_intersection(a in arb_range(), b in arb_range()) {
        if let Some(min) = range::min_version(&a)
            && range::satisfies(&min.to_string(), &b)
        {
            prop_assert!(range::intersects(&a, &b), "{} and {} should intersect", a, b);
        }
    }

    /// A prerelease inside `^M.m.p` is also inside the wider `^M.m` and `^M`.
    #[test]
    fn prereleases_stay_inside_wider_partials(
        (major, minor, patch) in (0u64..20, 0u64..20, 0u64..20),
        pre in prop_oneof![Just("alpha.1"), Just("beta.0"), Just("rc.3"), Just("0")],
    ) {
        let version = format!("{major}.{minor}.{patch}-{pre}");
        if range::satisfies(&version, &format!("^{major}.{minor}.{patch}")) {
            for wider in [format!("^{major}.{minor}"), format!("^{major}")] {
                prop_assert!(range::satisfies(&version, &wider), "{} not in {}", version, wider);
            }
        }
        // A prerelease of the first version in an incomplete range is still inside it.
        let first = format!("{major}.{minor}.0-{pre}");
        for wider in [format!("~{major}.{minor}"), format!(">={major}.{minor}")] {
            prop_assert!(range::satisfies(&first, &wider), "{} not in {}", first, wider);
        }
    }

    /// Build metadata never changes matching.
    #[test]
    fn build_metadata_is_ignored(version in arb_version(), r in arb_range()) {
        let with_build = format!("{version}+build.7");
        prop_assert_eq!(range::satisfies(&version, &r), range::satisfies(&with_build, &r));
    }

    /// Rewriting with the operator a range already has is the identity on full versions.
    #[test]
    fn with_operator_roundtrips_own_operator(r in arb_bounded_range()) {
        let normalized = range::normalize(&r).into_owned();
        if let Some(op) = range::get_operator(&r) {
            let rewritten = range::with_operator(&r, op).unwrap_or_default();
            prop_assert_eq!(range::get_operator(&rewritten), Some(op));
            prop_assert_eq!(range::min_version(&rewritten), range::min_version(&normalized));
        }
    }
}

// ============================================================================
// Property tests: rules
// ============================================================================

proptest! {
    /// Local references are never compared, whichever side they are on.
    #[test]
    fn local_references_emit_no_duplicate(
        name in arb_dep_name(),
        local in arb_local_reference(),
        other in arb_range(),
        section in arb_section(),
        local_in_subject in any::<bool>(),
    ) {
        let (declared, related_range) = if local_in_subject {
            (local.as_str(), other.as_str())
        } else {
            (other.as_str(), local.as_str())
        };
        let subject = app("pkg").with(section, &name, declared);
        let related =
            installed("related", "1.0.0").with(Section::Dependencies, &name, related_range);

        let out = check_duplicate_dependencies(
            ids::CHECK_DUPLICATE_DEPENDENCIES,
            &subject,
            false,
            Section::Dependencies,
            &DIRECT_SEARCH_IN,
            &related,
            &mut NeverWarn,
        );
        prop_assert!(out.is_empty(), "{:?}", out);
    }

    /// After one autofix pass, exact-version rules report nothing and change nothing.
    #[test]
    fn exact_versions_autofix_reaches_fixed_point(
        name in arb_dep_name(),
        version in arb_version(),
        op in prop_oneof![Just("^"), Just("~"), Just(">=")],
    ) {
        let declared = format!("{op}{version}");
        let mut subject = app("pkg").with(Section::DevDependencies, &name, &declared);
        let resolver = MapResolver::new().with(installed(&name, &version));
        let ignore = BTreeSet::new();
        let options = ExactVersionsOptions {
            sections: &[Section::DevDependencies],
            ignore: &ignore,
            autofix: true,
        };

        let first = check_exact_versions(
            &mut subject,
            &options,
            Some(&resolver),
            &mut OnlyWarnsForArrayCheck::new("cfg", Vec::<String>::new()),
        );
        prop_assert!(first.map(|f| f.is_empty()).unwrap_or(false));
        prop_assert_eq!(subject.range(Section::DevDependencies, &name), Some(version.as_str()));

        let snapshot: Manifest = subject.clone();
        let second = check_exact_versions(
            &mut subject,
            &options,
            Some(&resolver),
            &mut OnlyWarnsForArrayCheck::new("cfg", Vec::<String>::new()),
        );
        prop_assert!(second.map(|f| f.is_empty()).unwrap_or(false));
        prop_assert_eq!(subject, snapshot);
    }

    /// The min-range fix always produces a range whose minimum satisfies the other section.
    #[test]
    fn min_range_fix_satisfies_other_section(
        name in arb_dep_name(),
        a in arb_bounded_range(),
        b in arb_version(),
    ) {
        let mut subject = library("pkg")
            .with(Section::Dependencies, &name, &a)
            .with(Section::DevDependencies, &name, &b);
        check_min_range_satisfies(
            &mut subject,
            Section::Dependencies,
            Section::DevDependencies,
            true,
        );

        let fixed = subject.range(Section::Dependencies, &name).unwrap_or_default().to_string();
        let min = range::min_version(&fixed);
        prop_assert!(
            min.is_some_and(|m| range::satisfies(&m.to_string(), &b)),
            "{} -> {} does not reach {}", a, fixed, b
        );
    }
}
