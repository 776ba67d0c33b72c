//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after manifest examples.
    pub examples: ExamplePair,
}

/// Before and after manifest examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Manifest that would trigger a finding.
    pub before: &'static str,
    /// Manifest that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_EXACT_VERSIONS => Some(explain_exact_versions()),
        ids::CHECK_DUPLICATE_DEPENDENCIES => Some(explain_duplicate_dependencies()),
        ids::CHECK_PEER_DEPENDENCIES => Some(explain_peer_dependencies()),
        ids::CHECK_MIN_RANGE => Some(explain_min_range()),
        ids::CHECK_RESOLUTIONS_MATCH => Some(explain_resolutions_match()),
        ids::CHECK_RESOLUTIONS_EXPLANATION => Some(explain_resolutions_explanation()),
        ids::CHECK_IDENTICAL_VERSIONS => Some(explain_identical_versions()),
        ids::CHECK_SATISFIES_VERSIONS => Some(explain_satisfies_versions()),
        ids::CHECK_NO_DEPENDENCIES => Some(explain_no_dependencies()),
        ids::CHECK_MONOREPO_DUPLICATES => Some(explain_monorepo_duplicates()),
        ids::CHECK_MONOREPO_PEER_DEPENDENCIES => Some(explain_monorepo_peers()),
        ids::CHECK_CONFIG => Some(explain_only_warns_for()),

        // Codes
        ids::CODE_RANGE_NOT_EXACT => Some(explain_exact_versions()),
        ids::CODE_DUPLICATE_SECTIONS => Some(retitle(
            explain_duplicate_dependencies(),
            "Dependency Present In Multiple Sections",
        )),
        ids::CODE_SAME_VERSION_IN_SECTIONS => Some(explain_same_version_in_sections()),
        ids::CODE_DUPLICATE_UNSATISFIED => Some(explain_duplicate_dependencies()),
        ids::CODE_MISSING_PEER => Some(retitle(
            explain_peer_dependencies(),
            "Missing Peer Dependency",
        )),
        ids::CODE_INVALID_PEER => Some(retitle(
            explain_peer_dependencies(),
            "Invalid Peer Dependency Version",
        )),
        ids::CODE_RESOLUTION_MISMATCH => Some(explain_resolutions_match()),
        ids::CODE_MISSING_EXPLANATION
        | ids::CODE_INVALID_EXPLANATION
        | ids::CODE_ORPHAN_EXPLANATION => Some(explain_resolutions_explanation()),
        ids::CODE_MIN_RANGE_UNSATISFIED => Some(explain_min_range()),
        ids::CODE_MISSING_DEPENDENCY
        | ids::CODE_INVALID_RANGE
        | ids::CODE_UNEXPECTED_DEPENDENCY
        | ids::CODE_UNSUPPORTED_RANGE => Some(explain_satisfies_versions()),
        ids::CODE_UNRESOLVED_DEPENDENCY => Some(explain_unresolved_dependency()),
        ids::CODE_UNEXPECTED_SECTION => Some(explain_no_dependencies()),
        ids::CODE_UNUSED_ONLY_WARNS_FOR => Some(explain_only_warns_for()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_EXACT_VERSIONS,
        ids::CHECK_DUPLICATE_DEPENDENCIES,
        ids::CHECK_PEER_DEPENDENCIES,
        ids::CHECK_MIN_RANGE,
        ids::CHECK_RESOLUTIONS_MATCH,
        ids::CHECK_RESOLUTIONS_EXPLANATION,
        ids::CHECK_IDENTICAL_VERSIONS,
        ids::CHECK_SATISFIES_VERSIONS,
        ids::CHECK_NO_DEPENDENCIES,
        ids::CHECK_MONOREPO_DUPLICATES,
        ids::CHECK_MONOREPO_PEER_DEPENDENCIES,
        ids::CHECK_CONFIG,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_RANGE_NOT_EXACT,
        ids::CODE_DUPLICATE_SECTIONS,
        ids::CODE_SAME_VERSION_IN_SECTIONS,
        ids::CODE_DUPLICATE_UNSATISFIED,
        ids::CODE_MISSING_PEER,
        ids::CODE_INVALID_PEER,
        ids::CODE_RESOLUTION_MISMATCH,
        ids::CODE_MISSING_EXPLANATION,
        ids::CODE_INVALID_EXPLANATION,
        ids::CODE_ORPHAN_EXPLANATION,
        ids::CODE_MIN_RANGE_UNSATISFIED,
        ids::CODE_MISSING_DEPENDENCY,
        ids::CODE_INVALID_RANGE,
        ids::CODE_UNEXPECTED_DEPENDENCY,
        ids::CODE_UNSUPPORTED_RANGE,
        ids::CODE_UNRESOLVED_DEPENDENCY,
        ids::CODE_UNEXPECTED_SECTION,
        ids::CODE_UNUSED_ONLY_WARNS_FOR,
    ]
}

fn retitle(mut exp: Explanation, title: &'static str) -> Explanation {
    exp.title = title;
    exp
}

// --- Check-level explanations ---

fn explain_exact_versions() -> Explanation {
    Explanation {
        title: "Exact Versions",
        description: "\
Detects dependencies declared with a range (`^`, `~`, `>`, `<`) where an exact pin is expected.

Applications and the devDependencies of libraries should pin what they install:
- the lockfile and the manifest tell the same story
- upgrades show up as explicit manifest diffs
- identical-version and peer checks compare concrete versions

Libraries may keep ranges in `dependencies` so consumers can deduplicate.",
        remediation: "\
Run `pkgguard check --fix` to pin each range to the version currently installed in
node_modules. When the installed version does not satisfy the declared range, reinstall
first. Names listed in `exact_versions_only_warns_for` are reported as warnings.",
        examples: ExamplePair {
            before: r#"{
  "devDependencies": {
    "rollup": "^4.9.0"
  }
}"#,
            after: r#"{
  "devDependencies": {
    "rollup": "4.9.6"
  }
}"#,
        },
    }
}

fn explain_duplicate_dependencies() -> Explanation {
    Explanation {
        title: "Duplicate Dependencies",
        description: "\
Detects dependencies that are also dependencies of one of your dependencies, declared with
a range that cannot be deduplicated with theirs.

When your range does not overlap the range your dependency asks for, the package manager
installs two copies. Singletons (frameworks, test runners, bundler plugins) then break in
confusing ways. The check also flags packages declared in several sections at once.

Local references (`file:`, `workspace:`) are never compared, and names with an explicit
`resolutions` override are left to the resolutions checks.",
        remediation: "\
Align your range with the one required by the dependency, or add a `resolutions` entry with
an explanation in `resolutionsExplained` when the split is intentional. Keep each package in
a single section, except for libraries that use a range in `dependencies` and an exact pin
in `devDependencies`.",
        examples: ExamplePair {
            before: r#"{
  "dependencies": { "some-plugin": "1.0.0" },
  "devDependencies": { "rollup": "2.0.0" }
}
// some-plugin depends on "rollup": "^4.0.0""#,
            after: r#"{
  "dependencies": { "some-plugin": "1.0.0" },
  "devDependencies": { "rollup": "4.9.6" }
}"#,
        },
    }
}

fn explain_same_version_in_sections() -> Explanation {
    Explanation {
        title: "Same Version In dependencies And devDependencies",
        description: "\
A library declares the same package with identical text in `dependencies` and
`devDependencies`. The double declaration only makes sense when `dependencies` holds the
range consumers get and `devDependencies` pins the version tested against.",
        remediation: "\
Keep the package only in `dependencies`, or widen the `dependencies` entry to a range.",
        examples: ExamplePair {
            before: r#"{
  "dependencies": { "tslib": "2.6.2" },
  "devDependencies": { "tslib": "2.6.2" }
}"#,
            after: r#"{
  "dependencies": { "tslib": "^2.6.0" },
  "devDependencies": { "tslib": "2.6.2" }
}"#,
        },
    }
}

fn explain_peer_dependencies() -> Explanation {
    Explanation {
        title: "Peer Dependencies",
        description: "\
Checks that every peer dependency required by your direct dependencies is declared by you,
in an allowed section, with a version that satisfies the required range.

Allowed sections depend on where the dependent package is declared and on whether the
package is a library:
- devDependencies -> devDependencies or dependencies
- dependencies -> devDependencies or dependencies (library: dependencies or peerDependencies)
- optionalDependencies -> devDependencies or dependencies (library: dependencies,
  optionalDependencies or peerDependencies)

Peers marked optional in `peerDependenciesMeta` are not required.",
        remediation: "\
Add the missing peer dependency to one of the allowed sections with a version satisfying
the range shown in the finding, or upgrade the existing declaration.",
        examples: ExamplePair {
            before: r#"{
  "devDependencies": { "some-lib-using-rollup": "1.0.0" }
}"#,
            after: r#"{
  "devDependencies": {
    "rollup": "1.32.1",
    "some-lib-using-rollup": "1.0.0"
  }
}"#,
        },
    }
}

fn explain_min_range() -> Explanation {
    Explanation {
        title: "Minimum Range Satisfies",
        description: "\
For libraries, the lowest version allowed by a range in one section must satisfy the range
declared in a related section: `dependencies` against `devDependencies`, and
`peerDependencies` against `dependencies`.

Otherwise the package is tested against a newer version than the oldest one consumers may
install: it works in CI and fails for consumers sitting on the declared minimum.",
        remediation: "\
Raise the lower bound of the range, keeping its operator. `--fix` does this automatically.",
        examples: ExamplePair {
            before: r#"{
  "dependencies": { "test1": "^1.0.0" },
  "devDependencies": { "test1": "1.1.0" }
}"#,
            after: r#"{
  "dependencies": { "test1": "^1.1.0" },
  "devDependencies": { "test1": "1.1.0" }
}"#,
        },
    }
}

fn explain_resolutions_match() -> Explanation {
    Explanation {
        title: "Resolutions Versions Match",
        description: "\
A `resolutions` entry forces a version for the whole tree. When the same package is also a
direct dependency, the declared range must accept the forced version, otherwise the manifest
lies about what is installed.

Patched resolutions (`patch:name@npm:version#...`) are unwrapped before comparison.",
        remediation: "\
Set the declared range to the resolution version. `--fix` does this automatically.",
        examples: ExamplePair {
            before: r#"{
  "devDependencies": { "semver": "7.5.0" },
  "resolutions": { "semver": "7.5.4" }
}"#,
            after: r#"{
  "devDependencies": { "semver": "7.5.4" },
  "resolutions": { "semver": "7.5.4" }
}"#,
        },
    }
}

fn explain_resolutions_explanation() -> Explanation {
    Explanation {
        title: "Resolutions Have Explanation",
        description: "\
Every `resolutions` entry must be explained in `resolutionsExplained`, and every explanation
must belong to an existing resolution. Overrides without a reason are never removed because
nobody remembers why they exist.",
        remediation: "\
Add a `resolutionsExplained` entry for each resolution, and delete explanations whose
resolution was removed.",
        examples: ExamplePair {
            before: r#"{
  "resolutions": { "a": "1.0.0" },
  "resolutionsExplained": { "b": "because" }
}"#,
            after: r#"{
  "resolutions": { "a": "1.0.0" },
  "resolutionsExplained": { "a": "1.0.1 breaks the build, see upstream issue #42" }
}"#,
        },
    }
}

fn explain_identical_versions() -> Explanation {
    Explanation {
        title: "Identical Versions",
        description: "\
Packages released together (a framework and its plugins, a compiler and its runtime) must
carry exactly the same version as an anchor package, either declared in the same manifest
or taken from the anchor's own manifest.

This check is never autofixed: aligning a release group is a deliberate upgrade.",
        remediation: "\
Set every package of the group to the anchor's version.",
        examples: ExamplePair {
            before: r#"{
  "devDependencies": {
    "@babel/core": "7.23.0",
    "@babel/preset-env": "7.22.0"
  }
}"#,
            after: r#"{
  "devDependencies": {
    "@babel/core": "7.23.0",
    "@babel/preset-env": "7.23.0"
  }
}"#,
        },
    }
}

fn explain_satisfies_versions() -> Explanation {
    Explanation {
        title: "Satisfies Versions",
        description: "\
Configured assertions on ranges: a dependency must exist and satisfy a literal range, a range
taken from another package's manifest, or a range asserted inside a third-party manifest. A
range of `null` asserts that the dependency is absent.",
        remediation: "\
Update the declared range to satisfy the expected range shown in the finding, or add the
missing dependency. When autofix is possible the finding carries the replacement.",
        examples: ExamplePair {
            before: r#"{
  "devDependencies": { "typescript": "4.9.5" }
}
// config: typescript must satisfy "^5.0.0""#,
            after: r#"{
  "devDependencies": { "typescript": "5.3.3" }
}"#,
        },
    }
}

fn explain_unresolved_dependency() -> Explanation {
    Explanation {
        title: "Unresolved Dependency",
        description: "\
A check needed the manifest of an installed dependency and could not find it in any
`node_modules` directory above the checked package (or among the workspace members).",
        remediation: "\
Install dependencies before running the checks.",
        examples: ExamplePair {
            before: r#"$ pkgguard check   # before `npm install`"#,
            after: r#"$ npm install && pkgguard check"#,
        },
    }
}

fn explain_no_dependencies() -> Explanation {
    Explanation {
        title: "No Dependencies",
        description: "\
Some manifests must not declare a given section at all. A monorepo root is never installed
by consumers, so everything it needs belongs in `devDependencies`.",
        remediation: "\
Move the listed packages to the suggested section.",
        examples: ExamplePair {
            before: r#"{
  "private": true,
  "workspaces": ["packages/*"],
  "dependencies": { "react": "18.2.0" }
}"#,
            after: r#"{
  "private": true,
  "workspaces": ["packages/*"],
  "devDependencies": { "react": "18.2.0" }
}"#,
        },
    }
}

fn explain_monorepo_duplicates() -> Explanation {
    let mut exp = explain_duplicate_dependencies();
    exp.title = "Monorepo Duplicate Dependencies";
    exp.description = "\
Every workspace member is compared with the root manifest and with each member checked before
it. Two members declaring the same package with non-overlapping ranges end up with two
installed copies, which defeats hoisting.";
    exp
}

fn explain_monorepo_peers() -> Explanation {
    let mut exp = explain_peer_dependencies();
    exp.title = "Monorepo Peer Dependencies";
    exp.description = "\
Peer dependencies of a member's dependencies that the member does not declare itself must be
provided by the root `devDependencies` with a satisfying version.";
    exp
}

fn explain_only_warns_for() -> Explanation {
    Explanation {
        title: "Unused onlyWarnsFor Entry",
        description: "\
An `*_only_warns_for` entry demotes findings for a dependency from error to warning. When a
run completes without ever using an entry, the configuration is stale: the dependency was
fixed or removed and the silencing would hide the next real problem.",
        remediation: "\
Remove the entries listed in the finding from the configuration.",
        examples: ExamplePair {
            before: r#"[recommended]
exact_versions_only_warns_for = ["rollup", "left-pad"]
# left-pad is no longer a dependency"#,
            after: r#"[recommended]
exact_versions_only_warns_for = ["rollup"]"#,
        },
    }
}
