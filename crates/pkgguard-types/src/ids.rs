//! Stable identifiers for checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_EXACT_VERSIONS: &str = "package.exact_versions";
pub const CHECK_DUPLICATE_DEPENDENCIES: &str = "package.duplicate_dependencies";
pub const CHECK_PEER_DEPENDENCIES: &str = "package.peer_dependencies";
pub const CHECK_MIN_RANGE: &str = "package.min_range_satisfies";
pub const CHECK_RESOLUTIONS_MATCH: &str = "resolutions.versions_match";
pub const CHECK_RESOLUTIONS_EXPLANATION: &str = "resolutions.has_explanation";
pub const CHECK_IDENTICAL_VERSIONS: &str = "package.identical_versions";
pub const CHECK_SATISFIES_VERSIONS: &str = "package.satisfies_versions";
pub const CHECK_NO_DEPENDENCIES: &str = "package.no_dependencies";
pub const CHECK_MONOREPO_DUPLICATES: &str = "monorepo.duplicate_dependencies";
pub const CHECK_MONOREPO_PEER_DEPENDENCIES: &str = "monorepo.peer_dependencies";
pub const CHECK_CONFIG: &str = "config.only_warns_for";

// Codes: package.exact_versions
pub const CODE_RANGE_NOT_EXACT: &str = "range_not_exact";

// Codes: duplicates
pub const CODE_DUPLICATE_SECTIONS: &str = "present_in_multiple_sections";
pub const CODE_SAME_VERSION_IN_SECTIONS: &str = "same_version_in_sections";
pub const CODE_DUPLICATE_UNSATISFIED: &str = "duplicate_unsatisfied";

// Codes: peers
pub const CODE_MISSING_PEER: &str = "missing_peer";
pub const CODE_INVALID_PEER: &str = "invalid_peer";

// Codes: resolutions
pub const CODE_RESOLUTION_MISMATCH: &str = "resolution_mismatch";
pub const CODE_MISSING_EXPLANATION: &str = "missing_explanation";
pub const CODE_INVALID_EXPLANATION: &str = "invalid_explanation";
pub const CODE_ORPHAN_EXPLANATION: &str = "orphan_explanation";

// Codes: range containment
pub const CODE_MIN_RANGE_UNSATISFIED: &str = "min_range_unsatisfied";
pub const CODE_MISSING_DEPENDENCY: &str = "missing_dependency";
pub const CODE_INVALID_RANGE: &str = "invalid_range";
pub const CODE_UNEXPECTED_DEPENDENCY: &str = "unexpected_dependency";
pub const CODE_UNSUPPORTED_RANGE: &str = "unsupported_range";
pub const CODE_UNRESOLVED_DEPENDENCY: &str = "unresolved_dependency";

// Codes: package.no_dependencies
pub const CODE_UNEXPECTED_SECTION: &str = "unexpected_section";

// Codes: config.only_warns_for
pub const CODE_UNUSED_ONLY_WARNS_FOR: &str = "unused_only_warns_for";

// Tool-level
pub const CHECK_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
