//! Dependency consistency rules.
//!
//! Each rule is a plain function over manifests. Rules taking the manifest under check as
//! `&mut Manifest` may rewrite its ranges when autofix is requested; every other manifest is
//! read-only.

mod duplicates;
mod exact_versions;
mod identical;
mod min_range;
mod no_dependencies;
mod peers;
mod resolutions;
mod satisfies;
pub(crate) mod utils;


pub use duplicates::{
    DIRECT_SEARCH_IN, check_direct_duplicate_dependencies, check_duplicate_dependencies,
};
pub use exact_versions::{ExactVersionsOptions, check_exact_versions};
pub use identical::{check_identical_versions, check_identical_versions_than_dependency};
pub use min_range::check_min_range_satisfies;
pub use no_dependencies::check_no_dependencies;
pub use peers::{
    PeerContext, allowed_peer_sections, check_direct_peer_dependencies, check_peer_dependencies,
    check_workspace_peer_dependencies,
};
pub use resolutions::{
    ExplanationValidator, check_resolutions_has_explanation, check_resolutions_versions_match,
    min_length_validator, unwrap_resolution,
};
pub use satisfies::{
    ExactVersionsPredicate, FromDependency, check_satisfies_versions,
    check_satisfies_versions_between_dependencies, check_satisfies_versions_from_dependency,
    check_satisfies_versions_in_dependency, satisfying_fix,
};
