use crate::checks::utils::draft;
use crate::model::{Manifest, Section};
use pkgguard_types::{Finding, ids};
use serde_json::json;

/// `section` must be empty, e.g. `dependencies` of a monorepo root.
pub fn check_no_dependencies(
    subject: &Manifest,
    section: Section,
    move_to: Section,
) -> Vec<Finding> {
    let Some(entries) = subject.section(section) else {
        return Vec::new();
    };
    let names: Vec<&str> = entries.keys().map(String::as_str).collect();

    vec![
        draft(
            ids::CHECK_NO_DEPENDENCIES,
            ids::CODE_UNEXPECTED_SECTION,
            format!("Unexpected {section}"),
        )
        .details(format!("you should move them in {move_to}"))
        .at(subject)
        .data("section", json!(section.key()))
        .data("names", json!(names))
        .build(),
    ]
}
