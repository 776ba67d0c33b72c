use crate::checks::utils::draft;
use crate::model::{Manifest, Section};
use crate::range::{self, Operator};
use pkgguard_types::{Finding, ids};
use serde_json::json;

/// The lowest version allowed by `section_a` must satisfy the range in `section_b`.
///
/// For a library this keeps the declared minimum of a dependency in line with the version it
/// is developed against.
pub fn check_min_range_satisfies(
    subject: &mut Manifest,
    section_a: Section,
    section_b: Section,
    autofix: bool,
) -> Vec<Finding> {
    let mut out = Vec::new();

    let pairs: Vec<(String, String, String)> = subject
        .ranges(section_a)
        .filter_map(|(name, a)| {
            subject
                .range(section_b, name)
                .map(|b| (name.to_string(), a.to_string(), b.to_string()))
        })
        .collect();

    for (name, range_a, range_b) in pairs {
        if range_a.trim() == "*" || range_a.is_empty() || range_b.is_empty() {
            continue;
        }
        if range::is_local_reference(&range_a) || range::is_local_reference(&range_b) {
            continue;
        }

        let min_a = range::min_version(&range_a)
            .map(|v| v.to_string())
            .unwrap_or_else(|| range_a.clone());
        if range::satisfies(&min_a, &range_b) {
            continue;
        }

        let fixed = min_range_fix(&range_a, &range_b);
        if autofix && let Some(fixed) = &fixed {
            subject.set_range(section_a, &name, fixed.clone());
            continue;
        }
        out.push(
            draft(
                ids::CHECK_MIN_RANGE,
                ids::CODE_MIN_RANGE_UNSATISFIED,
                format!("Invalid \"{name}\" in {section_a}"),
            )
            .details(format!(
                "\"{range_a}\" should satisfies \"{range_b}\" from \"{section_b}\"."
            ))
            .fix(fixed)
            .on(subject, section_a, &name)
            .data("expected", json!(range_b))
            .build(),
        );
    }

    out
}

/// `range_a` moved up to the minimum of `range_b`, keeping its comparator. `None` when the
/// comparator cannot be kept: unions, bounded sets and `>`.
fn min_range_fix(range_a: &str, range_b: &str) -> Option<String> {
    let operator = range::get_operator(range_a)?;
    if operator == Operator::Greater {
        return None;
    }
    let min_b = range::min_version(range_b)?;
    range::with_operator(&min_b.to_string(), operator)
}
