//! Orchestration and use cases for pkgguard.
//!
//! [`CheckPackage`] queues checks against one manifest and [`CheckWorkspace`] drives one per
//! workspace member; the `check`, `explain` and render use cases sit on top of them.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod package;
mod render;
mod report;
mod workspace;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use package::{CheckPackage, ExactVersionsConfig, ExplanationValidator};
pub use render::{render_annotations, render_markdown, render_text, write_report};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
pub use workspace::CheckWorkspace;
