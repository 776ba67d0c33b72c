//! Render use cases: console text, Markdown and GitHub annotations from in-memory reports.

use anyhow::Context;
use camino::Utf8Path;
use pkgguard_render::RenderableReport;
use pkgguard_types::PkgguardReport;

use crate::report::serialize_report;

pub fn render_text(report: &RenderableReport) -> String {
    pkgguard_render::render_text(report)
}

pub fn render_markdown(report: &RenderableReport) -> String {
    pkgguard_render::render_markdown(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    pkgguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}

/// Write the JSON report to `path`, creating parent directories.
pub fn write_report(path: &Utf8Path, report: &PkgguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    let bytes = serialize_report(report)?;
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}
