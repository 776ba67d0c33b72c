use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use pkgguard_types::RepoPath;
use std::collections::BTreeSet;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

const MANIFEST: &str = "package.json";

/// Discover workspace member manifests under `root_dir`.
///
/// Behavior:
/// - each pattern matches member directories relative to `root_dir` (`*` stays inside one
///   path segment, `**` crosses them)
/// - a directory is a member when it contains a `package.json`
/// - members come in pattern order, sorted within a pattern, without duplicates
/// - patterns starting with `!` exclude directories matched by earlier patterns
/// - `node_modules` and hidden directories are never entered
pub fn discover_members(root_dir: &Utf8Path, patterns: &[String]) -> anyhow::Result<Vec<RepoPath>> {
    let (excludes, includes): (Vec<&String>, Vec<&String>) =
        patterns.iter().partition(|p| p.starts_with('!'));

    let exclude_set = build_globset(excludes.iter().map(|p| &p[1..]))
        .context("compile excluded workspace globs")?;

    let candidates = member_dirs(root_dir);
    tracing::debug!(root = %root_dir, candidates = candidates.len(), "scanned workspace");

    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for pattern in includes {
        let matcher =
            compile(pattern).with_context(|| format!("compile workspace glob {pattern}"))?;
        let mut matched: Vec<&String> = candidates
            .iter()
            .filter(|dir| matcher.is_match(dir.as_str()) && !exclude_set.is_match(dir.as_str()))
            .collect();
        matched.sort();
        for dir in matched {
            if seen.insert(dir.clone()) {
                out.push(RepoPath::new(format!("{dir}/{MANIFEST}")));
            }
        }
    }

    Ok(out)
}

/// Relative paths of every directory below `root_dir` holding a `package.json`.
fn member_dirs(root_dir: &Utf8Path) -> Vec<String> {
    WalkDir::new(root_dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_skipped(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter(|abs| abs.join(MANIFEST).is_file())
        .filter_map(|abs| {
            abs.strip_prefix(root_dir)
                .ok()
                .map(|rel| rel.as_str().replace('\\', "/"))
        })
        .collect()
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.file_type().is_dir() && (name == "node_modules" || name.starts_with('.'))
}

fn compile(pattern: &str) -> anyhow::Result<GlobMatcher> {
    let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
    Ok(GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

fn build_globset<'a>(patterns: impl Iterator<Item = &'a str>) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        let p = p.trim_start_matches("./").trim_end_matches('/');
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
