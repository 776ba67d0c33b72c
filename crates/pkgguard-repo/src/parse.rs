use anyhow::{Context, bail};
use pkgguard_domain::{ConfigError, DependencyEntry, Manifest, PeerMeta, Section};
use pkgguard_types::{Location, RepoPath};
use serde_json::Value;
use std::collections::BTreeMap;

/// Parse the text of a `package.json` into the domain model.
///
/// Every dependency entry carries the 1-based line it is declared on.
pub fn parse_manifest(text: &str, manifest_path: &RepoPath) -> anyhow::Result<Manifest> {
    let value: Value = serde_json::from_str(text).context("parse package.json")?;
    let Value::Object(root) = value else {
        bail!("{manifest_path}: expected a JSON object at the top level");
    };

    let Some(name) = root.get("name").and_then(Value::as_str) else {
        return Err(ConfigError::MissingName(manifest_path.clone()).into());
    };

    let mut manifest = Manifest::new(name, manifest_path.clone());
    manifest.version = root.get("version").and_then(Value::as_str).map(str::to_string);
    manifest.private = root.get("private").and_then(Value::as_bool).unwrap_or(false);
    manifest.workspaces = parse_workspaces(root.get("workspaces"));
    manifest.peer_dependencies_meta = parse_peer_meta(root.get("peerDependenciesMeta"));

    let lines = entry_lines(text);
    for section in Section::ALL {
        let Some(table) = root.get(section.key()) else {
            continue;
        };
        let entries = parse_section(table, section, manifest_path, &lines)?;
        manifest.sections.insert(section, entries);
    }

    Ok(manifest)
}

/// `workspaces` is either a list of globs or `{ "packages": [...] }`.
fn parse_workspaces(value: Option<&Value>) -> Option<Vec<String>> {
    let list = match value? {
        Value::Array(list) => list,
        Value::Object(map) => map.get("packages")?.as_array()?,
        _ => return None,
    };
    Some(
        list.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}

fn parse_peer_meta(value: Option<&Value>) -> BTreeMap<String, PeerMeta> {
    let Some(Value::Object(map)) = value else {
        return BTreeMap::new();
    };
    map.iter()
        .map(|(name, meta)| {
            let optional = meta
                .get("optional")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            (name.clone(), PeerMeta { optional })
        })
        .collect()
}

fn parse_section(
    table: &Value,
    section: Section,
    manifest_path: &RepoPath,
    lines: &BTreeMap<(String, String), u32>,
) -> anyhow::Result<BTreeMap<String, DependencyEntry>> {
    let Some(map) = table.as_object() else {
        bail!("{manifest_path}: \"{section}\" must be an object");
    };

    let mut out = BTreeMap::new();
    for (name, range) in map {
        let Some(range) = range.as_str() else {
            bail!("{manifest_path}: \"{name}\" in \"{section}\" must be a string");
        };
        let line = lines.get(&(section.key().to_string(), name.clone())).copied();
        out.insert(
            name.clone(),
            DependencyEntry {
                name: name.clone(),
                range: range.to_string(),
                location: Some(Location {
                    path: manifest_path.clone(),
                    line,
                    col: None,
                }),
            },
        );
    }
    Ok(out)
}

/// Line of every key nested one level below a top-level key, as
/// `(top-level key, nested key) -> line`.
///
/// Only called on text `serde_json` already accepted, so the scan can stay lenient.
fn entry_lines(text: &str) -> BTreeMap<(String, String), u32> {
    let mut out = BTreeMap::new();
    let mut depth = 0usize;
    let mut line = 1u32;
    let mut top_key: Option<String> = None;
    let mut last_string: Option<(String, u32)> = None;

    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let start = line;
                let mut buf = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            // Keys are compared raw; escapes in package names do not occur.
                            if let Some(escaped) = chars.next() {
                                buf.push('\\');
                                buf.push(escaped);
                            }
                        }
                        '"' => break,
                        '\n' => {
                            line += 1;
                            buf.push(c);
                        }
                        _ => buf.push(c),
                    }
                }
                last_string = Some((buf, start));
            }
            ':' => {
                if let Some((key, key_line)) = last_string.take() {
                    match depth {
                        1 => top_key = Some(key),
                        2 => {
                            if let Some(top) = &top_key {
                                out.insert((top.clone(), key), key_line);
                            }
                        }
                        _ => {}
                    }
                }
            }
            '{' | '[' => {
                depth += 1;
                last_string = None;
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                last_string = None;
            }
            ',' => last_string = None,
            '\n' => line += 1,
            _ => {}
        }
    }

    out
}
