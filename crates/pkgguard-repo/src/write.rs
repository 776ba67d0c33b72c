use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use pkgguard_domain::{Manifest, ManifestWriter, Section};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// On-disk text of a `package.json`, kept to write ranges back in place.
///
/// Key order, indentation and the trailing newline of the original text are preserved. Text
/// is only re-serialized when a range actually changed.
#[derive(Clone, Debug)]
pub struct ManifestFile {
    text: String,
    document: Map<String, Value>,
    indent: String,
    trailing_newline: bool,
}

impl ManifestFile {
    pub fn from_text(text: &str) -> anyhow::Result<Self> {
        let document: Map<String, Value> =
            serde_json::from_str(text).context("parse package.json")?;
        Ok(Self {
            text: text.to_string(),
            document,
            indent: detect_indent(text),
            trailing_newline: text.ends_with('\n'),
        })
    }

    pub fn read(path: &Utf8Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
        Self::from_text(&text).with_context(|| format!("parse {path}"))
    }

    /// Text of the file with the ranges of `manifest` applied.
    ///
    /// Entries missing from the file are appended to their section, and missing sections are
    /// appended to the document. Entries are never removed.
    pub fn render(&self, manifest: &Manifest) -> anyhow::Result<String> {
        let mut document = self.document.clone();
        let mut changed = false;

        for section in Section::ALL {
            let Some(entries) = manifest.sections.get(&section) else {
                continue;
            };
            if entries.is_empty() {
                continue;
            }
            let table = document
                .entry(section.key())
                .or_insert_with(|| Value::Object(Map::new()));
            let Value::Object(table) = table else {
                anyhow::bail!("\"{section}\" is not an object");
            };
            for entry in entries.values() {
                let value = Value::String(entry.range.clone());
                if table.get(&entry.name) != Some(&value) {
                    table.insert(entry.name.clone(), value);
                    changed = true;
                }
            }
        }

        if !changed {
            return Ok(self.text.clone());
        }

        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        Value::Object(document)
            .serialize(&mut serializer)
            .context("serialize package.json")?;
        let mut text = String::from_utf8(buf).context("serialized package.json is not UTF-8")?;
        if self.trailing_newline {
            text.push('\n');
        }
        Ok(text)
    }
}

/// Indentation of the first indented line, two spaces when there is none.
fn detect_indent(text: &str) -> String {
    text.lines()
        .skip(1)
        .map(|line| {
            let trimmed = line.trim_start_matches([' ', '\t']);
            &line[..line.len() - trimmed.len()]
        })
        .find(|indent| !indent.is_empty())
        .unwrap_or("  ")
        .to_string()
}

/// Writes manifests back under a root directory, resolving their repo-relative paths.
#[derive(Clone, Debug)]
pub struct FsManifestWriter {
    root: Utf8PathBuf,
}

impl FsManifestWriter {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestWriter for FsManifestWriter {
    fn write(&self, manifest: &Manifest) -> anyhow::Result<()> {
        let path = self.root.join(manifest.path.as_str());
        let file = ManifestFile::read(&path)?;
        let text = file
            .render(manifest)
            .with_context(|| format!("render {path}"))?;
        if text == file.text {
            tracing::debug!(path = %path, "package.json unchanged");
            return Ok(());
        }
        std::fs::write(&path, text).with_context(|| format!("write {path}"))?;
        tracing::info!(path = %path, name = %manifest.name, "package.json updated");
        Ok(())
    }
}
