use pkgguard_types::{Location, RepoPath};
use std::collections::BTreeMap;
use std::fmt;

/// Dependency-bearing fields of a `package.json`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Dependencies,
    DevDependencies,
    PeerDependencies,
    OptionalDependencies,
    Resolutions,
    ResolutionsExplained,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Dependencies,
        Section::DevDependencies,
        Section::PeerDependencies,
        Section::OptionalDependencies,
        Section::Resolutions,
        Section::ResolutionsExplained,
    ];

    /// Sections holding packages that get installed for the manifest itself.
    pub const DIRECT: [Section; 3] = [
        Section::DevDependencies,
        Section::Dependencies,
        Section::OptionalDependencies,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Section::Dependencies => "dependencies",
            Section::DevDependencies => "devDependencies",
            Section::PeerDependencies => "peerDependencies",
            Section::OptionalDependencies => "optionalDependencies",
            Section::Resolutions => "resolutions",
            Section::ResolutionsExplained => "resolutionsExplained",
        }
    }

    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One declared dependency inside one section of one manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyEntry {
    pub name: String,
    /// Raw declared text (a range, an exact version, or a pseudo-protocol value).
    pub range: String,
    pub location: Option<Location>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerMeta {
    pub optional: bool,
}

/// Declared state of one package.
///
/// Rules receive the manifest under check as `&mut Manifest` and every other manifest as
/// `&Manifest`: only the former can have its ranges rewritten.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub path: RepoPath,
    pub name: String,
    pub version: Option<String>,
    pub private: bool,
    pub workspaces: Option<Vec<String>>,
    pub peer_dependencies_meta: BTreeMap<String, PeerMeta>,
    pub sections: BTreeMap<Section, BTreeMap<String, DependencyEntry>>,
}

impl Manifest {
    pub fn new(name: impl Into<String>, path: RepoPath) -> Self {
        Self {
            path,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Packages not marked `private` are published, and treated as libraries.
    pub fn is_library(&self) -> bool {
        !self.private
    }

    pub fn section(&self, section: Section) -> Option<&BTreeMap<String, DependencyEntry>> {
        self.sections.get(&section).filter(|deps| !deps.is_empty())
    }

    pub fn has_section(&self, section: Section) -> bool {
        self.section(section).is_some()
    }

    pub fn entry(&self, section: Section, name: &str) -> Option<&DependencyEntry> {
        self.sections.get(&section).and_then(|deps| deps.get(name))
    }

    pub fn range(&self, section: Section, name: &str) -> Option<&str> {
        self.entry(section, name).map(|e| e.range.as_str())
    }

    /// Iterate `(name, range)` pairs of a section in name order.
    pub fn ranges(&self, section: Section) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .get(&section)
            .into_iter()
            .flat_map(|deps| deps.values())
            .map(|e| (e.name.as_str(), e.range.as_str()))
    }

    /// Sections among `candidates` declaring `name`, in `candidates` order.
    pub fn sections_declaring(&self, name: &str, candidates: &[Section]) -> Vec<Section> {
        candidates
            .iter()
            .copied()
            .filter(|s| self.entry(*s, name).is_some())
            .collect()
    }

    pub fn is_optional_peer(&self, name: &str) -> bool {
        self.peer_dependencies_meta
            .get(name)
            .is_some_and(|meta| meta.optional)
    }

    /// Rewrite the range of an existing entry. Returns `false` when the entry does not exist.
    pub fn set_range(&mut self, section: Section, name: &str, range: impl Into<String>) -> bool {
        match self
            .sections
            .get_mut(&section)
            .and_then(|deps| deps.get_mut(name))
        {
            Some(entry) => {
                entry.range = range.into();
                true
            }
            None => false,
        }
    }

    /// Insert or replace an entry, keeping the previous location if there was one.
    pub fn insert(&mut self, section: Section, name: impl Into<String>, range: impl Into<String>) {
        let name = name.into();
        let range = range.into();
        let deps = self.sections.entry(section).or_default();
        match deps.get_mut(&name) {
            Some(entry) => entry.range = range,
            None => {
                deps.insert(
                    name.clone(),
                    DependencyEntry {
                        name,
                        range,
                        location: None,
                    },
                );
            }
        }
    }

    /// Builder-style helper, mostly for tests and fixtures.
    pub fn with(mut self, section: Section, name: &str, range: &str) -> Self {
        self.insert(section, name, range);
        self
    }

    /// Location of an entry, falling back to the manifest itself.
    pub fn location_of(&self, section: Section, name: &str) -> Location {
        self.entry(section, name)
            .and_then(|e| e.location.clone())
            .unwrap_or_else(|| Location::manifest(self.path.clone()))
    }
}
