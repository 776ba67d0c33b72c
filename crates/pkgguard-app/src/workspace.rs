//! WorkspaceOrchestrator: a root manifest plus one [`CheckPackage`] per workspace member.

use anyhow::Context;
use camino::Utf8Path;
use pkgguard_domain::checks::{self, DIRECT_SEARCH_IN};
use pkgguard_domain::warn_policy::report_not_warned_for_mapping;
use pkgguard_domain::{
    ConfigError, DependencyResolver, Manifest, ManifestWriter, OnlyWarnsForMappingCheck,
    RecommendedOptions, ReportSink, Section, WorkspaceOptions,
};
use pkgguard_repo::{FsManifestWriter, NodeModulesResolver, WorkspaceResolver};
use pkgguard_types::{Finding, RepoPath, ids};
use std::rc::Rc;

use crate::package::{CheckPackage, package_dir};

const CFG_MONOREPO_DUPLICATES: &str = "monorepo_direct_duplicate_dependencies_only_warns_for";

/// Root package and members, checked together.
pub struct CheckWorkspace {
    root: CheckPackage,
    members: Vec<CheckPackage>,
    monorepo: Option<WorkspaceOptions>,
}

impl CheckWorkspace {
    /// Build from already constructed orchestrators, members in discovery order.
    pub fn new(root: CheckPackage, members: Vec<CheckPackage>) -> Result<Self, ConfigError> {
        if root.manifest().workspaces.is_none() {
            return Err(ConfigError::MissingWorkspaces(root.manifest().path.clone()));
        }
        Ok(Self {
            root,
            members,
            monorepo: None,
        })
    }

    /// Load the root `package.json` of `root_dir` and every member its `workspaces` patterns
    /// match. Members resolve each other before falling back to `node_modules`.
    pub fn from_dir(root_dir: &Utf8Path) -> anyhow::Result<Self> {
        let root_path = RepoPath::default();
        let root = pkgguard_repo::load_manifest(root_dir, &root_path)?;
        let Some(patterns) = root.workspaces.clone() else {
            return Err(ConfigError::MissingWorkspaces(root_path).into());
        };

        let member_paths = pkgguard_repo::discover_members(root_dir, &patterns)
            .context("discover workspace members")?;
        tracing::debug!(members = member_paths.len(), "workspace members discovered");

        let mut manifests = Vec::with_capacity(member_paths.len());
        for path in &member_paths {
            manifests.push(Rc::new(pkgguard_repo::load_manifest(root_dir, path)?));
        }

        let resolver_for = |path: &RepoPath| -> Box<dyn DependencyResolver> {
            Box::new(WorkspaceResolver::new(
                manifests.iter().cloned(),
                NodeModulesResolver::new(root_dir, package_dir(root_dir, path)),
            ))
        };
        let writer = || -> Box<dyn ManifestWriter> { Box::new(FsManifestWriter::new(root_dir)) };

        let root = CheckPackage::new(root, resolver_for(&root_path), writer());
        let members = manifests
            .iter()
            .map(|m| CheckPackage::new((**m).clone(), resolver_for(&m.path), writer()))
            .collect();

        Ok(Self::new(root, members)?)
    }

    pub fn root(&self) -> &CheckPackage {
        &self.root
    }

    pub fn for_root(&mut self) -> &mut CheckPackage {
        &mut self.root
    }

    /// Apply `f` to every member, in discovery order.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut CheckPackage)) -> &mut Self {
        for member in &mut self.members {
            f(member);
        }
        self
    }

    pub fn for_member(&mut self, name: &str) -> Result<&mut CheckPackage, ConfigError> {
        self.members
            .iter_mut()
            .find(|m| m.name() == name)
            .ok_or_else(|| ConfigError::UnknownMember(name.to_string()))
    }

    pub fn members(&self) -> impl Iterator<Item = &CheckPackage> {
        self.members.iter()
    }

    pub fn autofix(&mut self, autofix: bool) -> &mut Self {
        self.root.autofix(autofix);
        self.for_each(|m| {
            m.autofix(autofix);
        })
    }

    /// Root: no runtime `dependencies` plus the recommended set. Members: the recommended set
    /// with every member name ignored by exact versions, and the cross-member checks.
    pub fn check_recommended(
        &mut self,
        options: &RecommendedOptions,
        monorepo: &WorkspaceOptions,
    ) -> &mut Self {
        self.root
            .check_no_dependencies(Section::Dependencies, Section::DevDependencies)
            .check_recommended(options);

        let mut member_options = options.clone();
        member_options
            .internal_exact_versions_ignore
            .extend(self.members.iter().map(|m| m.name().to_string()));
        self.for_each(|m| {
            m.check_recommended(&member_options);
        });

        self.monorepo = Some(monorepo.clone());
        self
    }

    /// Run the root, then every member followed by its cross-member checks.
    ///
    /// A failing package does not stop the others; the first failure is returned.
    pub fn run(&mut self, sink: &mut ReportSink) -> anyhow::Result<()> {
        let mut first_error: Option<anyhow::Error> = None;
        let mut record = |result: anyhow::Result<()>| {
            if let Err(err) = result {
                tracing::debug!(error = %err, "workspace package failed");
                first_error.get_or_insert(err);
            }
        };

        record(self.root.run(sink));

        let mut warn = self.monorepo.as_ref().map(|options| {
            OnlyWarnsForMappingCheck::new(
                CFG_MONOREPO_DUPLICATES,
                options.monorepo_direct_duplicate_dependencies_only_warns_for.clone(),
            )
        });

        for index in 0..self.members.len() {
            record(self.members[index].run(sink));

            if let Some(warn) = warn.as_mut() {
                let path = self.members[index].manifest().path.clone();
                let result = self
                    .check_monorepo_member(index, warn)
                    .map(|findings| sink.extend(findings))
                    .with_context(|| format!("monorepo checks failed for {path}"));
                record(result);
            }
        }

        if let Some(warn) = &warn {
            sink.extend(report_not_warned_for_mapping(self.root.manifest(), warn));
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn check_monorepo_member(
        &self,
        index: usize,
        warn: &mut OnlyWarnsForMappingCheck,
    ) -> anyhow::Result<Vec<Finding>> {
        let member = &self.members[index];
        let manifest = member.manifest();
        let root = self.root.manifest();
        let mut out = Vec::new();

        out.extend(duplicates(
            manifest,
            member.is_library(),
            Section::DevDependencies,
            &DIRECT_SEARCH_IN,
            root,
            warn,
        ));

        for previous in &self.members[..index] {
            let related = previous.manifest();
            for section in [Section::DevDependencies, Section::Dependencies] {
                out.extend(duplicates(
                    manifest,
                    member.is_library(),
                    section,
                    &DIRECT_SEARCH_IN,
                    related,
                    warn,
                ));
            }
            out.extend(duplicates(
                manifest,
                member.is_library(),
                Section::PeerDependencies,
                &[Section::PeerDependencies],
                related,
                warn,
            ));
        }

        out.extend(checks::check_workspace_peer_dependencies(
            manifest,
            root,
            member.resolver(),
        )?);
        Ok(out)
    }
}

fn duplicates(
    subject: &Manifest,
    is_library: bool,
    related_section: Section,
    search_in: &[Section],
    related: &Manifest,
    warn: &mut OnlyWarnsForMappingCheck,
) -> Vec<Finding> {
    let mut scope = warn.create_for(&related.name);
    checks::check_duplicate_dependencies(
        ids::CHECK_MONOREPO_DUPLICATES,
        subject,
        is_library,
        related_section,
        search_in,
        related,
        &mut scope,
    )
}
