//! CheckOrchestrator: queue checks against one `package.json` and run them in order.

use anyhow::Context;
use camino::Utf8Path;
use pkgguard_domain::checks::{
    self, ExactVersionsOptions, FromDependency, min_length_validator,
};
use pkgguard_domain::{
    DependencyResolver, ExtraCheck, Manifest, ManifestWriter, OnlyWarnsFor,
    OnlyWarnsForArrayCheck, OnlyWarnsForMappingCheck, RecommendedOptions, ReportSink, Section,
};
use pkgguard_repo::{FsManifestWriter, NodeModulesResolver};
use pkgguard_types::{Finding, RepoPath};
use std::collections::{BTreeMap, BTreeSet};

/// Validates one value of `resolutionsExplained`: `(name, explanation) -> error message`.
pub type ExplanationValidator = Box<dyn Fn(&str, &str) -> Option<String>>;

pub(crate) const CFG_EXACT_VERSIONS: &str = "exact_versions_only_warns_for";
pub(crate) const CFG_DIRECT_DUPLICATES: &str = "direct_duplicate_dependencies_only_warns_for";
pub(crate) const CFG_PEER_MISSING: &str = "peer_dependencies_missing_only_warns_for";
pub(crate) const CFG_PEER_INVALID: &str = "peer_dependencies_invalid_only_warns_for";
const CFG_ONLY_WARNS_FOR: &str = "only_warns_for";

/// Options of [`CheckPackage::check_exact_versions`].
#[derive(Clone, Debug, Default)]
pub struct ExactVersionsConfig {
    pub allow_range_versions_in_dependencies: bool,
    pub only_warns_for: Vec<String>,
    pub internal_exact_versions_ignore: Vec<String>,
}

enum CheckJob {
    ExactVersions {
        allow_range_versions_in_dependencies: bool,
        ignore: BTreeSet<String>,
        only_warns_for: Vec<String>,
    },
    ResolutionsVersionsMatch,
    ResolutionsHasExplanation {
        validator: Option<ExplanationValidator>,
    },
    DirectPeerDependencies {
        missing_only_warns_for: OnlyWarnsFor,
        invalid_only_warns_for: OnlyWarnsFor,
    },
    DirectDuplicateDependencies {
        only_warns_for: OnlyWarnsFor,
    },
    MinRange {
        section: Section,
        other: Section,
    },
    IdenticalVersions {
        section: Section,
        groups: BTreeMap<String, Vec<String>>,
        only_warns_for: Vec<String>,
    },
    IdenticalVersionsThanDependency {
        dependency: String,
        section: Section,
        names: Vec<String>,
        only_warns_for: Vec<String>,
    },
    SatisfiesVersions {
        section: Section,
        versions: BTreeMap<String, String>,
        only_warns_for: Vec<String>,
    },
    SatisfiesVersionsFromDependency {
        dependency: String,
        dependency_section: Section,
        section: Section,
        names: Vec<String>,
        only_warns_for: Vec<String>,
    },
    SatisfiesVersionsInDependency {
        dependency: String,
        expected: BTreeMap<Section, BTreeMap<String, Option<String>>>,
    },
    SatisfiesVersionsBetweenDependencies {
        first: String,
        second: String,
        names_by_section: BTreeMap<Section, Vec<String>>,
    },
    NoDependencies {
        section: Section,
        move_to: Section,
    },
}

struct Job {
    name: &'static str,
    check: CheckJob,
}

/// Builder owning one manifest under check.
///
/// Registration methods queue a job and return `&mut Self`; nothing runs before [`run`].
///
/// [`run`]: CheckPackage::run
pub struct CheckPackage {
    manifest: Manifest,
    original: Manifest,
    is_library: bool,
    autofix: bool,
    fixed: bool,
    allow_range_versions_in_dependencies: bool,
    resolver: Box<dyn DependencyResolver>,
    writer: Box<dyn ManifestWriter>,
    jobs: Vec<Job>,
}

impl CheckPackage {
    pub fn new(
        manifest: Manifest,
        resolver: Box<dyn DependencyResolver>,
        writer: Box<dyn ManifestWriter>,
    ) -> Self {
        Self {
            is_library: manifest.is_library(),
            original: manifest.clone(),
            manifest,
            autofix: false,
            fixed: false,
            allow_range_versions_in_dependencies: false,
            resolver,
            writer,
            jobs: Vec::new(),
        }
    }

    /// Check `rel_path` under `root`, resolving dependencies from `node_modules` and writing
    /// fixes back to disk.
    pub fn from_dir(root: &Utf8Path, rel_path: &RepoPath) -> anyhow::Result<Self> {
        let manifest = pkgguard_repo::load_manifest(root, rel_path)?;
        let resolver = NodeModulesResolver::new(root, package_dir(root, rel_path));
        Ok(Self::new(
            manifest,
            Box::new(resolver),
            Box::new(FsManifestWriter::new(root)),
        ))
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn is_library(&self) -> bool {
        self.is_library
    }

    pub fn resolver(&self) -> &dyn DependencyResolver {
        self.resolver.as_ref()
    }

    /// Override the `!private` default.
    pub fn library(&mut self, is_library: bool) -> &mut Self {
        self.is_library = is_library;
        self
    }

    pub fn autofix(&mut self, autofix: bool) -> &mut Self {
        self.autofix = autofix;
        self
    }

    fn push(&mut self, name: &'static str, check: CheckJob) -> &mut Self {
        self.jobs.push(Job { name, check });
        self
    }

    pub fn check_exact_versions(&mut self, config: ExactVersionsConfig) -> &mut Self {
        self.allow_range_versions_in_dependencies = config.allow_range_versions_in_dependencies;
        self.push(
            "exact versions",
            CheckJob::ExactVersions {
                allow_range_versions_in_dependencies: config.allow_range_versions_in_dependencies,
                ignore: config.internal_exact_versions_ignore.into_iter().collect(),
                only_warns_for: config.only_warns_for,
            },
        )
    }

    pub fn check_resolutions_versions_match(&mut self) -> &mut Self {
        self.push("resolutions versions match", CheckJob::ResolutionsVersionsMatch)
    }

    pub fn check_resolutions_has_explanation(
        &mut self,
        validator: Option<ExplanationValidator>,
    ) -> &mut Self {
        self.push(
            "resolutions has explanation",
            CheckJob::ResolutionsHasExplanation { validator },
        )
    }

    pub fn check_direct_peer_dependencies(
        &mut self,
        missing_only_warns_for: OnlyWarnsFor,
        invalid_only_warns_for: OnlyWarnsFor,
    ) -> &mut Self {
        self.push(
            "direct peer dependencies",
            CheckJob::DirectPeerDependencies {
                missing_only_warns_for,
                invalid_only_warns_for,
            },
        )
    }

    pub fn check_direct_duplicate_dependencies(
        &mut self,
        only_warns_for: OnlyWarnsFor,
    ) -> &mut Self {
        self.push(
            "direct duplicate dependencies",
            CheckJob::DirectDuplicateDependencies { only_warns_for },
        )
    }

    pub fn check_min_range_dependencies_satisfies_dev_dependencies(&mut self) -> &mut Self {
        self.push(
            "min range dependencies satisfies dev dependencies",
            CheckJob::MinRange {
                section: Section::Dependencies,
                other: Section::DevDependencies,
            },
        )
    }

    pub fn check_min_range_peer_dependencies_satisfies_dependencies(&mut self) -> &mut Self {
        self.push(
            "min range peer dependencies satisfies dependencies",
            CheckJob::MinRange {
                section: Section::PeerDependencies,
                other: Section::Dependencies,
            },
        )
    }

    pub fn check_identical_versions(
        &mut self,
        section: Section,
        groups: BTreeMap<String, Vec<String>>,
        only_warns_for: Vec<String>,
    ) -> &mut Self {
        self.push(
            "identical versions",
            CheckJob::IdenticalVersions {
                section,
                groups,
                only_warns_for,
            },
        )
    }

    pub fn check_identical_versions_than_dependency(
        &mut self,
        dependency: impl Into<String>,
        section: Section,
        names: Vec<String>,
        only_warns_for: Vec<String>,
    ) -> &mut Self {
        self.push(
            "identical versions than dependency",
            CheckJob::IdenticalVersionsThanDependency {
                dependency: dependency.into(),
                section,
                names,
                only_warns_for,
            },
        )
    }

    pub fn check_satisfies_versions(
        &mut self,
        section: Section,
        versions: BTreeMap<String, String>,
        only_warns_for: Vec<String>,
    ) -> &mut Self {
        self.push(
            "satisfies versions",
            CheckJob::SatisfiesVersions {
                section,
                versions,
                only_warns_for,
            },
        )
    }

    pub fn check_satisfies_versions_from_dependency(
        &mut self,
        dependency: impl Into<String>,
        dependency_section: Section,
        section: Section,
        names: Vec<String>,
        only_warns_for: Vec<String>,
    ) -> &mut Self {
        self.push(
            "satisfies versions from dependency",
            CheckJob::SatisfiesVersionsFromDependency {
                dependency: dependency.into(),
                dependency_section,
                section,
                names,
                only_warns_for,
            },
        )
    }

    /// `None` as expected range means the dependency must not declare the name.
    pub fn check_satisfies_versions_in_dependency(
        &mut self,
        dependency: impl Into<String>,
        expected: BTreeMap<Section, BTreeMap<String, Option<String>>>,
    ) -> &mut Self {
        self.push(
            "satisfies versions in dependency",
            CheckJob::SatisfiesVersionsInDependency {
                dependency: dependency.into(),
                expected,
            },
        )
    }

    pub fn check_satisfies_versions_between_dependencies(
        &mut self,
        first: impl Into<String>,
        second: impl Into<String>,
        names_by_section: BTreeMap<Section, Vec<String>>,
    ) -> &mut Self {
        self.push(
            "satisfies versions between dependencies",
            CheckJob::SatisfiesVersionsBetweenDependencies {
                first: first.into(),
                second: second.into(),
                names_by_section,
            },
        )
    }

    pub fn check_no_dependencies(&mut self, section: Section, move_to: Section) -> &mut Self {
        self.push("no dependencies", CheckJob::NoDependencies { section, move_to })
    }

    /// Queue the recommended set, in order: exact versions, resolutions, direct peers, direct
    /// duplicates, then min ranges for libraries.
    pub fn check_recommended(&mut self, options: &RecommendedOptions) -> &mut Self {
        self.check_exact_versions(ExactVersionsConfig {
            allow_range_versions_in_dependencies: options.allow_range_versions_in_dependencies,
            only_warns_for: options.exact_versions_only_warns_for.clone(),
            internal_exact_versions_ignore: options.internal_exact_versions_ignore.clone(),
        });
        self.check_resolutions_versions_match();
        self.check_resolutions_has_explanation(
            options
                .resolutions_explanation_min_length
                .map(|n| Box::new(min_length_validator(n)) as ExplanationValidator),
        );
        self.check_direct_peer_dependencies(
            options.peer_dependencies_missing_only_warns_for.clone(),
            options.peer_dependencies_invalid_only_warns_for.clone(),
        );
        self.check_direct_duplicate_dependencies(
            options.direct_duplicate_dependencies_only_warns_for.clone(),
        );
        if self.is_library {
            self.check_min_range_dependencies_satisfies_dev_dependencies();
            self.check_min_range_peer_dependencies_satisfies_dependencies();
        }
        self
    }

    /// Queue a check configured in `pkgguard.toml`.
    pub fn check_extra(&mut self, extra: &ExtraCheck) -> &mut Self {
        match extra {
            ExtraCheck::SatisfiesVersions { section, versions } => {
                self.check_satisfies_versions(*section, versions.clone(), Vec::new())
            }
            ExtraCheck::IdenticalVersions {
                section,
                groups,
                only_warns_for,
            } => self.check_identical_versions(*section, groups.clone(), only_warns_for.clone()),
            ExtraCheck::SatisfiesVersionsFromDependency {
                dependency,
                dependency_section,
                section,
                names,
            } => self.check_satisfies_versions_from_dependency(
                dependency.clone(),
                *dependency_section,
                *section,
                names.clone(),
                Vec::new(),
            ),
        }
    }

    /// Run queued jobs in registration order.
    ///
    /// The first failing job aborts the rest of the queue. With autofix, a changed manifest
    /// is written back once, failure or not.
    pub fn run(&mut self, sink: &mut ReportSink) -> anyhow::Result<()> {
        let mut result = Ok(());

        for job in &self.jobs {
            tracing::debug!(job = job.name, path = %self.manifest.path, "check started");
            let ctx = JobContext {
                resolver: self.resolver.as_ref(),
                is_library: self.is_library,
                autofix: self.autofix,
                allow_range_versions_in_dependencies: self.allow_range_versions_in_dependencies,
            };
            match execute(&job.check, &mut self.manifest, &ctx) {
                Ok(findings) => {
                    tracing::debug!(job = job.name, findings = findings.len(), "check finished");
                    sink.extend(findings);
                }
                Err(err) => {
                    result = Err(err.context(format!(
                        "check \"{}\" failed for {}",
                        job.name, self.manifest.path
                    )));
                    break;
                }
            }
        }

        if self.autofix && self.manifest != self.original {
            let written = self
                .writer
                .write(&self.manifest)
                .with_context(|| format!("write {}", self.manifest.path));
            match written {
                Ok(()) => {
                    self.original = self.manifest.clone();
                    self.fixed = true;
                }
                Err(err) if result.is_ok() => result = Err(err),
                Err(err) => tracing::warn!(error = %err, "write-back failed after a check failure"),
            }
        }

        result
    }

    /// Autofix wrote the manifest back.
    pub fn was_fixed(&self) -> bool {
        self.fixed
    }
}

pub(crate) fn package_dir(root: &Utf8Path, rel_path: &RepoPath) -> camino::Utf8PathBuf {
    let parent = rel_path.parent_dir();
    if parent.as_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(parent.as_str())
    }
}

struct JobContext<'a> {
    resolver: &'a dyn DependencyResolver,
    is_library: bool,
    autofix: bool,
    allow_range_versions_in_dependencies: bool,
}

impl JobContext<'_> {
    fn exact_policy(&self) -> RecommendedOptions {
        RecommendedOptions {
            allow_range_versions_in_dependencies: self.allow_range_versions_in_dependencies,
            ..RecommendedOptions::default()
        }
    }
}

fn execute(
    check: &CheckJob,
    manifest: &mut Manifest,
    ctx: &JobContext<'_>,
) -> anyhow::Result<Vec<Finding>> {
    let findings = match check {
        CheckJob::ExactVersions {
            allow_range_versions_in_dependencies,
            ignore,
            only_warns_for,
        } => {
            let policy = RecommendedOptions {
                allow_range_versions_in_dependencies: *allow_range_versions_in_dependencies,
                ..RecommendedOptions::default()
            };
            let options = ExactVersionsOptions {
                sections: policy.exact_version_sections(ctx.is_library),
                ignore,
                autofix: ctx.autofix,
            };
            let mut warn = OnlyWarnsForArrayCheck::new(CFG_EXACT_VERSIONS, only_warns_for);
            checks::check_exact_versions(manifest, &options, Some(ctx.resolver), &mut warn)?
        }
        CheckJob::ResolutionsVersionsMatch => {
            checks::check_resolutions_versions_match(manifest, ctx.autofix)
        }
        CheckJob::ResolutionsHasExplanation { validator } => {
            let validator = validator
                .as_ref()
                .map(|v| v.as_ref() as &dyn Fn(&str, &str) -> Option<String>);
            checks::check_resolutions_has_explanation(manifest, validator)
        }
        CheckJob::DirectPeerDependencies {
            missing_only_warns_for,
            invalid_only_warns_for,
        } => {
            let mut missing =
                OnlyWarnsForMappingCheck::new(CFG_PEER_MISSING, missing_only_warns_for.clone());
            let mut invalid =
                OnlyWarnsForMappingCheck::new(CFG_PEER_INVALID, invalid_only_warns_for.clone());
            checks::check_direct_peer_dependencies(
                manifest,
                ctx.is_library,
                ctx.resolver,
                &mut missing,
                &mut invalid,
            )?
        }
        CheckJob::DirectDuplicateDependencies { only_warns_for } => {
            let mut warn =
                OnlyWarnsForMappingCheck::new(CFG_DIRECT_DUPLICATES, only_warns_for.clone());
            checks::check_direct_duplicate_dependencies(
                manifest,
                ctx.is_library,
                ctx.resolver,
                &mut warn,
            )?
        }
        CheckJob::MinRange { section, other } => {
            checks::check_min_range_satisfies(manifest, *section, *other, ctx.autofix)
        }
        CheckJob::IdenticalVersions {
            section,
            groups,
            only_warns_for,
        } => {
            let mut warn = OnlyWarnsForArrayCheck::new(CFG_ONLY_WARNS_FOR, only_warns_for);
            checks::check_identical_versions(manifest, *section, groups, &mut warn)
        }
        CheckJob::IdenticalVersionsThanDependency {
            dependency,
            section,
            names,
            only_warns_for,
        } => {
            let dependency = ctx.resolver.resolve(dependency)?;
            let mut warn = OnlyWarnsForArrayCheck::new(CFG_ONLY_WARNS_FOR, only_warns_for);
            checks::check_identical_versions_than_dependency(
                manifest,
                *section,
                names,
                &dependency,
                &mut warn,
            )
        }
        CheckJob::SatisfiesVersions {
            section,
            versions,
            only_warns_for,
        } => {
            let mut warn = OnlyWarnsForArrayCheck::new(CFG_ONLY_WARNS_FOR, only_warns_for);
            checks::check_satisfies_versions(manifest, *section, versions, &mut warn)
        }
        CheckJob::SatisfiesVersionsFromDependency {
            dependency,
            dependency_section,
            section,
            names,
            only_warns_for,
        } => {
            let dependency = ctx.resolver.resolve(dependency)?;
            let from = FromDependency {
                dependency: &dependency,
                dependency_section: *dependency_section,
                section: *section,
                names,
            };
            let policy = ctx.exact_policy();
            let is_library = ctx.is_library;
            let should_have_exact_versions =
                move |s: Section| policy.should_have_exact_versions(s, is_library);
            let mut warn = OnlyWarnsForArrayCheck::new(CFG_ONLY_WARNS_FOR, only_warns_for);
            checks::check_satisfies_versions_from_dependency(
                manifest,
                &from,
                &should_have_exact_versions,
                ctx.autofix,
                &mut warn,
            )
        }
        CheckJob::SatisfiesVersionsInDependency {
            dependency,
            expected,
        } => {
            let dependency = ctx.resolver.resolve(dependency)?;
            checks::check_satisfies_versions_in_dependency(manifest, &dependency, expected)
        }
        CheckJob::SatisfiesVersionsBetweenDependencies {
            first,
            second,
            names_by_section,
        } => {
            let first = ctx.resolver.resolve(first)?;
            let second = ctx.resolver.resolve(second)?;
            checks::check_satisfies_versions_between_dependencies(
                manifest,
                &first,
                &second,
                names_by_section,
            )
        }
        CheckJob::NoDependencies { section, move_to } => {
            checks::check_no_dependencies(manifest, *section, *move_to)
        }
    };

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgguard_domain::ResolveError;
    use pkgguard_types::ids;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct MapResolver(BTreeMap<String, Rc<Manifest>>);

    impl MapResolver {
        fn with(mut self, name: &str, version: &str) -> Self {
            let mut manifest = Manifest::new(
                name,
                RepoPath::new(format!("node_modules/{name}/package.json")),
            );
            manifest.version = Some(version.to_string());
            self.0.insert(name.to_string(), Rc::new(manifest));
            self
        }
    }

    impl DependencyResolver for MapResolver {
        fn resolve(&self, name: &str) -> Result<Rc<Manifest>, ResolveError> {
            self.0
                .get(name)
                .cloned()
                .ok_or_else(|| ResolveError::NotFound(name.to_string()))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingWriter(Rc<RefCell<Vec<Manifest>>>);

    impl ManifestWriter for RecordingWriter {
        fn write(&self, manifest: &Manifest) -> anyhow::Result<()> {
            self.0.borrow_mut().push(manifest.clone());
            Ok(())
        }
    }

    fn app() -> Manifest {
        let mut manifest = Manifest::new("app", RepoPath::new("package.json"));
        manifest.private = true;
        manifest
    }

    fn package(manifest: Manifest, resolver: MapResolver) -> (CheckPackage, RecordingWriter) {
        let writer = RecordingWriter::default();
        let package = CheckPackage::new(manifest, Box::new(resolver), Box::new(writer.clone()));
        (package, writer)
    }

    fn check_ids(sink: &ReportSink) -> Vec<&str> {
        sink.findings().iter().map(|f| f.check_id.as_str()).collect()
    }

    #[test]
    fn jobs_run_in_registration_order() {
        let manifest = app()
            .with(Section::Dependencies, "lodash", "4.17.21")
            .with(Section::DevDependencies, "react", "17.0.2");
        let versions: BTreeMap<String, String> =
            [("react".to_string(), "^18.0.0".to_string())].into();

        let (mut first, _) = package(manifest.clone(), MapResolver::default());
        first
            .check_satisfies_versions(Section::DevDependencies, versions.clone(), Vec::new())
            .check_no_dependencies(Section::Dependencies, Section::DevDependencies);
        let mut sink = ReportSink::new();
        first.run(&mut sink).expect("run");
        assert_eq!(
            check_ids(&sink),
            vec![ids::CHECK_SATISFIES_VERSIONS, ids::CHECK_NO_DEPENDENCIES]
        );

        let (mut second, _) = package(manifest, MapResolver::default());
        second
            .check_no_dependencies(Section::Dependencies, Section::DevDependencies)
            .check_satisfies_versions(Section::DevDependencies, versions, Vec::new());
        let mut sink = ReportSink::new();
        second.run(&mut sink).expect("run");
        assert_eq!(
            check_ids(&sink),
            vec![ids::CHECK_NO_DEPENDENCIES, ids::CHECK_SATISFIES_VERSIONS]
        );
    }

    #[test]
    fn failing_job_aborts_the_queue() {
        let manifest = app().with(Section::Dependencies, "lodash", "4.17.21");
        let (mut package, _) = package(manifest, MapResolver::default());
        package
            .check_satisfies_versions_from_dependency(
                "@company/preset",
                Section::Dependencies,
                Section::DevDependencies,
                vec!["eslint".to_string()],
                Vec::new(),
            )
            .check_no_dependencies(Section::Dependencies, Section::DevDependencies);

        let mut sink = ReportSink::new();
        let err = package.run(&mut sink).expect_err("unresolvable dependency");

        assert_eq!(
            err.to_string(),
            "check \"satisfies versions from dependency\" failed for package.json"
        );
        assert!(format!("{err:#}").contains("cannot resolve \"@company/preset\""));
        assert!(sink.is_empty());
    }

    #[test]
    fn autofix_writes_once_even_after_a_failure() {
        let manifest = app().with(Section::DevDependencies, "zod", "^3.0.0");
        let resolver = MapResolver::default().with("zod", "3.22.4");
        let (mut package, writer) = package(manifest, resolver);
        package
            .autofix(true)
            .check_exact_versions(ExactVersionsConfig::default())
            .check_identical_versions_than_dependency(
                "not-installed",
                Section::DevDependencies,
                vec!["zod".to_string()],
                Vec::new(),
            );

        let mut sink = ReportSink::new();
        assert!(package.run(&mut sink).is_err());
        assert!(package.was_fixed());
        assert_eq!(writer.0.borrow().len(), 1);
        assert_eq!(
            writer.0.borrow()[0].range(Section::DevDependencies, "zod"),
            Some("3.22.4")
        );

        // Nothing left to write on a second run.
        assert!(package.run(&mut ReportSink::new()).is_err());
        assert_eq!(writer.0.borrow().len(), 1);
    }

    #[test]
    fn unchanged_manifest_is_not_written() {
        let manifest = app().with(Section::DevDependencies, "zod", "3.22.4");
        let resolver = MapResolver::default().with("zod", "3.22.4");
        let (mut package, writer) = package(manifest, resolver);
        package
            .autofix(true)
            .check_recommended(&RecommendedOptions::default());

        let mut sink = ReportSink::new();
        package.run(&mut sink).expect("run");
        assert!(sink.is_empty());
        assert!(!package.was_fixed());
        assert!(writer.0.borrow().is_empty());
    }

    #[test]
    fn recommended_adds_min_range_checks_for_libraries() {
        let library = Manifest::new("lib", RepoPath::new("package.json"))
            .with(Section::Dependencies, "react", "^17.0.0")
            .with(Section::DevDependencies, "react", "18.2.0");
        let options = RecommendedOptions {
            allow_range_versions_in_dependencies: true,
            ..RecommendedOptions::default()
        };

        let (mut as_library, _) =
            package(library.clone(), MapResolver::default().with("react", "18.2.0"));
        as_library.check_recommended(&options);
        let mut sink = ReportSink::new();
        as_library.run(&mut sink).expect("run");
        assert_eq!(check_ids(&sink), vec![ids::CHECK_MIN_RANGE]);

        // As an application, ranges in dependencies are reported instead.
        let (mut as_app, _) = package(library, MapResolver::default().with("react", "18.2.0"));
        as_app.library(false).check_recommended(&options);
        let mut sink = ReportSink::new();
        as_app.run(&mut sink).expect("run");
        assert_eq!(check_ids(&sink), vec![ids::CHECK_EXACT_VERSIONS]);
    }

    #[test]
    fn custom_explanation_validator() {
        let manifest = app()
            .with(Section::Resolutions, "semver", "7.5.4")
            .with(Section::ResolutionsExplained, "semver", "pinned for a regression");
        let (mut package, _) = package(manifest, MapResolver::default());
        package.check_resolutions_has_explanation(Some(Box::new(|name: &str, text: &str| {
            (!text.contains("CVE-")).then(|| format!("{name}: reference the advisory"))
        })));

        let mut sink = ReportSink::new();
        package.run(&mut sink).expect("run");
        assert_eq!(sink.findings().len(), 1);
        assert_eq!(sink.findings()[0].code, ids::CODE_INVALID_EXPLANATION);
        assert_eq!(
            sink.findings()[0].details.as_deref(),
            Some("semver: reference the advisory")
        );
    }
}
