//! Solution and project inspection
//!
//! [`dispatch_target`] classifies a target path and runs the matching
//! inspector. A [`SolutionInspector`] expands a `.sln` into member projects
//! and hands each one to a [`ProjectInspector`], which picks a resolver via
//! [`ResolverDispatch`] and builds the project's [`crate::model::Container`].

/// Logs at `info` when the project is verbose, `debug` otherwise.
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod assembly;
pub mod dispatch;
pub mod filter;
pub mod output_paths;
pub mod project;
pub mod solution;
pub mod solution_file;

#[cfg(test)]
pub(crate) mod testing;

pub use assembly::assembly_version;
pub use dispatch::{select_manifest, ResolverDispatch, MANIFEST_PRIORITY};
pub use filter::{is_excluded, ModuleFilter, PatternError};
pub use project::ProjectInspector;
pub use solution::SolutionInspector;
pub use solution_file::ProjectReference;

use crate::config::{ConfigError, InspectionOptions, ProjectOptions, SolutionOptions};
use crate::error::InspectionError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::model::InspectionResult;
use crate::registry::{OfflineRegistry, PackageRegistry};
use crate::resolvers::ResolverTable;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

const SOLUTION_EXTENSION: &str = "sln";
const PROJECT_EXTENSIONS: &[&str] = &["csproj", "fsproj", "vbproj"];

/// Collaborators shared by every inspector in one run.
pub struct InspectionContext {
    fs: Box<dyn FileSystem>,
    registry: Box<dyn PackageRegistry>,
    resolvers: ResolverTable,
}

impl InspectionContext {
    pub fn new(fs: Box<dyn FileSystem>, registry: Box<dyn PackageRegistry>) -> Self {
        Self::with_resolvers(fs, registry, ResolverTable::with_defaults())
    }

    pub fn with_resolvers(
        fs: Box<dyn FileSystem>,
        registry: Box<dyn PackageRegistry>,
        resolvers: ResolverTable,
    ) -> Self {
        Self {
            fs,
            registry,
            resolvers,
        }
    }

    /// Real filesystem and an offline registry for the options' package
    /// repository.
    pub fn for_options(raw: &InspectionOptions) -> Self {
        Self::new(
            Box::new(RealFileSystem::new()),
            Box::new(OfflineRegistry::new(raw.repository_url())),
        )
    }

    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    pub fn registry(&self) -> &dyn PackageRegistry {
        self.registry.as_ref()
    }

    pub fn resolvers(&self) -> &ResolverTable {
        &self.resolvers
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Solution,
    Project,
}

impl TargetKind {
    pub fn of(path: &Path) -> Self {
        let is_solution = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SOLUTION_EXTENSION));
        if is_solution {
            TargetKind::Solution
        } else {
            TargetKind::Project
        }
    }
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

/// Inspection units found at `target`: the solutions (else project files)
/// directly inside a directory, sorted by name. Anything that is not a
/// directory is a unit of its own; a missing file is reported by the
/// inspector that owns it.
pub fn find_targets(fs: &dyn FileSystem, target: &Path) -> Result<Vec<PathBuf>, InspectionError> {
    if !fs.is_dir(target) {
        return Ok(vec![target.to_path_buf()]);
    }

    let entries = fs
        .read_dir(target)
        .map_err(|e| InspectionError::read(target, e))?;
    let mut files: Vec<PathBuf> = entries
        .iter()
        .filter(|entry| entry.is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    files.sort();

    let solutions: Vec<PathBuf> = files
        .iter()
        .filter(|f| has_extension(f, &[SOLUTION_EXTENSION]))
        .cloned()
        .collect();
    if !solutions.is_empty() {
        return Ok(solutions);
    }

    let projects: Vec<PathBuf> = files
        .into_iter()
        .filter(|f| has_extension(f, PROJECT_EXTENSIONS))
        .collect();
    if projects.is_empty() {
        return Err(InspectionError::NotFound {
            kind: "Solution or project",
            path: target.to_path_buf(),
        });
    }
    Ok(projects)
}

/// Inspects every unit found at the raw options' target path.
///
/// Configuration errors and a directory with nothing to inspect are returned
/// as `Err`; every other failure, a missing target file included, is
/// reported inside the corresponding result.
pub fn dispatch_target(
    raw: &InspectionOptions,
    context: &InspectionContext,
) -> Result<Vec<InspectionResult>, InspectionError> {
    let target = match &raw.target_path {
        Some(path) if !path.as_os_str().is_empty() => path.clone(),
        _ => return Err(ConfigError::MissingTargetPath.into()),
    };

    let repository_url = raw.repository_url();
    if repository_url != context.registry().repository_url() {
        warn!(
            requested = %repository_url,
            registry = context.registry().repository_url(),
            "Package repository differs from the registry in use"
        );
    }

    let targets = find_targets(context.fs(), &target)?;
    info!(target = %target.display(), "Found {} inspection targets", targets.len());

    let mut results = Vec::with_capacity(targets.len());
    for path in targets {
        let unit = InspectionOptions {
            target_path: Some(path.clone()),
            ..raw.clone()
        };
        let result = match TargetKind::of(&path) {
            TargetKind::Solution => {
                SolutionInspector::new(SolutionOptions::resolve(&unit)?, context).inspect()
            }
            TargetKind::Project => {
                let options = ProjectOptions::resolve(&unit, context.fs())?;
                ProjectInspector::new(options, context).inspect()
            }
        };
        results.push(result);
    }
    Ok(results)
}

/// Lexically resolves `relative` (either separator style) against `base`,
/// folding `.` and `..` without touching the filesystem.
pub fn resolve_relative(base: &Path, relative: &str) -> PathBuf {
    let joined = base.join(relative.replace('\\', "/"));
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn test_target_kind() {
        assert_eq!(TargetKind::of(Path::new("/src/App.sln")), TargetKind::Solution);
        assert_eq!(TargetKind::of(Path::new("/src/App.SLN")), TargetKind::Solution);
        assert_eq!(TargetKind::of(Path::new("/src/App.csproj")), TargetKind::Project);
        assert_eq!(TargetKind::of(Path::new("/src/App.vbproj")), TargetKind::Project);
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative(Path::new("/src"), r"Web\Web.csproj"),
            PathBuf::from("/src/Web/Web.csproj")
        );
        assert_eq!(
            resolve_relative(Path::new("/src/app"), r"..\lib\.\Lib.csproj"),
            PathBuf::from("/src/lib/Lib.csproj")
        );
        assert_eq!(
            resolve_relative(Path::new("/src"), "/abs/Abs.csproj"),
            PathBuf::from("/abs/Abs.csproj")
        );
    }

    #[test]
    fn test_directory_prefers_solutions() {
        let fs = MockFileSystem::new();
        fs.add_file("/repo/b.sln", "");
        fs.add_file("/repo/a.sln", "");
        fs.add_file("/repo/App.csproj", "<Project />");
        fs.add_file("/repo/README.md", "");

        let targets = find_targets(&fs, Path::new("/repo")).unwrap();
        assert_eq!(
            targets,
            vec![PathBuf::from("/repo/a.sln"), PathBuf::from("/repo/b.sln")]
        );
    }

    #[test]
    fn test_directory_falls_back_to_projects() {
        let fs = MockFileSystem::new();
        fs.add_file("/repo/Lib.fsproj", "<Project />");
        fs.add_file("/repo/App.csproj", "<Project />");
        fs.add_file("/repo/notes.txt", "");

        let targets = find_targets(&fs, Path::new("/repo")).unwrap();
        assert_eq!(
            targets,
            vec![PathBuf::from("/repo/App.csproj"), PathBuf::from("/repo/Lib.fsproj")]
        );
    }

    #[test]
    fn test_empty_directory_is_not_found() {
        let fs = MockFileSystem::new();
        fs.add_file("/repo/notes.txt", "");
        assert!(matches!(
            find_targets(&fs, Path::new("/repo")),
            Err(InspectionError::NotFound { .. })
        ));
    }

    #[test]
    fn test_file_targets_are_taken_as_given() {
        let fs = MockFileSystem::new();
        fs.add_file("/repo/App.sln", "");
        assert_eq!(
            find_targets(&fs, Path::new("/repo/App.sln")).unwrap(),
            vec![PathBuf::from("/repo/App.sln")]
        );
        assert_eq!(
            find_targets(&fs, Path::new("/repo/Missing.sln")).unwrap(),
            vec![PathBuf::from("/repo/Missing.sln")]
        );
    }

    #[test]
    fn test_dispatch_reports_missing_files_as_results() {
        let context = InspectionContext::new(
            Box::new(MockFileSystem::new()),
            Box::new(OfflineRegistry::default()),
        );
        let raw = InspectionOptions {
            ignore_failure: true,
            ..InspectionOptions::for_target("/repo/Missing.sln")
        };

        let results = dispatch_target(&raw, &context).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, crate::model::InspectionStatus::Error);
        assert!(results[0].containers.is_empty());
        assert!(results[0].failure.as_deref().unwrap().contains("not found"));

        let results =
            dispatch_target(&InspectionOptions::for_target("/repo/Gone/Gone.csproj"), &context)
                .unwrap();
        assert_eq!(results[0].status, crate::model::InspectionStatus::Error);
        assert!(results[0].failure.as_deref().unwrap().contains("Project file"));
    }

    #[test]
    fn test_context_registry_follows_options() {
        let raw = InspectionOptions {
            packages_repo_url: Some("https://nuget.example/v3/index.json".to_string()),
            ..InspectionOptions::for_target("/src/App.sln")
        };
        let context = InspectionContext::for_options(&raw);
        assert_eq!(
            context.registry().repository_url(),
            "https://nuget.example/v3/index.json"
        );

        let context = InspectionContext::for_options(&InspectionOptions::for_target("/src/App.sln"));
        assert_eq!(
            context.registry().repository_url(),
            crate::config::DEFAULT_PACKAGES_REPO_URL
        );
    }

    #[test]
    fn test_dispatch_requires_target() {
        let context = InspectionContext::new(
            Box::new(MockFileSystem::new()),
            Box::new(OfflineRegistry::default()),
        );
        let err = dispatch_target(&InspectionOptions::default(), &context).unwrap_err();
        assert!(matches!(
            err,
            InspectionError::Configuration(ConfigError::MissingTargetPath)
        ));
    }

    #[test]
    fn test_dispatch_routes_by_extension() {
        let fs = MockFileSystem::new();
        fs.add_file("/repo/App.sln", "");
        fs.add_file(
            "/repo/Tool/Tool.csproj",
            r#"<Project Sdk="Microsoft.NET.Sdk" />"#,
        );
        let context = InspectionContext::new(Box::new(fs), Box::new(OfflineRegistry::default()));

        let results =
            dispatch_target(&InspectionOptions::for_target("/repo/App.sln"), &context).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].containers[0].kind, crate::model::ContainerKind::Solution);

        let results = dispatch_target(
            &InspectionOptions::for_target("/repo/Tool/Tool.csproj"),
            &context,
        )
        .unwrap();
        assert_eq!(results[0].containers[0].kind, crate::model::ContainerKind::Project);
    }
}
