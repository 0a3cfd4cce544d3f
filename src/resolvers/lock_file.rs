//! `project.lock.json` and `obj/project.assets.json` resolvers
//!
//! Both files share the restore output layout: a `targets` map keyed by
//! framework (optionally `framework/runtime`) whose entries are
//! `"Name/Version"` libraries listing their own dependency ranges. Direct
//! dependencies come from `project.frameworks.*.dependencies` (assets) or
//! `projectFileDependencyGroups` (both).

use super::{
    min_version, ManifestResolver, Resolution, ResolutionError, ResolveRequest, ResolverOutcome,
    Strategy,
};
use crate::model::PackageId;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

pub struct ProjectLockJsonResolver;

pub struct ProjectAssetsJsonResolver;

impl ManifestResolver for ProjectLockJsonResolver {
    fn strategy(&self) -> Strategy {
        Strategy::ProjectLockJson
    }

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError> {
        resolve_restore_file(request).map(ResolverOutcome::Resolved)
    }
}

impl ManifestResolver for ProjectAssetsJsonResolver {
    fn strategy(&self) -> Strategy {
        Strategy::ProjectAssetsJson
    }

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError> {
        resolve_restore_file(request).map(ResolverOutcome::Resolved)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestoreFile {
    #[serde(default)]
    targets: BTreeMap<String, BTreeMap<String, TargetLibrary>>,
    #[serde(default)]
    project_file_dependency_groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    project: Option<ProjectSection>,
}

#[derive(Debug, Default, Deserialize)]
struct TargetLibrary {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
}

impl TargetLibrary {
    fn is_package(&self) -> bool {
        self.kind
            .as_deref()
            .map_or(true, |kind| kind.eq_ignore_ascii_case("package"))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProjectSection {
    #[serde(default)]
    frameworks: BTreeMap<String, FrameworkSection>,
}

#[derive(Debug, Default, Deserialize)]
struct FrameworkSection {
    #[serde(default)]
    dependencies: BTreeMap<String, FrameworkDependency>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FrameworkDependency {
    Range(String),
    Detailed {
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        target: Option<String>,
    },
}

fn split_library_key(key: &str) -> Option<(&str, &str)> {
    let (name, version) = key.rsplit_once('/')?;
    if name.is_empty() || version.is_empty() {
        None
    } else {
        Some((name, version))
    }
}

/// Parses `"Name >= 1.0.0"` style dependency group entries.
fn parse_group_entry(entry: &str) -> Option<(&str, Option<String>)> {
    let mut tokens = entry.split_whitespace();
    let name = tokens.next()?;
    let version = tokens.last().and_then(min_version);
    Some((name, version))
}

fn resolve_restore_file(request: &ResolveRequest<'_>) -> Result<Resolution, ResolutionError> {
    let content = request.read_manifest()?;
    let file: RestoreFile = serde_json::from_str(&content).map_err(|source| ResolutionError::Json {
        path: request.manifest.to_path_buf(),
        source,
    })?;

    let mut resolution = Resolution::default();
    // Case-insensitive package name → version, first target wins.
    let mut resolved: HashMap<String, String> = HashMap::new();

    for libraries in file.targets.values() {
        let versions: HashMap<String, String> = libraries
            .iter()
            .filter(|(_, library)| library.is_package())
            .filter_map(|(key, _)| split_library_key(key))
            .map(|(name, version)| (name.to_lowercase(), version.to_string()))
            .collect();

        for (key, library) in libraries.iter().filter(|(_, l)| l.is_package()) {
            let Some((name, version)) = split_library_key(key) else {
                return Err(request.malformed(format!("library key '{}' is not Name/Version", key)));
            };
            let package = PackageId::new(name, version);
            resolution.add_package(package.clone());
            resolved
                .entry(name.to_lowercase())
                .or_insert_with(|| version.to_string());

            for (dependency, range) in &library.dependencies {
                let version = versions
                    .get(&dependency.to_lowercase())
                    .cloned()
                    .or_else(|| min_version(range));
                if let Some(version) = version {
                    resolution.add_edge(package.clone(), PackageId::new(dependency.as_str(), version));
                }
            }
        }
    }

    let mut direct: Vec<(String, Option<String>)> = Vec::new();
    if let Some(project) = &file.project {
        for framework in project.frameworks.values() {
            for (name, dependency) in &framework.dependencies {
                let declared = match dependency {
                    FrameworkDependency::Range(range) => min_version(range),
                    FrameworkDependency::Detailed { target: Some(target), .. }
                        if target.eq_ignore_ascii_case("project") =>
                    {
                        continue
                    }
                    FrameworkDependency::Detailed { version, .. } => {
                        version.as_deref().and_then(min_version)
                    }
                };
                direct.push((name.clone(), declared));
            }
        }
    }
    if direct.is_empty() {
        for entries in file.project_file_dependency_groups.values() {
            for entry in entries {
                if let Some((name, declared)) = parse_group_entry(entry) {
                    direct.push((name.to_string(), declared));
                }
            }
        }
    }

    for (name, declared) in direct {
        match resolved.get(&name.to_lowercase()).cloned().or(declared) {
            Some(version) => resolution.add_direct(PackageId::new(name, version)),
            None => debug!(package = %name, "Direct dependency has no resolvable version"),
        }
    }

    Ok(resolution)
}
