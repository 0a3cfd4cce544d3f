//! `project.json` resolver

use super::{
    min_version, ManifestResolver, Resolution, ResolutionError, ResolveRequest, ResolverOutcome,
    Strategy,
};
use crate::model::PackageId;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

pub struct ProjectJsonResolver;

#[derive(Debug, Default, Deserialize)]
struct ProjectJson {
    #[serde(default)]
    dependencies: BTreeMap<String, Declaration>,
    #[serde(default)]
    frameworks: BTreeMap<String, FrameworkSection>,
}

#[derive(Debug, Default, Deserialize)]
struct FrameworkSection {
    #[serde(default)]
    dependencies: BTreeMap<String, Declaration>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Declaration {
    Version(String),
    Detailed {
        #[serde(default)]
        version: Option<String>,
        #[serde(default)]
        target: Option<String>,
    },
}

impl Declaration {
    /// Version of a package declaration; `None` for project references.
    fn package_version(&self) -> Option<String> {
        match self {
            Declaration::Version(version) => min_version(version),
            Declaration::Detailed { target: Some(target), .. }
                if target.eq_ignore_ascii_case("project") =>
            {
                None
            }
            Declaration::Detailed { version, .. } => version.as_deref().and_then(min_version),
        }
    }
}

impl ManifestResolver for ProjectJsonResolver {
    fn strategy(&self) -> Strategy {
        Strategy::ProjectJson
    }

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError> {
        let content = request.read_manifest()?;
        let manifest: ProjectJson =
            serde_json::from_str(&content).map_err(|source| ResolutionError::Json {
                path: request.manifest.to_path_buf(),
                source,
            })?;

        let declarations = manifest
            .dependencies
            .iter()
            .chain(manifest.frameworks.values().flat_map(|f| f.dependencies.iter()));

        let mut resolution = Resolution::default();
        for (name, declaration) in declarations {
            match declaration.package_version() {
                Some(version) => resolution.add_direct(PackageId::new(name.as_str(), version)),
                None => debug!(
                    project = request.project_name,
                    dependency = %name,
                    "Skipping dependency without a package version"
                ),
            }
        }

        Ok(ResolverOutcome::Resolved(resolution))
    }
}
