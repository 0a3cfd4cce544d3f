//! Legacy `packages.config` resolver

use super::{ManifestResolver, Resolution, ResolutionError, ResolveRequest, ResolverOutcome, Strategy};
use crate::model::PackageId;
use roxmltree::Document;
use tracing::{debug, warn};

pub struct PackagesConfigResolver;

impl ManifestResolver for PackagesConfigResolver {
    fn strategy(&self) -> Strategy {
        Strategy::PackagesConfig
    }

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError> {
        let content = request.read_manifest()?;
        let doc = Document::parse(&content).map_err(|source| ResolutionError::Xml {
            path: request.manifest.to_path_buf(),
            source,
        })?;

        let mut resolution = Resolution::default();
        for node in doc.descendants().filter(|n| n.has_tag_name("package")) {
            let Some(id) = node.attribute("id").map(str::trim).filter(|id| !id.is_empty()) else {
                warn!(path = %request.manifest.display(), "Skipping package entry without an id");
                continue;
            };

            let version = node
                .attribute("version")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| request.registry.latest_version(id));

            match version {
                Some(version) => resolution.add_direct(PackageId::new(id, version)),
                None => warn!(package = id, "Skipping package without a version"),
            }
        }

        let direct: Vec<PackageId> = resolution.packages.iter().cloned().collect();
        for package in direct {
            if let Some(dependencies) = request.registry.dependencies_of(&package) {
                debug!(package = %package, count = dependencies.len(), "Registry supplied dependencies");
                for dependency in dependencies {
                    resolution.add_edge(package.clone(), dependency);
                }
            }
        }

        Ok(ResolverOutcome::Resolved(resolution))
    }
}
