//! Per-project resolver selection
//!
//! Manifests are probed by existence only, in a fixed priority order, and the
//! first present one decides the resolver. When none is present the project
//! file itself is read: first by the build-system reference resolver, then,
//! only if that one declines, by the lenient XML scan.

use super::InspectionContext;
use crate::config::{ManifestPaths, ProjectOptions};
use crate::resolvers::{Resolution, ResolutionError, ResolveRequest, ResolverOutcome, Strategy};
use std::path::Path;

/// Manifest probes in priority order.
pub const MANIFEST_PRIORITY: [(Strategy, fn(&ManifestPaths) -> &Path); 4] = [
    (Strategy::PackagesConfig, |m| m.packages_config.as_path()),
    (Strategy::ProjectLockJson, |m| m.project_lock_json.as_path()),
    (Strategy::ProjectAssetsJson, |m| m.project_assets_json.as_path()),
    (Strategy::ProjectJson, |m| m.project_json.as_path()),
];

/// First manifest that exists on disk, with the strategy it selects.
pub fn select_manifest<'a>(
    context: &InspectionContext,
    manifests: &'a ManifestPaths,
) -> Option<(Strategy, &'a Path)> {
    MANIFEST_PRIORITY
        .iter()
        .map(|(strategy, manifest)| (*strategy, manifest(manifests)))
        .find(|(_, path)| context.fs().is_file(path))
}

pub struct ResolverDispatch<'a> {
    context: &'a InspectionContext,
}

impl<'a> ResolverDispatch<'a> {
    pub fn new(context: &'a InspectionContext) -> Self {
        Self { context }
    }

    pub fn resolve(&self, options: &ProjectOptions) -> Result<Resolution, ResolutionError> {
        let verbose = options.shared.verbose;

        if let Some((strategy, manifest)) = select_manifest(self.context, &options.manifests) {
            progress!(verbose, project = %options.project_name, "Using {}: {}", strategy, manifest.display());
            return match self.run(strategy, manifest, options)? {
                ResolverOutcome::Resolved(resolution) => Ok(resolution),
                ResolverOutcome::Unresolved { reason } => Err(ResolutionError::Unresolved {
                    path: manifest.to_path_buf(),
                    reason,
                }),
            };
        }

        let project_file = options.target_path.as_path();
        progress!(verbose, project = %options.project_name, "Attempting reference resolver: {}", project_file.display());
        match self.run(Strategy::ProjectReferences, project_file, options)? {
            ResolverOutcome::Resolved(resolution) => {
                progress!(verbose, project = %options.project_name, "Reference resolver succeeded");
                Ok(resolution)
            }
            ResolverOutcome::Unresolved { reason } => {
                progress!(verbose, project = %options.project_name, reason = %reason, "Using backup XML resolver");
                match self.run(Strategy::ProjectXml, project_file, options)? {
                    ResolverOutcome::Resolved(resolution) => Ok(resolution),
                    ResolverOutcome::Unresolved { reason } => Err(ResolutionError::Unresolved {
                        path: project_file.to_path_buf(),
                        reason,
                    }),
                }
            }
        }
    }

    fn run(
        &self,
        strategy: Strategy,
        manifest: &Path,
        options: &ProjectOptions,
    ) -> Result<ResolverOutcome, ResolutionError> {
        let request = ResolveRequest {
            manifest,
            project_name: &options.project_name,
            fs: self.context.fs(),
            registry: self.context.registry(),
        };
        self.context.resolvers().get(strategy)?.resolve(&request)
    }
}
