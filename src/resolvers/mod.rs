//! Manifest resolvers
//!
//! A resolver turns one dependency manifest into packages and dependency
//! edges. The inspectors pick exactly one [`Strategy`] per project and look
//! its implementation up in a [`ResolverTable`]; the table can be rebuilt
//! with substitute resolvers for testing.

use crate::fs::FileSystem;
use crate::model::{DependencyEdge, PackageId};
use crate::registry::PackageRegistry;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub mod lock_file;
pub mod packages_config;
pub mod project_json;
pub mod project_xml;
pub mod references;

pub use lock_file::{ProjectAssetsJsonResolver, ProjectLockJsonResolver};
pub use packages_config::PackagesConfigResolver;
pub use project_json::ProjectJsonResolver;
pub use project_xml::ProjectXmlResolver;
pub use references::ProjectReferenceResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strategy {
    PackagesConfig,
    ProjectLockJson,
    ProjectAssetsJson,
    ProjectJson,
    ProjectReferences,
    ProjectXml,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::PackagesConfig => "packages config",
            Strategy::ProjectLockJson => "project lock json",
            Strategy::ProjectAssetsJson => "project assets json",
            Strategy::ProjectJson => "project json",
            Strategy::ProjectReferences => "project references",
            Strategy::ProjectXml => "project xml",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Malformed XML in {path}")]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Malformed JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected content in {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("No {0} resolver registered")]
    MissingResolver(Strategy),

    #[error("Unable to resolve {path}: {reason}")]
    Unresolved { path: PathBuf, reason: String },
}

/// Everything a resolver may consult for one project.
pub struct ResolveRequest<'a> {
    /// Manifest selected for this strategy; the project file itself for the
    /// reference and XML strategies
    pub manifest: &'a Path,
    pub project_name: &'a str,
    pub fs: &'a dyn FileSystem,
    pub registry: &'a dyn PackageRegistry,
}

impl ResolveRequest<'_> {
    pub fn read_manifest(&self) -> Result<String, ResolutionError> {
        self.fs
            .read_to_string(self.manifest)
            .map_err(|e| ResolutionError::Read {
                path: self.manifest.to_path_buf(),
                message: format!("{:#}", e),
            })
    }

    pub fn malformed(&self, message: impl Into<String>) -> ResolutionError {
        ResolutionError::Malformed {
            path: self.manifest.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Packages and edges produced by one resolver run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub packages: BTreeSet<PackageId>,
    pub dependencies: BTreeSet<DependencyEdge>,
    /// Version declared by the project file, when the resolver reads one
    pub project_version: Option<String>,
}

impl Resolution {
    pub fn add_package(&mut self, package: PackageId) {
        self.packages.insert(package);
    }

    /// Records a package the project requires directly.
    pub fn add_direct(&mut self, package: PackageId) {
        self.packages.insert(package.clone());
        self.dependencies.insert(DependencyEdge::from_project(package));
    }

    pub fn add_edge(&mut self, from: PackageId, to: PackageId) {
        self.packages.insert(from.clone());
        self.packages.insert(to.clone());
        self.dependencies.insert(DependencyEdge::between(from, to));
    }
}

/// Result of a resolver that can decline instead of failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverOutcome {
    Resolved(Resolution),
    Unresolved { reason: String },
}

pub trait ManifestResolver: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError>;
}

/// Strategy → resolver lookup
#[derive(Clone)]
pub struct ResolverTable {
    resolvers: HashMap<Strategy, Arc<dyn ManifestResolver>>,
}

impl ResolverTable {
    pub fn new() -> Self {
        Self {
            resolvers: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.register(Arc::new(PackagesConfigResolver));
        table.register(Arc::new(ProjectLockJsonResolver));
        table.register(Arc::new(ProjectAssetsJsonResolver));
        table.register(Arc::new(ProjectJsonResolver));
        table.register(Arc::new(ProjectReferenceResolver));
        table.register(Arc::new(ProjectXmlResolver));
        table
    }

    /// Registers `resolver`, replacing any previous one for its strategy.
    pub fn register(&mut self, resolver: Arc<dyn ManifestResolver>) {
        self.resolvers.insert(resolver.strategy(), resolver);
    }

    pub fn get(&self, strategy: Strategy) -> Result<&dyn ManifestResolver, ResolutionError> {
        self.resolvers
            .get(&strategy)
            .map(|r| r.as_ref())
            .ok_or(ResolutionError::MissingResolver(strategy))
    }
}

impl Default for ResolverTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Lowest version admitted by a NuGet version or range, e.g. `[1.2.0, )` → `1.2.0`.
pub(crate) fn min_version(range: &str) -> Option<String> {
    let trimmed = range
        .trim()
        .trim_start_matches(['[', '('])
        .split(',')
        .next()
        .unwrap_or("")
        .trim_end_matches([']', ')'])
        .trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
