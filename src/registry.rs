//! Package registry seam
//!
//! Some resolvers can fill in dependency edges or missing versions by asking
//! a package source. The inspectors never call the registry themselves; they
//! hand it to whichever resolver wants it.

use crate::model::PackageId;
use tracing::trace;

pub trait PackageRegistry: Send + Sync {
    /// Feed URL this registry answers for
    fn repository_url(&self) -> &str;

    /// Direct dependencies of `package`, or `None` when unknown
    fn dependencies_of(&self, package: &PackageId) -> Option<Vec<PackageId>>;

    /// Best version to assume for a reference that declares none
    fn latest_version(&self, package_id: &str) -> Option<String>;
}

/// Registry that knows nothing; resolvers fall back to what the manifests say.
#[derive(Debug, Clone)]
pub struct OfflineRegistry {
    repository_url: String,
}

impl OfflineRegistry {
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
        }
    }
}

impl Default for OfflineRegistry {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PACKAGES_REPO_URL)
    }
}

impl PackageRegistry for OfflineRegistry {
    fn repository_url(&self) -> &str {
        &self.repository_url
    }

    fn dependencies_of(&self, package: &PackageId) -> Option<Vec<PackageId>> {
        trace!(package = %package, "Offline registry has no dependency data");
        None
    }

    fn latest_version(&self, package_id: &str) -> Option<String> {
        trace!(package = package_id, "Offline registry has no version data");
        None
    }
}
