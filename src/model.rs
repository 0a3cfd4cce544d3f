//! Inspection result model
//!
//! A [`Container`] is one inspected solution or project. Solutions hold their
//! member projects as children one level deep; projects carry the packages
//! and dependency edges produced by whichever manifest resolver was selected.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// A resolved NuGet package identity, unique by `(id, version)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageId {
    pub id: String,
    pub version: String,
}

impl PackageId {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.id, self.version)
    }
}

/// Origin of a dependency edge: the inspected project itself or a package.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencySource {
    Project,
    Package(PackageId),
}

/// Directed edge: `from` directly requires `to`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: DependencySource,
    pub to: PackageId,
}

impl DependencyEdge {
    pub fn from_project(to: PackageId) -> Self {
        Self {
            from: DependencySource::Project,
            to,
        }
    }

    pub fn between(from: PackageId, to: PackageId) -> Self {
        Self {
            from: DependencySource::Package(from),
            to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerKind {
    Project,
    Solution,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerKind::Project => write!(f, "Project"),
            ContainerKind::Solution => write!(f, "Solution"),
        }
    }
}

/// A node in the result tree.
///
/// `packages` and `dependencies` stay `None` when resolution never ran, which
/// is distinct from `Some` of an empty set (resolution ran, found nothing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub version: Option<String>,
    pub source_path: PathBuf,
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    pub output_paths: Vec<String>,
    pub packages: Option<BTreeSet<PackageId>>,
    pub dependencies: Option<BTreeSet<DependencyEdge>>,
    pub children: Vec<Container>,
}

impl Container {
    pub fn project(name: impl Into<String>, version: Option<String>, source_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            version,
            source_path,
            kind: ContainerKind::Project,
            output_paths: Vec::new(),
            packages: None,
            dependencies: None,
            children: Vec::new(),
        }
    }

    /// Builds a solution node; every child must be a project.
    pub fn solution(name: impl Into<String>, source_path: PathBuf, children: Vec<Container>) -> Self {
        debug_assert!(children.iter().all(|c| c.kind == ContainerKind::Project));
        Self {
            name: name.into(),
            version: None,
            source_path,
            kind: ContainerKind::Solution,
            output_paths: Vec::new(),
            packages: None,
            dependencies: None,
            children,
        }
    }

    /// True once a resolver has populated both packages and dependencies.
    pub fn is_resolved(&self) -> bool {
        self.packages.is_some() && self.dependencies.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InspectionStatus {
    Success,
    Error,
}

/// Output envelope of one inspection unit (solution or standalone project).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    pub status: InspectionStatus,
    pub result_name: Option<String>,
    pub output_directory: Option<PathBuf>,
    pub containers: Vec<Container>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl InspectionResult {
    pub fn success(name: impl Into<String>, output_directory: PathBuf, containers: Vec<Container>) -> Self {
        Self {
            status: InspectionStatus::Success,
            result_name: Some(name.into()),
            output_directory: Some(output_directory),
            containers,
            failure: None,
        }
    }

    /// An Error result carries the originating cause and no containers.
    pub fn error(error: &(dyn std::error::Error + 'static)) -> Self {
        Self {
            status: InspectionStatus::Error,
            result_name: None,
            output_directory: None,
            containers: Vec::new(),
            failure: Some(error_chain(error)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == InspectionStatus::Success
    }
}

fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
