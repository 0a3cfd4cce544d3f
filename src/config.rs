//! Inspection options
//!
//! [`InspectionOptions`] is the raw, all-optional input assembled by the CLI
//! or read from the environment. It is resolved exactly once into an
//! immutable [`ProjectOptions`] or [`SolutionOptions`]; unset fields are
//! derived from the target path and explicitly supplied values are never
//! overwritten.
//!
//! # Environment Variables
//!
//! - `NUGET_INSPECTOR_OUTPUT_DIRECTORY`: output directory - default: `<cwd>/nuget-inspection`
//! - `NUGET_INSPECTOR_INCLUDED_MODULES`: comma-separated names or patterns to include
//! - `NUGET_INSPECTOR_EXCLUDED_MODULES`: comma-separated names or patterns to exclude
//! - `NUGET_INSPECTOR_IGNORE_FAILURE`: tolerate per-project failures (true|false) - default: false
//! - `NUGET_INSPECTOR_VERBOSE`: verbose per-project logging (true|false) - default: false
//! - `NUGET_INSPECTOR_PACKAGES_REPO_URL`: package repository - default: nuget.org v3 index

use crate::fs::FileSystem;
use crate::inspection::assembly::assembly_version;
use crate::inspection::filter::ModuleFilter;
use serde::Deserialize;
use std::env;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_OUTPUT_DIRECTORY: &str = "nuget-inspection";
pub const DEFAULT_PACKAGES_REPO_URL: &str = "https://api.nuget.org/v3/index.json";

const PACKAGES_CONFIG: &str = "packages.config";
const PROJECT_JSON: &str = "project.json";
const PROJECT_LOCK_JSON: &str = "project.lock.json";
const PROJECT_ASSETS_JSON: &str = "obj/project.assets.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No target path was supplied
    #[error("Must provide a valid options object with a target path")]
    MissingTargetPath,

    #[error("Unable to determine the current directory")]
    CurrentDirectory(#[source] io::Error),

    /// Failed to parse configuration value
    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },
}

/// Raw inspection input. Every field is optional until resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectionOptions {
    pub target_path: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub solution_name: Option<String>,
    pub project_directory: Option<PathBuf>,
    pub packages_config_path: Option<PathBuf>,
    pub project_json_path: Option<PathBuf>,
    pub project_json_lock_path: Option<PathBuf>,
    pub project_assets_json_path: Option<PathBuf>,
    pub project_name: Option<String>,
    pub project_unique_id: Option<String>,
    pub version_name: Option<String>,
    pub included_modules: Option<String>,
    pub excluded_modules: Option<String>,
    pub ignore_failure: bool,
    pub verbose: bool,
    pub packages_repo_url: Option<String>,
}

impl InspectionOptions {
    pub fn for_target(target_path: impl Into<PathBuf>) -> Self {
        Self {
            target_path: Some(target_path.into()),
            ..Default::default()
        }
    }

    /// Reads the `NUGET_INSPECTOR_*` variables on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            output_directory: env_var("OUTPUT_DIRECTORY").map(PathBuf::from),
            included_modules: env_var("INCLUDED_MODULES"),
            excluded_modules: env_var("EXCLUDED_MODULES"),
            ignore_failure: env_flag("IGNORE_FAILURE")?,
            verbose: env_flag("VERBOSE")?,
            packages_repo_url: env_var("PACKAGES_REPO_URL"),
            ..Default::default()
        })
    }

    /// Package repository the run's registry answers for.
    pub fn repository_url(&self) -> String {
        non_blank(&self.packages_repo_url).unwrap_or_else(|| DEFAULT_PACKAGES_REPO_URL.to_string())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(format!("NUGET_INSPECTOR_{}", name))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn env_flag(name: &str) -> Result<bool, ConfigError> {
    match env_var(name) {
        None => Ok(false),
        Some(value) => value
            .trim()
            .to_lowercase()
            .parse::<bool>()
            .map_err(|e| ConfigError::ParseError {
                field: format!("NUGET_INSPECTOR_{}", name),
                error: e.to_string(),
            }),
    }
}

/// Treats empty and whitespace-only strings as unset.
fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

fn absolutize(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .map_err(ConfigError::CurrentDirectory)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Settings a solution hands down unchanged to each member project.
///
/// The package repository is not among them: it belongs to the run's
/// [`crate::registry::PackageRegistry`], see
/// [`crate::inspection::InspectionContext::for_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedOptions {
    pub output_directory: PathBuf,
    pub modules: ModuleFilter,
    pub ignore_failure: bool,
    pub verbose: bool,
}

impl SharedOptions {
    fn resolve(raw: &InspectionOptions) -> Result<Self, ConfigError> {
        let output_directory = match &raw.output_directory {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => absolutize(Path::new(DEFAULT_OUTPUT_DIRECTORY))?,
        };

        Ok(Self {
            output_directory,
            modules: ModuleFilter::parse(
                raw.included_modules.as_deref(),
                raw.excluded_modules.as_deref(),
            ),
            ignore_failure: raw.ignore_failure,
            verbose: raw.verbose,
        })
    }
}

fn require_target(raw: &InspectionOptions) -> Result<PathBuf, ConfigError> {
    match &raw.target_path {
        Some(path) if !path.as_os_str().is_empty() => absolutize(path),
        _ => Err(ConfigError::MissingTargetPath),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionOptions {
    pub target_path: PathBuf,
    pub solution_name: String,
    pub shared: SharedOptions,
}

impl SolutionOptions {
    pub fn resolve(raw: &InspectionOptions) -> Result<Self, ConfigError> {
        let target_path = require_target(raw)?;
        let solution_name = non_blank(&raw.solution_name).unwrap_or_else(|| file_stem(&target_path));

        Ok(Self {
            shared: SharedOptions::resolve(raw)?,
            target_path,
            solution_name,
        })
    }

    pub fn solution_directory(&self) -> &Path {
        self.target_path.parent().unwrap_or(Path::new("/"))
    }
}

/// Locations of the per-project dependency manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestPaths {
    pub packages_config: PathBuf,
    pub project_json: PathBuf,
    pub project_lock_json: PathBuf,
    pub project_assets_json: PathBuf,
}

impl ManifestPaths {
    fn resolve(raw: &InspectionOptions, project_directory: &Path) -> Self {
        let or_default = |explicit: &Option<PathBuf>, relative: &str| match explicit {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => project_directory.join(relative),
        };

        Self {
            packages_config: or_default(&raw.packages_config_path, PACKAGES_CONFIG),
            project_json: or_default(&raw.project_json_path, PROJECT_JSON),
            project_lock_json: or_default(&raw.project_json_lock_path, PROJECT_LOCK_JSON),
            project_assets_json: or_default(&raw.project_assets_json_path, PROJECT_ASSETS_JSON),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOptions {
    pub target_path: PathBuf,
    pub project_directory: PathBuf,
    pub manifests: ManifestPaths,
    pub project_name: String,
    pub project_unique_id: String,
    pub version_name: Option<String>,
    pub shared: SharedOptions,
}

impl ProjectOptions {
    pub fn resolve(raw: &InspectionOptions, fs: &dyn FileSystem) -> Result<Self, ConfigError> {
        let target_path = require_target(raw)?;
        let shared = SharedOptions::resolve(raw)?;
        Self::specialize(raw, target_path, shared, fs)
    }

    /// Options for one member of a solution: inherits the solution's shared
    /// settings and overrides name, identity and target path.
    pub fn for_solution_member(
        parent: &SolutionOptions,
        project_name: &str,
        project_unique_id: &str,
        target_path: PathBuf,
        fs: &dyn FileSystem,
    ) -> Result<Self, ConfigError> {
        let raw = InspectionOptions {
            project_name: Some(project_name.to_string()),
            project_unique_id: Some(project_unique_id.to_string()),
            ..Default::default()
        };
        Self::specialize(&raw, absolutize(&target_path)?, parent.shared.clone(), fs)
    }

    fn specialize(
        raw: &InspectionOptions,
        target_path: PathBuf,
        shared: SharedOptions,
        fs: &dyn FileSystem,
    ) -> Result<Self, ConfigError> {
        let project_directory = match &raw.project_directory {
            Some(dir) if !dir.as_os_str().is_empty() => absolutize(dir)?,
            _ => target_path.parent().unwrap_or(Path::new("/")).to_path_buf(),
        };
        let manifests = ManifestPaths::resolve(raw, &project_directory);
        let project_name = non_blank(&raw.project_name).unwrap_or_else(|| file_stem(&target_path));
        let project_unique_id =
            non_blank(&raw.project_unique_id).unwrap_or_else(|| file_stem(&target_path));
        let version_name =
            non_blank(&raw.version_name).or_else(|| assembly_version(fs, &project_directory));

        Ok(Self {
            target_path,
            project_directory,
            manifests,
            project_name,
            project_unique_id,
            version_name,
            shared,
        })
    }
}
