use crate::config::ConfigError;
use crate::resolvers::ResolutionError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that end an inspection unit.
///
/// They unwind to the nearest solution or project boundary, where they are
/// turned into an Error-status [`crate::model::InspectionResult`] unless an
/// ignore-failure flag applies at that exact scope.
#[derive(Debug, Error)]
pub enum InspectionError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("{kind} file {} not found", .path.display())]
    NotFound { kind: &'static str, path: PathBuf },

    #[error("Failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to resolve dependencies of project {project}")]
    Resolution {
        project: String,
        #[source]
        source: ResolutionError,
    },
}

impl InspectionError {
    pub(crate) fn read(path: &std::path::Path, error: anyhow::Error) -> Self {
        InspectionError::Read {
            path: path.to_path_buf(),
            message: format!("{:#}", error),
        }
    }
}
