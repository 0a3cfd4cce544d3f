use super::{output_paths, InspectionContext, ResolverDispatch};
use crate::config::ProjectOptions;
use crate::error::InspectionError;
use crate::model::{Container, InspectionResult};
use std::time::Instant;
use tracing::{error, info, warn};

/// Inspects a single project file.
pub struct ProjectInspector<'a> {
    options: ProjectOptions,
    context: &'a InspectionContext,
}

impl<'a> ProjectInspector<'a> {
    pub fn new(options: ProjectOptions, context: &'a InspectionContext) -> Self {
        Self { options, context }
    }

    pub fn options(&self) -> &ProjectOptions {
        &self.options
    }

    /// Top-level entry point for a standalone project.
    ///
    /// With `ignore_failure` set, a failed inspection is reported as a
    /// Success with no containers.
    pub fn inspect(&self) -> InspectionResult {
        match self.containers() {
            Ok(containers) => self.success(containers),
            Err(e) if self.options.shared.ignore_failure => {
                warn!(
                    project = %self.options.project_name,
                    error = %e,
                    "Error inspecting project, ignoring"
                );
                self.success(Vec::new())
            }
            Err(e) => {
                error!(project = %self.options.project_name, error = %e, "Error inspecting project");
                InspectionResult::error(&e)
            }
        }
    }

    /// Containers for this project: none when the module filter excludes it.
    pub fn containers(&self) -> Result<Vec<Container>, InspectionError> {
        if self.options.shared.modules.is_excluded(&self.options.project_name) {
            info!(project = %self.options.project_name, "Project excluded by module filter");
            return Ok(Vec::new());
        }
        Ok(vec![self.container()?])
    }

    /// Resolves the project into a fully populated container.
    pub fn container(&self) -> Result<Container, InspectionError> {
        let started = Instant::now();
        let options = &self.options;
        let verbose = options.shared.verbose;
        progress!(verbose, project = %options.project_name, path = %options.target_path.display(), "Processing project");
        if !self.context.fs().is_file(&options.target_path) {
            return Err(InspectionError::NotFound {
                kind: "Project",
                path: options.target_path.clone(),
            });
        }

        let mut container = Container::project(
            options.project_unique_id.clone(),
            options.version_name.clone(),
            options.target_path.clone(),
        );
        container.output_paths = output_paths::probe(self.context.fs(), &options.target_path);

        let resolution = ResolverDispatch::new(self.context)
            .resolve(options)
            .map_err(|source| InspectionError::Resolution {
                project: options.project_name.clone(),
                source,
            })?;

        if let Some(version) = resolution.project_version {
            container.version = Some(version);
        }
        progress!(
            verbose,
            project = %options.project_name,
            "Found {} dependencies among {} packages",
            resolution.dependencies.len(),
            resolution.packages.len()
        );
        container.packages = Some(resolution.packages);
        container.dependencies = Some(resolution.dependencies);

        progress!(
            verbose,
            project = %options.project_name,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Finished processing project"
        );
        Ok(container)
    }

    fn success(&self, containers: Vec<Container>) -> InspectionResult {
        InspectionResult::success(
            self.options.project_unique_id.clone(),
            self.options.shared.output_directory.clone(),
            containers,
        )
    }
}
