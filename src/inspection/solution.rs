use super::{resolve_relative, solution_file, InspectionContext, ProjectInspector, ProjectReference};
use crate::config::{ProjectOptions, SolutionOptions};
use crate::error::InspectionError;
use crate::model::{Container, InspectionResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Inspects a `.sln` file and its member projects.
pub struct SolutionInspector<'a> {
    options: SolutionOptions,
    context: &'a InspectionContext,
}

/// A solution member after path resolution and identity assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Member {
    reference: ProjectReference,
    path: PathBuf,
    identity: String,
}

impl<'a> SolutionInspector<'a> {
    pub fn new(options: SolutionOptions, context: &'a InspectionContext) -> Self {
        Self { options, context }
    }

    pub fn options(&self) -> &SolutionOptions {
        &self.options
    }

    /// Top-level entry point. Failures are always reported as an Error
    /// result; `ignore_failure` only applies to individual member projects.
    pub fn inspect(&self) -> InspectionResult {
        match self.container() {
            Ok(container) => InspectionResult::success(
                self.options.solution_name.clone(),
                self.options.shared.output_directory.clone(),
                vec![container],
            ),
            Err(e) => {
                error!(solution = %self.options.solution_name, error = %e, "Error inspecting solution");
                InspectionResult::error(&e)
            }
        }
    }

    pub fn container(&self) -> Result<Container, InspectionError> {
        let started = Instant::now();
        let options = &self.options;
        info!(solution = %options.solution_name, path = %options.target_path.display(), "Processing solution");

        let references = solution_file::parse(self.context.fs(), &options.target_path)?;
        let children = if references.is_empty() {
            info!(solution = %options.solution_name, "No project data found for solution");
            Vec::new()
        } else {
            self.build_children(self.members(references))?
        };

        info!(
            solution = %options.solution_name,
            children = children.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Finished processing solution"
        );
        Ok(Container::solution(
            options.solution_name.clone(),
            options.target_path.clone(),
            children,
        ))
    }

    /// Resolves paths and assigns identities. Colliding names fall back to
    /// the project GUID; colliding paths are only reported.
    fn members(&self, references: Vec<ProjectReference>) -> Vec<Member> {
        let directory = self.options.solution_directory();

        let mut name_counts: HashMap<&str, usize> = HashMap::new();
        for reference in &references {
            *name_counts.entry(reference.name.as_str()).or_default() += 1;
        }
        let duplicate_names: Vec<String> = name_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(name, _)| name.to_string())
            .collect();

        let members: Vec<Member> = references
            .into_iter()
            .map(|reference| {
                let path = resolve_relative(directory, &reference.relative_path);
                let identity = if duplicate_names.contains(&reference.name) {
                    debug!(name = %reference.name, guid = %reference.project_guid, "Duplicate project name, using GUID");
                    reference.project_guid.clone()
                } else {
                    reference.name.clone()
                };
                Member {
                    reference,
                    path,
                    identity,
                }
            })
            .collect();

        let mut path_counts: HashMap<&PathBuf, usize> = HashMap::new();
        for member in &members {
            *path_counts.entry(&member.path).or_default() += 1;
        }
        for (path, count) in path_counts.into_iter().filter(|(_, count)| *count > 1) {
            warn!(path = %path.display(), count, "Project path referenced more than once");
        }

        members
    }

    fn build_children(&self, members: Vec<Member>) -> Result<Vec<Container>, InspectionError> {
        let shared = &self.options.shared;
        let mut children = Vec::with_capacity(members.len());

        for member in members {
            let name = &member.reference.name;
            if !self.context.fs().is_file(&member.path) {
                info!(project = %name, path = %member.path.display(), "Skipping non-existent project");
                continue;
            }
            if shared.modules.is_excluded(name) {
                info!(project = %name, "Project excluded by module filter");
                continue;
            }

            let options = ProjectOptions::for_solution_member(
                &self.options,
                name,
                &member.identity,
                member.path.clone(),
                self.context.fs(),
            )?;
            match ProjectInspector::new(options, self.context).container() {
                Ok(container) => children.push(container),
                Err(e) if shared.ignore_failure => {
                    warn!(project = %name, error = %e, "Error inspecting project, continuing with next project");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(children)
    }
}
