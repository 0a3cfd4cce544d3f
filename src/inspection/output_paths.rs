//! Best-effort per-configuration output directories
//!
//! A narrow MSBuild reader: it only looks at `Configuration` conditions on
//! property groups and the `OutputPath` property. Imports, item functions and
//! SDK defaults beyond `bin\<Configuration>\` are not evaluated.

use crate::fs::FileSystem;
use regex::Regex;
use roxmltree::{Document, Node};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const DEFAULT_PLATFORM: &str = "AnyCPU";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to read project: {0}")]
    Read(String),

    #[error("Malformed project XML")]
    Xml(#[from] roxmltree::Error),

    #[error("Root element is not <Project>")]
    NotAProject,

    #[error("Invalid condition pattern")]
    Pattern(#[from] regex::Error),
}

/// Output directories for every configuration the project declares.
///
/// Never fails: any problem is logged and yields an empty list.
pub fn probe(fs: &dyn FileSystem, project_path: &Path) -> Vec<String> {
    debug!(project = %project_path.display(), "Attempting to parse configuration output paths");

    match find_output_paths(fs, project_path) {
        Ok(paths) => {
            debug!("Found {} output paths", paths.len());
            paths
        }
        Err(e) => {
            debug!(error = %e, "Skipping configuration output paths");
            Vec::new()
        }
    }
}

struct PropertyGroup {
    configuration: Option<(String, Option<String>)>,
    conditioned: bool,
    output_path: Option<String>,
}

fn find_output_paths(fs: &dyn FileSystem, project_path: &Path) -> Result<Vec<String>, ProbeError> {
    let content = fs
        .read_to_string(project_path)
        .map_err(|e| ProbeError::Read(format!("{:#}", e)))?;
    let doc = Document::parse(&content)?;
    let root = doc.root_element();
    if !root.has_tag_name("Project") {
        return Err(ProbeError::NotAProject);
    }

    let condition = Regex::new(
        r"'\$\(Configuration\)(?:\|\$\(Platform\))?'\s*==\s*'(?P<config>[^'|]*)(?:\|(?P<platform>[^']*))?'",
    )?;

    let groups: Vec<PropertyGroup> = root
        .children()
        .filter(|n| n.has_tag_name("PropertyGroup"))
        .map(|group| read_group(group, &condition))
        .collect();

    let mut configurations: Vec<&str> = Vec::new();
    for (name, _) in groups.iter().filter_map(|g| g.configuration.as_ref()) {
        if !name.is_empty() && !configurations.contains(&name.as_str()) {
            configurations.push(name);
        }
    }

    let project_dir = project_path.parent().unwrap_or(Path::new(""));
    let unconditioned = groups
        .iter()
        .filter(|g| !g.conditioned)
        .filter_map(|g| g.output_path.as_deref())
        .last();

    Ok(configurations
        .into_iter()
        .map(|configuration| {
            let matched = groups.iter().find(|g| {
                g.output_path.is_some()
                    && g.configuration.as_ref().map(|(c, _)| c.as_str()) == Some(configuration)
            });
            let platform = matched
                .and_then(|g| g.configuration.as_ref())
                .and_then(|(_, p)| p.as_deref())
                .unwrap_or(DEFAULT_PLATFORM);
            let raw = matched
                .and_then(|g| g.output_path.clone())
                .or_else(|| unconditioned.map(str::to_string))
                .unwrap_or_else(|| format!(r"bin\{}\", configuration));

            let relative = raw
                .replace("$(Configuration)", configuration)
                .replace("$(Platform)", platform)
                .replace('\\', "/");
            let full = project_dir.join(relative.trim_end_matches('/'));
            debug!(configuration, path = %full.display(), "Found output path");
            full.to_string_lossy().to_string()
        })
        .collect())
}

fn read_group(group: Node<'_, '_>, condition: &Regex) -> PropertyGroup {
    let condition_text = group.attribute("Condition");
    let configuration = condition_text
        .and_then(|text| condition.captures(text))
        .map(|caps| {
            (
                caps["config"].trim().to_string(),
                caps.name("platform").map(|p| p.as_str().trim().to_string()),
            )
        });
    let output_path = group
        .children()
        .find(|n| n.has_tag_name("OutputPath"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    PropertyGroup {
        configuration,
        conditioned: condition_text.is_some(),
        output_path,
    }
}
