//! Solution (`.sln`) member discovery

use crate::error::InspectionError;
use crate::fs::FileSystem;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

/// Project type of Visual Studio solution folders, which hold no build.
pub const SOLUTION_FOLDER_TYPE_GUID: &str = "{2150E333-8FDC-42A3-9474-1A3956D46DE8}";

/// One `Project(...)` line of a solution file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectReference {
    pub name: String,
    pub relative_path: String,
    pub type_guid: String,
    pub project_guid: String,
}

fn project_line() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r#"^Project\(\s*"(?P<type>[^"]*)"\s*\)\s*=\s*"(?P<name>[^"]*)"\s*,\s*"(?P<path>[^"]*)"\s*,\s*"(?P<guid>[^"]*)""#,
            )
            .ok()
        })
        .as_ref()
}

impl ProjectReference {
    /// Parses `Project("{type}") = "Name", "Path\Name.csproj", "{guid}"`.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = project_line()?.captures(line)?;
        Some(Self {
            name: caps["name"].to_string(),
            relative_path: caps["path"].to_string(),
            type_guid: caps["type"].to_string(),
            project_guid: caps["guid"].to_string(),
        })
    }

    pub fn is_solution_folder(&self) -> bool {
        self.type_guid.eq_ignore_ascii_case(SOLUTION_FOLDER_TYPE_GUID)
    }
}

/// Reads the buildable member projects of `solution_path` in file order.
pub fn parse(fs: &dyn FileSystem, solution_path: &Path) -> Result<Vec<ProjectReference>, InspectionError> {
    if !fs.is_file(solution_path) {
        return Err(InspectionError::NotFound {
            kind: "Solution",
            path: solution_path.to_path_buf(),
        });
    }

    let content = fs
        .read_to_string(solution_path)
        .map_err(|e| InspectionError::read(solution_path, e))?;

    let project_lines: Vec<&str> = content
        .lines()
        .filter(|line| line.starts_with("Project("))
        .collect();

    let projects: Vec<ProjectReference> = project_lines
        .iter()
        .filter_map(|line| ProjectReference::parse(line))
        .filter(|project| !project.is_solution_folder())
        .collect();

    info!(
        solution = %solution_path.display(),
        "Found {} project elements, processed {} project elements for data",
        project_lines.len(),
        projects.len()
    );

    Ok(projects)
}
