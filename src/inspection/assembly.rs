//! Project version lookup from assembly attributes

use crate::fs::FileSystem;
use regex::Regex;
use std::path::Path;
use tracing::debug;

const ASSEMBLY_INFO_FILES: &[&str] = &[
    "Properties/AssemblyInfo.cs",
    "Properties/AssemblyInfo.vb",
    "My Project/AssemblyInfo.vb",
    "AssemblyInfo.fs",
];

/// Reads the declared assembly version of the project in `project_dir`.
///
/// `AssemblyVersion` wins over `AssemblyFileVersion`; `None` when no
/// attribute file exists or neither attribute is declared.
pub fn assembly_version(fs: &dyn FileSystem, project_dir: &Path) -> Option<String> {
    let version = Regex::new(r#"Assembly(File)?Version(?:Attribute)?\s*\(\s*"([^"]+)"\s*\)"#).ok()?;

    for candidate in ASSEMBLY_INFO_FILES {
        let path = project_dir.join(candidate);
        if !fs.is_file(&path) {
            continue;
        }

        let Ok(content) = fs.read_to_string(&path) else {
            debug!(path = %path.display(), "Unreadable assembly info file");
            continue;
        };

        let mut file_version = None;
        for caps in version.captures_iter(&content) {
            let value = caps[2].trim().to_string();
            if caps.get(1).is_none() {
                return Some(value);
            }
            file_version.get_or_insert(value);
        }
        if file_version.is_some() {
            return file_version;
        }
    }

    None
}
