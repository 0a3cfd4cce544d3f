use super::{DirEntry, FileSystem, FileType};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = if path.is_dir() {
                FileType::Directory
            } else {
                FileType::File
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_project_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("obj")).unwrap();
        fs::write(base.join("App.csproj"), "<Project />").unwrap();
        fs::write(base.join("obj/project.assets.json"), "{}").unwrap();

        dir
    }

    #[test]
    fn test_exists_and_kinds() {
        let temp = create_project_dir();
        let fs = RealFileSystem::new();

        assert!(fs.exists(&temp.path().join("App.csproj")));
        assert!(fs.is_file(&temp.path().join("obj/project.assets.json")));
        assert!(fs.is_dir(&temp.path().join("obj")));
        assert!(!fs.exists(&temp.path().join("packages.config")));
    }

    #[test]
    fn test_read_to_string() {
        let temp = create_project_dir();
        let fs = RealFileSystem::new();

        let content = fs.read_to_string(&temp.path().join("App.csproj")).unwrap();
        assert_eq!(content, "<Project />");
    }

    #[test]
    fn test_read_dir() {
        let temp = create_project_dir();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(temp.path()).unwrap();
        let mut names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();
        names.sort();

        assert_eq!(names, vec!["App.csproj", "obj"]);
        assert!(entries
            .iter()
            .any(|e| e.file_name() == "App.csproj" && e.is_file()));
    }
}
