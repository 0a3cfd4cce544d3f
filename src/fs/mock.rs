use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard};

/// In-memory file tree used to drive inspectors without touching disk.
///
/// Relative paths are rooted at `/mock` (or the root given to
/// [`MockFileSystem::with_root`]); parent directories are created implicitly.
pub struct MockFileSystem {
    files: RwLock<BTreeMap<PathBuf, Option<String>>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = path.parent() {
            ensure_parents(&mut files, parent);
        }
        files.insert(path, Some(content.to_string()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap_or_else(|e| e.into_inner());
        ensure_parents(&mut files, &path);
    }

    fn normalize_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn entries(&self) -> RwLockReadGuard<'_, BTreeMap<PathBuf, Option<String>>> {
        self.files.read().unwrap_or_else(|e| e.into_inner())
    }
}

fn ensure_parents(files: &mut BTreeMap<PathBuf, Option<String>>, path: &Path) {
    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component);
        files.entry(current.clone()).or_insert(None);
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entries().contains_key(&self.normalize_path(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries().get(&self.normalize_path(path)), Some(None))
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.entries().get(&self.normalize_path(path)), Some(Some(_)))
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        match self.entries().get(&path) {
            Some(Some(content)) => Ok(content.clone()),
            Some(None) => Err(anyhow!("Not a file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        let files = self.entries();

        if !matches!(files.get(&path), Some(None)) {
            return Err(anyhow!("Directory not found: {:?}", path));
        }

        Ok(files
            .iter()
            .filter(|(file_path, _)| file_path.parent() == Some(path.as_path()))
            .map(|(file_path, content)| DirEntry {
                path: file_path.clone(),
                name: file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string(),
                file_type: if content.is_some() {
                    FileType::File
                } else {
                    FileType::Directory
                },
            })
            .collect())
    }
}
