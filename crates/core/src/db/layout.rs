use std::path::{Path, PathBuf};

/// Logical layout of a project on disk.
///
/// This is derived from a chosen root path. It does *not* perform any IO itself.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Root directory of the project.
    pub root: PathBuf,
    /// Directory for internal metadata (.symbridge).
    pub meta_dir: PathBuf,
    /// Path to the project config file (JSON).
    pub project_config_path: PathBuf,
    /// Path to the annotation store file.
    pub store_path: PathBuf,
}

impl ProjectLayout {
    /// Compute the default layout for a project rooted at `root`.
    ///
    /// This does *not* touch the filesystem.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let meta_dir = root.join(".symbridge");
        let project_config_path = meta_dir.join("project.json");
        let store_path = meta_dir.join("annotations.db");

        Self { root, meta_dir, project_config_path, store_path }
    }

    /// Compute a store path string suitable for storing in `ProjectConfig`,
    /// typically as a path relative to `root`.
    pub fn store_path_relative_string(&self) -> String {
        self.relative_string(&self.store_path)
    }

    /// Express `path` relative to `root` when it lives under it.
    pub fn relative_string(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel.to_string_lossy().to_string(),
            Err(_) => path.to_string_lossy().to_string(),
        }
    }

    /// Resolve a config path (relative to root or absolute) to an absolute path.
    pub fn resolve(&self, configured: &str) -> PathBuf {
        let path = Path::new(configured);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
