use std::collections::BTreeSet;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Looks up external executables on an ordered list of directories.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    search_paths: Vec<PathBuf>,
}

impl PathResolver {
    pub fn new(search_paths: Vec<PathBuf>) -> Self {
        Self { search_paths }
    }

    /// Find the first executable called `name`, honouring search order.
    ///
    /// Names containing a `/` are treated as paths and checked directly.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.is_empty() {
            return None;
        }

        if name.contains('/') {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }

        let found = self
            .search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate));

        log::debug!("resolved {} to {:?}", name, found);
        found
    }

    /// Every executable file name reachable through the search paths,
    /// deduplicated and sorted. Unreadable directories are skipped.
    pub fn executables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();

        for dir in &self.search_paths {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                if !is_executable(&entry.path()) {
                    continue;
                }
                if let Ok(name) = entry.file_name().into_string() {
                    names.insert(name);
                }
            }
        }

        names.into_iter().collect()
    }
}

/// Regular file with at least one execute bit set.
fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}
