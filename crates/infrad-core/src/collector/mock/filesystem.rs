//! In-memory mock filesystem for testing collectors without a real `/proc`.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use crate::collector::traits::{FileSystem, FsUsage};

/// In-memory filesystem.
///
/// Stores files, directories, and per-mountpoint capacity figures, allowing
/// tests to simulate arbitrary `/proc` states on any platform.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
    /// Map from mountpoint to canned statvfs results.
    usages: HashMap<PathBuf, FsUsage>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are created automatically.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();

        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }

        self.files.insert(path, content.into());
    }

    /// Adds an empty directory (and its parents).
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.directories.insert(path.clone());

        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }

    /// Adds a `/proc/[pid]/comm` entry for a process.
    pub fn add_comm(&mut self, pid: u32, comm: &str) {
        self.add_file(format!("/proc/{}/comm", pid), format!("{}\n", comm));
    }

    /// Registers canned capacity figures for a mountpoint.
    pub fn add_usage(&mut self, mountpoint: impl AsRef<Path>, total_bytes: u64, avail_bytes: u64) {
        self.usages.insert(
            mountpoint.as_ref().to_path_buf(),
            FsUsage {
                total_bytes,
                avail_bytes,
            },
        );
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        for file_path in self.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &self.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        // Sorted for deterministic iteration in tests.
        let mut entries: Vec<PathBuf> = entries.into_iter().collect();
        entries.sort();
        Ok(entries)
    }

    fn usage(&self, path: &Path) -> io::Result<FsUsage> {
        self.usages.get(path).copied().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no usage registered for {:?}", path),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_file_and_exists() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/meminfo", "MemTotal: 16384 kB\n");

        assert!(fs.exists(Path::new("/proc/meminfo")));
        assert!(fs.exists(Path::new("/proc")));

        let content = fs.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert!(content.starts_with("MemTotal:"));
    }

    #[test]
    fn test_read_dir_lists_direct_children() {
        let mut fs = MockFs::new();
        fs.add_comm(1, "init");
        fs.add_comm(2, "kthreadd");
        fs.add_file("/proc/meminfo", "MemTotal: 1 kB\n");

        let entries = fs.read_dir(Path::new("/proc")).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&PathBuf::from("/proc/1")));
        assert!(entries.contains(&PathBuf::from("/proc/2")));
    }

    #[test]
    fn test_missing_paths_error() {
        let fs = MockFs::new();
        assert!(fs.read_to_string(Path::new("/nope")).is_err());
        assert!(fs.read_dir(Path::new("/nope")).is_err());
        assert!(fs.usage(Path::new("/nope")).is_err());
    }

    #[test]
    fn test_registered_usage_is_returned() {
        let mut fs = MockFs::new();
        fs.add_usage("/", 1000, 400);
        let usage = fs.usage(Path::new("/")).unwrap();
        assert_eq!(usage.total_bytes, 1000);
        assert_eq!(usage.avail_bytes, 400);
    }
}
