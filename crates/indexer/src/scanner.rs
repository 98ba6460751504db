use owlset_graph::GrammarRegistry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Which parts of a repository the scanner walks into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory names pruned wherever they appear
    pub ignored_dirs: Vec<String>,
    /// Skip files whose name starts with a dot
    pub skip_dotfiles: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: [
                "node_modules",
                ".git",
                "dist",
                "build",
                "coverage",
                ".next",
                "__pycache__",
                "venv",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            skip_dotfiles: true,
        }
    }
}

/// Files found under a root, split by whether a grammar exists for them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Supported source files in walk order
    pub files: Vec<PathBuf>,
    /// Regular files without a grammar
    pub unsupported: usize,
}

/// Walks a repository in a stable order
pub struct FileScanner<'a> {
    root: PathBuf,
    config: &'a ScanConfig,
    registry: GrammarRegistry,
}

impl<'a> FileScanner<'a> {
    pub fn new(root: impl AsRef<Path>, config: &'a ScanConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
            registry: GrammarRegistry::new(),
        }
    }

    /// Enumerate candidate files, sorted by name at every directory level
    pub fn scan(&self) -> Discovery {
        let mut discovery = Discovery::default();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_ignored_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_file() || self.is_skipped_file(&entry) {
                continue;
            }

            if self.registry.supports(entry.path()) {
                discovery.files.push(entry.into_path());
            } else {
                discovery.unsupported += 1;
            }
        }

        log::debug!(
            "Found {} source files ({} unsupported) under {}",
            discovery.files.len(),
            discovery.unsupported,
            self.root.display()
        );
        discovery
    }

    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.config.ignored_dirs.iter().any(|ignored| *ignored == name)
    }

    fn is_skipped_file(&self, entry: &DirEntry) -> bool {
        self.config.skip_dotfiles && entry.file_name().to_string_lossy().starts_with('.')
    }
}
