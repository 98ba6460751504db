use serde::Serialize;

/// Counters collected over one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Regular files left after directory pruning
    pub files_discovered: usize,
    pub files_indexed: usize,
    pub files_unsupported: usize,
    /// Unreadable, non-UTF-8 or unparsable files
    pub files_failed: usize,
    pub definitions: usize,
    pub call_sites: usize,
    /// Call sites resolved to a definition
    pub calls_linked: usize,
    pub calls_unresolved: usize,
    /// Call sites outside every definition
    pub calls_orphaned: usize,
    /// Distinct `calls` edges written
    pub call_edges: usize,
    pub time_ms: u64,
}

impl ScanReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn files_skipped(&self) -> usize {
        self.files_unsupported + self.files_failed
    }
}

/// Progress notifications emitted while a scan runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanProgress {
    Discovered { total: usize },
    Parsed { index: usize, total: usize, path: String },
    Linking { files: usize },
    Finished,
}
