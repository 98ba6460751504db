use crate::error::{FileError, IndexerError, Result};
use crate::scanner::{FileScanner, ScanConfig};
use crate::stats::{ScanProgress, ScanReport};
use owlset_graph::{
    definition_id, extract, line_count, resolve, Definition, EdgeKind, Extraction, GraphError,
    GraphStore, GrammarRegistry, NameIndex, Node,
};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// One successfully extracted file, kept in memory until linking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    /// Repository-relative path with forward slashes
    pub path: String,
    pub line_count: usize,
    pub extraction: Extraction,
}

/// Resolved `calls` pairs for one file plus linking counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLinks {
    pub edges: Vec<(String, String)>,
    pub linked: usize,
    pub unresolved: usize,
    pub orphaned: usize,
}

/// Builds the call graph of a repository into a [`GraphStore`]
pub struct RepositoryIndexer {
    store: Arc<dyn GraphStore>,
    registry: GrammarRegistry,
    config: ScanConfig,
}

impl RepositoryIndexer {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self::with_config(store, ScanConfig::default())
    }

    pub fn with_config(store: Arc<dyn GraphStore>, config: ScanConfig) -> Self {
        Self {
            store,
            registry: GrammarRegistry::new(),
            config,
        }
    }

    /// Scan `root` and persist nodes and edges
    pub fn scan(&self, root: impl AsRef<Path>) -> Result<ScanReport> {
        self.scan_with_progress(root, |_| {})
    }

    /// Scan `root`, reporting progress after each stage and file
    pub fn scan_with_progress(
        &self,
        root: impl AsRef<Path>,
        mut on_progress: impl FnMut(ScanProgress),
    ) -> Result<ScanReport> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(IndexerError::MissingRepositoryRoot(root.to_path_buf()));
        }
        if let Err(source) = std::fs::read_dir(root) {
            return Err(IndexerError::UnreadableRepositoryRoot {
                path: root.to_path_buf(),
                source,
            });
        }

        let start = Instant::now();
        let mut report = ScanReport::new();
        log::info!("Scanning repository at {}", root.display());

        // 1. Enumerate
        let discovery = FileScanner::new(root, &self.config).scan();
        let total = discovery.files.len();
        report.files_discovered = total + discovery.unsupported;
        report.files_unsupported = discovery.unsupported;
        on_progress(ScanProgress::Discovered { total });

        // 2. Extract and persist per file
        let mut parsed_files = Vec::with_capacity(total);
        for (i, path) in discovery.files.iter().enumerate() {
            let relative = normalize_path(root, path);
            on_progress(ScanProgress::Parsed {
                index: i + 1,
                total,
                path: relative.clone(),
            });

            match self.parse_file(path, &relative) {
                Ok(parsed) => {
                    self.persist_file(&parsed)?;
                    report.files_indexed += 1;
                    report.definitions += parsed.extraction.definitions.len();
                    report.call_sites += parsed.extraction.calls.len();
                    parsed_files.push(parsed);
                }
                Err(FileError::Graph(GraphError::UnsupportedFileType(_))) => {
                    log::debug!("No grammar for {relative}, skipping");
                    report.files_unsupported += 1;
                }
                Err(err) => {
                    log::warn!("Failed to parse {relative}: {err}");
                    report.files_failed += 1;
                }
            }
        }
        log::info!(
            "Parsed {} files: {} definitions, {} call sites",
            report.files_indexed,
            report.definitions,
            report.call_sites
        );

        // 3. Name index snapshot, only after every file is persisted
        let nodes = self.store.get_all_nodes()?;
        let index = NameIndex::from_nodes(&nodes);
        log::debug!("Name index holds {} distinct names", index.len());

        // 4. Link
        on_progress(ScanProgress::Linking {
            files: parsed_files.len(),
        });
        let mut edges = BTreeSet::new();
        for parsed in &parsed_files {
            let links = link_file(parsed, &index);
            report.calls_linked += links.linked;
            report.calls_unresolved += links.unresolved;
            report.calls_orphaned += links.orphaned;
            edges.extend(links.edges);
        }
        for (source, target) in &edges {
            self.store.add_edge(source, target, EdgeKind::Calls)?;
        }
        report.call_edges = edges.len();

        #[allow(clippy::cast_possible_truncation)]
        {
            report.time_ms = start.elapsed().as_millis() as u64;
        }
        on_progress(ScanProgress::Finished);
        log::info!(
            "Scan completed: {} files indexed, {} calls linked, {} unresolved, {} edges in {} ms",
            report.files_indexed,
            report.calls_linked,
            report.calls_unresolved,
            report.call_edges,
            report.time_ms
        );

        Ok(report)
    }

    fn parse_file(&self, path: &Path, relative: &str) -> std::result::Result<ParsedFile, FileError> {
        let mut parser = self
            .registry
            .select_parser(path)
            .ok_or_else(|| GraphError::UnsupportedFileType(relative.to_string()))?;
        let source = std::fs::read_to_string(path)?;
        let tree = parser.parse(&source)?;
        Ok(ParsedFile {
            path: relative.to_string(),
            line_count: line_count(&source),
            extraction: extract(&tree, &source),
        })
    }

    fn persist_file(&self, parsed: &ParsedFile) -> Result<()> {
        self.store
            .upsert_node(&Node::file(&parsed.path, parsed.line_count))?;

        for def in &parsed.extraction.definitions {
            let node = Node::function(
                &parsed.path,
                &def.name,
                def.start_line,
                def.end_line,
                def.code.as_str(),
            );
            self.store.upsert_node(&node)?;
            self.store
                .add_edge(&parsed.path, &node.id, EdgeKind::Defines)?;
        }
        Ok(())
    }
}

/// Attribute each call site of a file to its caller and resolve its target.
///
/// Pure: reads only the file's extraction and the name index snapshot.
#[must_use]
pub fn link_file(parsed: &ParsedFile, index: &NameIndex) -> FileLinks {
    let mut links = FileLinks::default();
    let definitions = &parsed.extraction.definitions;

    for call in &parsed.extraction.calls {
        let Some(caller) = enclosing_definition(definitions, call.line) else {
            log::trace!("{}:{} {} is outside any definition", parsed.path, call.line, call.callee);
            links.orphaned += 1;
            continue;
        };

        match resolve(&parsed.path, &call.callee, index) {
            Some(target) => {
                links.linked += 1;
                links
                    .edges
                    .push((definition_id(&parsed.path, &caller.name), target.to_string()));
            }
            None => {
                log::trace!("{}:{} unresolved call to {}", parsed.path, call.line, call.callee);
                links.unresolved += 1;
            }
        }
    }

    links
}

/// Innermost named definition containing `line`.
///
/// Anonymous definitions are only chosen when no named one encloses the line.
#[must_use]
pub fn enclosing_definition(definitions: &[Definition], line: usize) -> Option<&Definition> {
    let innermost = move |named: bool| {
        definitions
            .iter()
            .rev()
            .filter(|def| def.is_anonymous() != named && def.contains_line(line))
            .min_by_key(|def| def.line_span())
    };
    innermost(true).or_else(|| innermost(false))
}

fn normalize_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut normalized = relative.to_string_lossy().to_string();
    if normalized.contains('\\') {
        normalized = normalized.replace('\\', "/");
    }
    normalized
}
