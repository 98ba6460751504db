//! # Owlset Indexer
//!
//! Repository scan that turns source files into a persisted call graph.
//!
//! ## Pipeline
//!
//! ```text
//! Repository root
//!     │
//!     ├──> File Scanner (ignored dirs pruned, sorted walk)
//!     │      └─> Supported source files
//!     │
//!     ├──> Parse + extract, per file
//!     │      └─> file nodes, definition nodes, `defines` edges
//!     │
//!     ├──> Name index snapshot (after every file is stored)
//!     │
//!     └──> Link call sites
//!            └─> `calls` edges
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use owlset_indexer::RepositoryIndexer;
//! use owlset_store::SqliteGraphStore;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteGraphStore::open("data/owlset.db")?);
//!     let report = RepositoryIndexer::new(store).scan("/path/to/repo")?;
//!
//!     println!("Indexed {} files, {} calls edges", report.files_indexed, report.call_edges);
//!     Ok(())
//! }
//! ```

mod error;
mod indexer;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use indexer::{enclosing_definition, link_file, FileLinks, ParsedFile, RepositoryIndexer};
pub use scanner::{Discovery, FileScanner, ScanConfig};
pub use stats::{ScanProgress, ScanReport};
