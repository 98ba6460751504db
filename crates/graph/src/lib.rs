//! # Owlset Graph
//!
//! Call-graph extraction and queries over a source repository.
//!
//! ## Architecture
//!
//! ```text
//! source file
//!     │
//!     ├──> Grammar Registry (extension -> tree-sitter parser)
//!     │
//!     ├──> Entity Extractor
//!     │      ├─ definitions (functions, methods, lambdas, arrow functions)
//!     │      └─ call sites (callee name + line)
//!     │
//!     ├──> Symbol Linker (name index snapshot -> best target id)
//!     │
//!     └──> Graph Service (petgraph read model over a GraphStore)
//!            ├─ one-hop context: dependencies + usages
//!            └─ function-only projection for visualization
//! ```
//!
//! Persistence is behind [`GraphStore`]; the SQLite implementation lives in
//! `owlset-store` and the scan pipeline in `owlset-indexer`.

mod assembler;
mod error;
mod extractor;
mod graph;
mod language;
mod linker;
mod store;
mod types;

pub use assembler::GraphService;
pub use error::{GraphError, Result, StoreError};
pub use extractor::{extract, line_count, CallSite, Definition, Extraction};
pub use graph::CodeGraph;
pub use language::{GrammarRegistry, GrammarRules, Language, ParserHandle, SyntaxClass, SyntaxTree};
pub use linker::{resolve, NameIndex};
pub use store::GraphStore;
pub use types::{
    definition_id, Connectivity, Context, Dependency, Edge, EdgeKind, FunctionEntry, Node,
    NodeKind, Projection, VisualEdge, VisualNode, ANONYMOUS, HIGH_CONNECTIVITY_DEGREE,
    LOW_CONNECTIVITY_DEGREE,
};
