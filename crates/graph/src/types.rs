use serde::{Deserialize, Serialize};
use std::fmt;

/// Name given to function expressions that have no declared or bound identifier
pub const ANONYMOUS: &str = "anonymous";

/// Degree above which a function is drawn as a hotspot
pub const HIGH_CONNECTIVITY_DEGREE: usize = 5;

/// Degree below which a function is drawn as a leaf
pub const LOW_CONNECTIVITY_DEGREE: usize = 2;

/// Build the node id of a definition: `<relative_path>::<name>`
#[must_use]
pub fn definition_id(file_path: &str, name: &str) -> String {
    format!("{file_path}::{name}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Function,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Function => "function",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "file" => Some(Self::File),
            "function" => Some(Self::Function),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// file -> definition
    Defines,
    /// definition -> definition (linker's best guess)
    Calls,
}

impl EdgeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Defines => "defines",
            Self::Calls => "calls",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "defines" => Some(Self::Defines),
            "calls" => Some(Self::Calls),
            _ => None,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted graph node: one per file and one per definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub code: String,
    pub summary: Option<String>,
}

impl Node {
    /// File node spanning the whole file. The file body is not duplicated into `code`.
    #[must_use]
    pub fn file(file_path: &str, line_count: usize) -> Self {
        let name = file_path.rsplit('/').next().unwrap_or(file_path).to_string();
        Self {
            id: file_path.to_string(),
            name,
            kind: NodeKind::File,
            file_path: file_path.to_string(),
            start_line: 1,
            end_line: line_count.max(1),
            code: String::new(),
            summary: None,
        }
    }

    #[must_use]
    pub fn function(
        file_path: &str,
        name: &str,
        start_line: usize,
        end_line: usize,
        code: impl Into<String>,
    ) -> Self {
        Self {
            id: definition_id(file_path, name),
            name: name.to_string(),
            kind: NodeKind::Function,
            file_path: file_path.to_string(),
            start_line,
            end_line,
            code: code.into(),
            summary: None,
        }
    }

    #[must_use]
    pub fn is_function(&self) -> bool {
        self.kind == NodeKind::Function
    }

    /// Sidebar-style label: `<basename> :: <name>`
    #[must_use]
    pub fn label(&self) -> String {
        let base = self
            .file_path
            .rsplit('/')
            .next()
            .unwrap_or(self.file_path.as_str());
        format!("{base} :: {}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind,
        }
    }
}

/// A resolved callee of the context target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub id: String,
    pub name: String,
    pub summary: Option<String>,
    pub file_path: String,
}

/// One-hop neighbourhood of a definition, handed to the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Context {
    pub target: Node,
    pub dependencies: Vec<Dependency>,
    pub usages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    High,
    Medium,
    Low,
}

impl Connectivity {
    #[must_use]
    pub const fn from_degree(degree: usize) -> Self {
        if degree > HIGH_CONNECTIVITY_DEGREE {
            Self::High
        } else if degree < LOW_CONNECTIVITY_DEGREE {
            Self::Low
        } else {
            Self::Medium
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub file_path: String,
    pub degree: usize,
    pub connectivity: Connectivity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualEdge {
    pub source: String,
    pub target: String,
}

/// Function-only view of the graph for whole-graph rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionEntry {
    pub id: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connectivity_thresholds() {
        assert_eq!(Connectivity::from_degree(0), Connectivity::Low);
        assert_eq!(Connectivity::from_degree(1), Connectivity::Low);
        assert_eq!(Connectivity::from_degree(2), Connectivity::Medium);
        assert_eq!(Connectivity::from_degree(5), Connectivity::Medium);
        assert_eq!(Connectivity::from_degree(6), Connectivity::High);
    }

    #[test]
    fn file_node_uses_basename_and_whole_span() {
        let node = Node::file("src/app/main.py", 0);
        assert_eq!(node.id, "src/app/main.py");
        assert_eq!(node.name, "main.py");
        assert_eq!((node.start_line, node.end_line), (1, 1));
        assert_eq!(node.kind, NodeKind::File);
    }

    #[test]
    fn kinds_round_trip_through_strings() {
        for kind in [EdgeKind::Defines, EdgeKind::Calls] {
            assert_eq!(EdgeKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NodeKind::parse("function"), Some(NodeKind::Function));
        assert_eq!(NodeKind::parse("class"), None);
    }

    #[test]
    fn label_uses_file_basename() {
        let node = Node::function("pkg/util.py", "helper", 1, 2, "def helper(): pass");
        assert_eq!(node.id, "pkg/util.py::helper");
        assert_eq!(node.label(), "util.py :: helper");
    }
}
