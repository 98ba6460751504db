use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Languages the call graph understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Rust,
}

impl Language {
    pub const ALL: [Self; 5] = [
        Self::Python,
        Self::JavaScript,
        Self::TypeScript,
        Self::Tsx,
        Self::Rust,
    ];

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Self::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "rs" => Some(Self::Rust),
            _ => None,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Rust => "rust",
        }
    }

    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::Tsx => &["tsx"],
            Self::Rust => &["rs"],
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    /// Structural classification table for this language
    pub fn rules(self) -> &'static GrammarRules {
        match self {
            Self::Python => &PYTHON_RULES,
            Self::JavaScript | Self::TypeScript | Self::Tsx => &ECMASCRIPT_RULES,
            Self::Rust => &RUST_RULES,
        }
    }
}

/// What a syntax node means to the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxClass {
    Definition,
    Call,
    Other,
}

/// Per-language mapping from tree-sitter node kinds to extractor roles.
///
/// Supporting another grammar means adding a table here, not new traversal code.
#[derive(Debug)]
pub struct GrammarRules {
    /// Function, method, lambda and arrow-function forms
    pub definitions: &'static [&'static str],
    /// Call-expression forms; the callee sits in the `function` field
    pub calls: &'static [&'static str],
    /// `(parent_kind, field)` pairs naming an otherwise unnamed definition
    pub bindings: &'static [(&'static str, &'static str)],
    /// `(kind, field)` pairs for member/attribute access; the field holds the callee name
    pub member_access: &'static [(&'static str, &'static str)],
}

impl GrammarRules {
    pub fn classify(&self, kind: &str) -> SyntaxClass {
        if self.definitions.contains(&kind) {
            SyntaxClass::Definition
        } else if self.calls.contains(&kind) {
            SyntaxClass::Call
        } else {
            SyntaxClass::Other
        }
    }

    pub fn binding_field(&self, parent_kind: &str) -> Option<&'static str> {
        self.bindings
            .iter()
            .find(|(kind, _)| *kind == parent_kind)
            .map(|(_, field)| *field)
    }

    pub fn member_field(&self, kind: &str) -> Option<&'static str> {
        self.member_access
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, field)| *field)
    }
}

static PYTHON_RULES: GrammarRules = GrammarRules {
    definitions: &["function_definition", "lambda"],
    calls: &["call"],
    bindings: &[("assignment", "left")],
    member_access: &[("attribute", "attribute")],
};

static ECMASCRIPT_RULES: GrammarRules = GrammarRules {
    definitions: &[
        "function_declaration",
        "generator_function_declaration",
        "function_expression",
        "method_definition",
        "arrow_function",
    ],
    calls: &["call_expression"],
    bindings: &[
        ("variable_declarator", "name"),
        ("pair", "key"),
        ("field_definition", "property"),
        ("public_field_definition", "name"),
    ],
    member_access: &[("member_expression", "property")],
};

static RUST_RULES: GrammarRules = GrammarRules {
    definitions: &["function_item", "closure_expression"],
    calls: &["call_expression"],
    bindings: &[("let_declaration", "pattern")],
    member_access: &[("field_expression", "field"), ("scoped_identifier", "name")],
};

/// Selects a structural parser for a file by its extension
#[derive(Debug, Clone, Copy, Default)]
pub struct GrammarRegistry;

impl GrammarRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Parser for `file_path`, or `None` when the extension is not supported
    pub fn select_parser(&self, file_path: impl AsRef<Path>) -> Option<ParserHandle> {
        let language = Language::from_path(file_path)?;
        match ParserHandle::new(language) {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::error!("Grammar for {} failed to load: {err}", language.as_str());
                None
            }
        }
    }

    pub fn supports(&self, file_path: impl AsRef<Path>) -> bool {
        Language::from_path(file_path).is_some()
    }

    pub fn supported_extensions(&self) -> Vec<&'static str> {
        Language::ALL
            .iter()
            .flat_map(|lang| lang.extensions().iter().copied())
            .collect()
    }
}

/// A tree-sitter parser bound to one language
pub struct ParserHandle {
    language: Language,
    parser: tree_sitter::Parser,
}

impl ParserHandle {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language.tree_sitter_language())
            .map_err(|e| GraphError::Language(format!("Failed to set language: {e}")))?;
        Ok(Self { language, parser })
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    /// Parse source text. Error-recovered trees are returned as-is.
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree> {
        let tree = self.parser.parse(source, None).ok_or_else(|| {
            GraphError::Parse(format!("{} parser produced no tree", self.language.as_str()))
        })?;
        Ok(SyntaxTree {
            language: self.language,
            tree,
        })
    }
}

/// Parsed source together with the language it was parsed as
pub struct SyntaxTree {
    language: Language,
    tree: tree_sitter::Tree,
}

impl SyntaxTree {
    pub const fn language(&self) -> Language {
        self.language
    }

    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }
}
