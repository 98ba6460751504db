use crate::language::{GrammarRules, SyntaxClass, SyntaxTree};
use crate::types::ANONYMOUS;
use tree_sitter::Node;

/// A function-like construct found in one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub name: String,
    pub start_line: usize,
    pub end_line: usize,
    pub code: String,
}

impl Definition {
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.name == ANONYMOUS
    }

    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    #[must_use]
    pub const fn line_span(&self) -> usize {
        self.end_line - self.start_line
    }
}

/// A callee name and the line it is called on, before linking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub callee: String,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub definitions: Vec<Definition>,
    pub calls: Vec<CallSite>,
}

/// Walk a parsed file and collect definitions and call sites in source order.
#[must_use]
pub fn extract(tree: &SyntaxTree, source: &str) -> Extraction {
    let rules = tree.language().rules();
    let mut walker = Walker {
        source,
        rules,
        line_count: line_count(source),
        out: Extraction::default(),
    };
    walker.walk(tree.root_node());
    walker.out
}

/// Number of lines as an editor would show them; never zero.
#[must_use]
pub fn line_count(source: &str) -> usize {
    source.lines().count().max(1)
}

struct Walker<'a> {
    source: &'a str,
    rules: &'static GrammarRules,
    line_count: usize,
    out: Extraction,
}

impl Walker<'_> {
    /// Pre-order walk on a single cursor. Stack use is constant in tree depth.
    fn walk(&mut self, root: Node) {
        let mut cursor = root.walk();
        loop {
            self.visit(cursor.node());
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    fn visit(&mut self, node: Node) {
        // Keyword tokens share kind names with rules (`lambda`), so only named nodes count.
        let class = if node.is_named() {
            self.rules.classify(node.kind())
        } else {
            SyntaxClass::Other
        };
        match class {
            SyntaxClass::Definition => {
                let definition = self.definition(node);
                self.out.definitions.push(definition);
            }
            SyntaxClass::Call => {
                if let Some(callee) = self.callee_name(node) {
                    let line = (node.start_position().row + 1).min(self.line_count);
                    self.out.calls.push(CallSite { callee, line });
                }
            }
            SyntaxClass::Other => {}
        }
    }

    fn definition(&self, node: Node) -> Definition {
        let start = node.start_position();
        let end = node.end_position();

        let start_line = (start.row + 1).min(self.line_count);
        // A node that swallows its trailing newline ends at column 0 of the next row.
        let mut end_line = end.row + 1;
        if end.column == 0 && end.row > start.row {
            end_line -= 1;
        }
        let end_line = end_line.clamp(start_line, self.line_count);

        Definition {
            name: self.definition_name(node),
            start_line,
            end_line,
            code: self.text(node).unwrap_or_default().to_string(),
        }
    }

    /// Own `name` field, else the identifier bound by the parent, else the sentinel.
    fn definition_name(&self, node: Node) -> String {
        node.child_by_field_name("name")
            .or_else(|| {
                let parent = node.parent()?;
                let field = self.rules.binding_field(parent.kind())?;
                parent.child_by_field_name(field)
            })
            .filter(|name| is_identifier_like(name.kind()))
            .and_then(|name| self.text(name))
            .filter(|name| !name.is_empty())
            .map_or_else(|| ANONYMOUS.to_string(), str::to_string)
    }

    /// Property of a member access, or a bare identifier. Other callee shapes are dropped.
    fn callee_name(&self, call: Node) -> Option<String> {
        let function = call.child_by_field_name("function")?;
        let name = match self.rules.member_field(function.kind()) {
            Some(field) => function.child_by_field_name(field)?,
            None if function.kind() == "identifier" => function,
            None => return None,
        };
        if !is_identifier_like(name.kind()) {
            return None;
        }
        self.text(name)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }

    fn text(&self, node: Node) -> Option<&str> {
        self.source.get(node.start_byte()..node.end_byte())
    }
}

fn is_identifier_like(kind: &str) -> bool {
    if kind == "identifier" {
        return true;
    }

    // Composite identifiers include separators (e.g. `crate::foo`).
    if matches!(kind, "scoped_identifier" | "scoped_type_identifier") {
        return false;
    }

    kind.ends_with("_identifier")
}
