use owlset_graph::{Connectivity, Context, Projection};
use std::fmt::Write;

const TARGET_COLOR: &str = "#ff4b4b";
const NEIGHBOUR_COLOR: &str = "#f0f2f6";
const EDGE_COLOR: &str = "#888888";

fn connectivity_color(connectivity: Connectivity) -> &'static str {
    match connectivity {
        Connectivity::High => "#ff4b4b",
        Connectivity::Medium => "#33b5e5",
        Connectivity::Low => "#00c851",
    }
}

/// Graphviz document for the whole function graph, coloured by connectivity
#[must_use]
pub fn projection_to_dot(projection: &Projection) -> String {
    let mut out = String::from("digraph owlset {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n");

    for node in &projection.nodes {
        let _ = writeln!(
            out,
            "  {} [label={}, tooltip={}, fillcolor=\"{}\"];",
            quote(&node.id),
            quote(&node.label),
            quote(&node.file_path),
            connectivity_color(node.connectivity)
        );
    }
    for edge in &projection.edges {
        let _ = writeln!(out, "  {} -> {};", quote(&edge.source), quote(&edge.target));
    }

    out.push_str("}\n");
    out
}

/// Ego graph of one definition: callees to the right, callers to the left
#[must_use]
pub fn context_to_dot(context: &Context) -> String {
    let target = &context.target;
    let mut out = String::from("digraph context {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box, style=\"rounded,filled\", fontname=\"Helvetica\"];\n");
    let _ = writeln!(
        out,
        "  {} [label={}, fillcolor=\"{TARGET_COLOR}\", fontcolor=white];",
        quote(&target.id),
        quote(&target.name)
    );

    for dep in &context.dependencies {
        let _ = writeln!(
            out,
            "  {} [label={}, fillcolor=\"{NEIGHBOUR_COLOR}\"];",
            quote(&dep.id),
            quote(&dep.name)
        );
        let _ = writeln!(
            out,
            "  {} -> {} [color=\"{EDGE_COLOR}\"];",
            quote(&target.id),
            quote(&dep.id)
        );
    }
    for (i, usage) in context.usages.iter().enumerate() {
        let caller = format!("caller:{i}");
        let _ = writeln!(
            out,
            "  {} [label={}, style=\"dashed,filled\", fillcolor=white];",
            quote(&caller),
            quote(usage)
        );
        let _ = writeln!(
            out,
            "  {} -> {} [color=\"{EDGE_COLOR}\"];",
            quote(&caller),
            quote(&target.id)
        );
    }

    out.push_str("}\n");
    out
}

fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
