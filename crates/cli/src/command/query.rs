use super::CommandContext;
use crate::render;
use crate::GraphFormat;
use anyhow::{anyhow, Context as _, Result};
use owlset_assistant::NO_SUMMARY;
use owlset_graph::Context;
use std::path::Path;

pub fn context(ctx: &CommandContext, id: &str, json: bool, dot: bool) -> Result<()> {
    let service = ctx.graph_service()?;
    let context = service
        .get_context(id)
        .ok_or_else(|| anyhow!("No node with id '{id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&context)?);
    } else if dot {
        print!("{}", render::context_to_dot(&context));
    } else {
        print_context(&context);
    }
    Ok(())
}

fn print_context(context: &Context) {
    let target = &context.target;
    println!(
        "{} ({}:{}-{})",
        target.name, target.file_path, target.start_line, target.end_line
    );
    if let Some(summary) = &target.summary {
        println!("{summary}");
    }
    if !target.code.is_empty() {
        println!();
        println!("{}", target.code);
    }

    println!();
    println!("Calls:");
    if context.dependencies.is_empty() {
        println!("  (nothing resolved)");
    }
    for dep in &context.dependencies {
        let summary = dep.summary.as_deref().unwrap_or(NO_SUMMARY);
        println!("  - {} ({}): {summary}", dep.name, dep.file_path);
    }

    println!("Called by:");
    if context.usages.is_empty() {
        println!("  (no callers)");
    }
    for usage in &context.usages {
        println!("  - {usage}");
    }
}

pub fn functions(ctx: &CommandContext, filter: Option<&str>) -> Result<()> {
    let service = ctx.graph_service()?;
    let entries = service.find_functions(filter.unwrap_or_default());
    if entries.is_empty() {
        log::info!("No functions match");
    }
    for entry in entries {
        println!("{}\t{}", entry.label, entry.id);
    }
    Ok(())
}

pub fn graph(ctx: &CommandContext, format: GraphFormat, output: Option<&Path>) -> Result<()> {
    let service = ctx.graph_service()?;
    let projection = service.visualization();
    let rendered = match format {
        GraphFormat::Json => serde_json::to_string_pretty(&projection)? + "\n",
        GraphFormat::Dot => render::projection_to_dot(&projection),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Wrote {} functions and {} calls to {}",
                projection.nodes.len(),
                projection.edges.len(),
                path.display()
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
