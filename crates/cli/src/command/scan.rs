use super::CommandContext;
use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owlset_indexer::{RepositoryIndexer, ScanProgress, ScanReport};
use std::path::Path;

pub fn run(ctx: &CommandContext, root: &Path) -> Result<()> {
    let store = ctx.open_store()?;
    let indexer = RepositoryIndexer::with_config(store, ctx.config.scan.clone());

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:30.cyan/blue} {pos:>5}/{len:5} {msg}")?
            .progress_chars("##-"),
    );

    let report = indexer
        .scan_with_progress(root, |event| match event {
            ScanProgress::Discovered { total } => bar.set_length(total as u64),
            ScanProgress::Parsed { index, path, .. } => {
                bar.set_position(index as u64);
                bar.set_message(path);
            }
            ScanProgress::Linking { files } => bar.set_message(format!("linking {files} files")),
            ScanProgress::Finished => bar.finish_and_clear(),
        })
        .with_context(|| format!("Scan of {} failed", root.display()))?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ScanReport) {
    println!(
        "Indexed {} of {} files ({} unsupported, {} failed)",
        report.files_indexed, report.files_discovered, report.files_unsupported, report.files_failed
    );
    println!(
        "Definitions: {}, call sites: {}",
        report.definitions, report.call_sites
    );
    println!(
        "Calls linked: {}, unresolved: {}, outside definitions: {}",
        report.calls_linked, report.calls_unresolved, report.calls_orphaned
    );
    println!("Call edges: {}", report.call_edges);
    println!("Finished in {} ms", report.time_ms);
}
