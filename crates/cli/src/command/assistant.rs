use super::CommandContext;
use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owlset_assistant::{summarize_pending_with_progress, Assistant, ChatAssistant, ChatSummarizer};

pub async fn summarize(ctx: &CommandContext) -> Result<()> {
    let summarizer = ChatSummarizer::new(ctx.chat_client()?, &ctx.config.assistant);
    let store = ctx.open_store()?;

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:30.cyan/blue} {pos:>5}/{len:5} summaries")?
            .progress_chars("##-"),
    );
    let report = summarize_pending_with_progress(&*store, &summarizer, |done, total| {
        bar.set_length(total as u64);
        bar.set_position(done as u64);
    })
    .await?;
    bar.finish_and_clear();

    println!(
        "Summarized {} of {} functions ({} failed)",
        report.summarized, report.pending, report.failed
    );
    Ok(())
}

pub async fn ask(ctx: &CommandContext, id: &str, question: &str) -> Result<()> {
    let service = ctx.graph_service()?;
    let context = service
        .get_context(id)
        .ok_or_else(|| anyhow!("No node with id '{id}'"))?;

    let assistant = ChatAssistant::new(ctx.chat_client()?, &ctx.config.assistant);
    let answer = assistant.ask(question, &context).await?;
    println!("{answer}");
    Ok(())
}
