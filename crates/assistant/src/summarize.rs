use crate::client::{AssistantConfig, ChatClient};
use crate::error::Result;
use crate::prompts::{question_prompt, summary_prompt, SYSTEM_PROMPT};
use async_trait::async_trait;
use owlset_graph::{Context, GraphStore};
use serde::Serialize;
use std::sync::Arc;

/// Produces a one-sentence description of a function
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, code: &str, name: &str) -> Result<String>;
}

/// Answers a question about a definition given its one-hop context
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, question: &str, context: &Context) -> Result<String>;
}

/// [`Summarizer`] backed by the chat API's summary model
pub struct ChatSummarizer {
    client: Arc<ChatClient>,
    model: String,
    max_snippet_chars: usize,
}

impl ChatSummarizer {
    pub fn new(client: Arc<ChatClient>, config: &AssistantConfig) -> Self {
        Self {
            client,
            model: config.summary_model.clone(),
            max_snippet_chars: config.max_snippet_chars,
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(&self, code: &str, name: &str) -> Result<String> {
        let prompt = summary_prompt(name, code, self.max_snippet_chars);
        self.client.complete(&self.model, None, &prompt).await
    }
}

/// [`Assistant`] backed by the chat API's chat model
pub struct ChatAssistant {
    client: Arc<ChatClient>,
    model: String,
}

impl ChatAssistant {
    pub fn new(client: Arc<ChatClient>, config: &AssistantConfig) -> Self {
        Self {
            client,
            model: config.chat_model.clone(),
        }
    }
}

#[async_trait]
impl Assistant for ChatAssistant {
    async fn ask(&self, question: &str, context: &Context) -> Result<String> {
        let prompt = question_prompt(question, context);
        self.client
            .complete(&self.model, Some(SYSTEM_PROMPT), &prompt)
            .await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryReport {
    /// Function nodes without a summary when the run started
    pub pending: usize,
    pub summarized: usize,
    pub failed: usize,
}

/// Fill in summaries for every function node that has none
pub async fn summarize_pending(
    store: &dyn GraphStore,
    summarizer: &dyn Summarizer,
) -> Result<SummaryReport> {
    summarize_pending_with_progress(store, summarizer, |_, _| {}).await
}

/// Like [`summarize_pending`], calling `on_progress(done, pending)` after each node.
///
/// A failed summary is logged and skipped; store errors abort the run.
pub async fn summarize_pending_with_progress(
    store: &dyn GraphStore,
    summarizer: &dyn Summarizer,
    mut on_progress: impl FnMut(usize, usize),
) -> Result<SummaryReport> {
    let pending: Vec<_> = store
        .get_all_nodes()?
        .into_iter()
        .filter(|node| {
            node.is_function() && node.summary.as_deref().map_or(true, |s| s.trim().is_empty())
        })
        .collect();

    let mut report = SummaryReport {
        pending: pending.len(),
        ..SummaryReport::default()
    };
    log::info!("Summarizing {} functions", report.pending);

    for (i, node) in pending.iter().enumerate() {
        match summarizer.summarize(&node.code, &node.name).await {
            Ok(summary) => {
                store.update_summary(&node.id, &summary)?;
                report.summarized += 1;
            }
            Err(err) => {
                log::warn!("Failed to summarize {}: {err}", node.id);
                report.failed += 1;
            }
        }
        on_progress(i + 1, report.pending);
    }

    log::info!(
        "Summaries written: {}, failed: {}",
        report.summarized,
        report.failed
    );
    Ok(report)
}
