//! # Owlset Assistant
//!
//! Chat-model collaborators around the call graph: one-sentence summaries for
//! function nodes, and answers to questions about a definition given its
//! one-hop [`Context`](owlset_graph::Context).
//!
//! Both go through an OpenAI-compatible `/chat/completions` endpoint
//! (Mistral by default). The graph itself never depends on this crate.

mod client;
mod error;
mod prompts;
mod summarize;

pub use client::{AssistantConfig, ChatClient};
pub use error::{AssistantError, Result};
pub use prompts::{question_prompt, summary_prompt, NO_SUMMARY, SYSTEM_PROMPT};
pub use summarize::{
    summarize_pending, summarize_pending_with_progress, Assistant, ChatAssistant, ChatSummarizer,
    Summarizer, SummaryReport,
};
