use owlset_graph::Context;
use std::fmt::Write;

/// Keeps answers on the indexed code base
pub const SYSTEM_PROMPT: &str = "\
You are a senior engineer answering questions about one code base.
Only answer questions about this code base. If a question is unrelated to it, \
say that you have no context for that question.
Base every answer on the target code and the dependency summaries provided.";

pub const NO_SUMMARY: &str = "No summary.";

/// One-sentence summary request for a function, code cut to `max_chars`
#[must_use]
pub fn summary_prompt(name: &str, code: &str, max_chars: usize) -> String {
    let (snippet, truncated) = truncate_chars(code, max_chars);
    let ellipsis = if truncated { "..." } else { "" };
    format!("Summarize this function '{name}' in one sentence. Code:\n{snippet}{ellipsis}")
}

/// Target code, callee summaries and the question
#[must_use]
pub fn question_prompt(question: &str, context: &Context) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "TARGET: {}", context.target.code);
    if context.dependencies.is_empty() {
        prompt.push_str("DEPS: none\n");
    } else {
        prompt.push_str("DEPS:\n");
        for dep in &context.dependencies {
            let summary = dep.summary.as_deref().unwrap_or(NO_SUMMARY);
            let _ = writeln!(prompt, "- {}: {summary}", dep.name);
        }
    }
    let _ = write!(prompt, "QUESTION: {question}");
    prompt
}

fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => (&text[..byte], true),
        None => (text, false),
    }
}
