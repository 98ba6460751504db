use async_trait::async_trait;
use owlset_assistant::{
    question_prompt, summarize_pending, summarize_pending_with_progress, Assistant,
    AssistantError, Summarizer, SummaryReport,
};
use owlset_graph::{Context, GraphStore, Node};
use owlset_store::SqliteGraphStore;
use pretty_assertions::assert_eq;
use std::sync::Mutex;

/// Summarizes by name; fails for names starting with `broken`
#[derive(Default)]
struct FakeSummarizer {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(&self, code: &str, name: &str) -> Result<String, AssistantError> {
        self.seen.lock().unwrap().push(name.to_string());
        if name.starts_with("broken") {
            return Err(AssistantError::RateLimited);
        }
        Ok(format!("{name} has {} lines.", code.lines().count()))
    }
}

struct EchoAssistant;

#[async_trait]
impl Assistant for EchoAssistant {
    async fn ask(&self, question: &str, context: &Context) -> Result<String, AssistantError> {
        Ok(question_prompt(question, context))
    }
}

fn seeded_store() -> SqliteGraphStore {
    let store = SqliteGraphStore::in_memory().unwrap();
    store.upsert_node(&Node::file("util.py", 5)).unwrap();
    store
        .upsert_node(&Node::function("util.py", "helper", 1, 2, "def helper(x):\n    return x + 1"))
        .unwrap();
    store
        .upsert_node(&Node::function("util.py", "broken_one", 4, 5, "def broken_one():\n    pass"))
        .unwrap();
    store
        .upsert_node(&Node::function("util.py", "done", 7, 7, "def done(): pass"))
        .unwrap();
    store.update_summary("util.py::done", "Already there.").unwrap();
    store
}

#[tokio::test]
async fn test_only_unsummarized_functions_are_sent() {
    let store = seeded_store();
    let summarizer = FakeSummarizer::default();

    let report = summarize_pending(&store, &summarizer).await.unwrap();

    assert_eq!(
        report,
        SummaryReport {
            pending: 2,
            summarized: 1,
            failed: 1
        }
    );
    assert_eq!(
        *summarizer.seen.lock().unwrap(),
        vec!["broken_one".to_string(), "helper".to_string()]
    );
    assert_eq!(
        store.get_summary("util.py::helper").unwrap().as_deref(),
        Some("helper has 2 lines.")
    );
    assert_eq!(store.get_summary("util.py::broken_one").unwrap(), None);
    assert_eq!(
        store.get_summary("util.py::done").unwrap().as_deref(),
        Some("Already there.")
    );
    assert_eq!(store.get_summary("util.py").unwrap(), None);
}

#[tokio::test]
async fn test_second_run_retries_only_failures() {
    let store = seeded_store();
    summarize_pending(&store, &FakeSummarizer::default())
        .await
        .unwrap();

    let summarizer = FakeSummarizer::default();
    let mut progress = Vec::new();
    let report = summarize_pending_with_progress(&store, &summarizer, |done, total| {
        progress.push((done, total));
    })
    .await
    .unwrap();

    assert_eq!(report.pending, 1);
    assert_eq!(progress, vec![(1, 1)]);
}

#[tokio::test]
async fn test_assistant_receives_context_prompt() {
    let ctx = Context {
        target: Node::function("main.py", "run", 1, 2, "def run():\n    helper(1)"),
        dependencies: vec![],
        usages: vec!["main".to_string()],
    };

    let answer = EchoAssistant.ask("What is run?", &ctx).await.unwrap();
    assert!(answer.starts_with("TARGET: def run():"));
    assert!(answer.ends_with("QUESTION: What is run?"));
}
