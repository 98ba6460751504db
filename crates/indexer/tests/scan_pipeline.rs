//! End-to-end scans into an in-memory SQLite store

use owlset_graph::{Edge, EdgeKind, GraphService, GraphStore, NodeKind};
use owlset_indexer::{IndexerError, RepositoryIndexer, ScanProgress};
use owlset_store::SqliteGraphStore;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn store() -> Arc<SqliteGraphStore> {
    Arc::new(SqliteGraphStore::in_memory().unwrap())
}

fn calls_edges(store: &SqliteGraphStore) -> Vec<(String, String)> {
    store
        .get_edges()
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == EdgeKind::Calls)
        .map(|e| (e.source_id, e.target_id))
        .collect()
}

fn util_and_main() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "util.py", b"def helper(x):\n    return x + 1\n");
    write(
        dir.path(),
        "main.py",
        b"from util import helper\n\n\ndef run():\n    return helper(1)\n",
    );
    dir
}

#[test]
fn test_helper_scenario_builds_expected_edges_and_context() {
    let repo = util_and_main();
    let store = store();

    let report = RepositoryIndexer::new(store.clone()).scan(repo.path()).unwrap();
    assert_eq!(report.files_indexed, 2);
    assert_eq!(report.definitions, 2);
    assert_eq!(report.calls_linked, 1);
    assert_eq!(report.call_edges, 1);

    assert_eq!(
        store.get_edges().unwrap(),
        vec![
            Edge::new("main.py", "main.py::run", EdgeKind::Defines),
            Edge::new("main.py::run", "util.py::helper", EdgeKind::Calls),
            Edge::new("util.py", "util.py::helper", EdgeKind::Defines),
        ]
    );

    let service = GraphService::new(store).unwrap();
    let ctx = service.get_context("main.py::run").unwrap();
    assert_eq!(ctx.target.code, "def run():\n    return helper(1)");
    assert_eq!(ctx.dependencies.len(), 1);
    assert_eq!(ctx.dependencies[0].name, "helper");
    assert_eq!(ctx.dependencies[0].file_path, "util.py");
}

#[test]
fn test_rescan_is_idempotent() {
    let repo = util_and_main();
    write(
        repo.path(),
        "web/app.js",
        b"const load = (url) => fetch(url);\n\nfunction render(items) {\n  items.forEach((item) => draw(item));\n}\n\nfunction draw(item) {\n  return load(item.url);\n}\n",
    );
    let store = store();
    let indexer = RepositoryIndexer::new(store.clone());

    let first = indexer.scan(repo.path()).unwrap();
    let nodes = store.get_all_nodes().unwrap();
    let edges = store.get_edges().unwrap();

    let second = indexer.scan(repo.path()).unwrap();
    assert_eq!(store.get_all_nodes().unwrap(), nodes);
    assert_eq!(store.get_edges().unwrap(), edges);
    assert_eq!(first.call_edges, second.call_edges);
}

#[test]
fn test_javascript_calls_skip_anonymous_callers() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "app.js",
        b"const load = (url) => fetch(url);\n\nfunction render(items) {\n  items.forEach((item) => draw(item));\n}\n\nfunction draw(item) {\n  return load(item.url);\n}\n",
    );
    let store = store();

    let report = RepositoryIndexer::new(store.clone()).scan(dir.path()).unwrap();
    assert_eq!(report.definitions, 4);
    assert_eq!(report.call_sites, 4);
    assert_eq!((report.calls_linked, report.calls_unresolved), (2, 2));
    assert_eq!(
        calls_edges(&store),
        vec![
            ("app.js::draw".to_string(), "app.js::load".to_string()),
            ("app.js::render".to_string(), "app.js::draw".to_string()),
        ]
    );
}

#[test]
fn test_ambiguous_name_resolves_to_one_candidate_every_time() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.py", b"def parse(text):\n    return text\n");
    write(dir.path(), "a.py", b"def parse(text):\n    return text\n");
    write(dir.path(), "c.py", b"def main():\n    return parse(\"x\")\n");
    let store = store();
    let indexer = RepositoryIndexer::new(store.clone());

    indexer.scan(dir.path()).unwrap();
    let expected = vec![("c.py::main".to_string(), "a.py::parse".to_string())];
    assert_eq!(calls_edges(&store), expected);

    indexer.scan(dir.path()).unwrap();
    assert_eq!(calls_edges(&store), expected);
}

#[test]
fn test_local_definition_beats_other_files() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.py", b"def parse(text):\n    return text\n");
    write(
        dir.path(),
        "z.py",
        b"def parse(text):\n    return text\n\n\ndef main():\n    return parse(\"x\")\n",
    );
    let store = store();

    RepositoryIndexer::new(store.clone()).scan(dir.path()).unwrap();
    assert_eq!(
        calls_edges(&store),
        vec![("z.py::main".to_string(), "z.py::parse".to_string())]
    );
}

#[test]
fn test_unresolved_calls_write_nothing() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.py", b"def run():\n    print(\"hi\")\n    os.getcwd()\n");
    let store = store();

    let report = RepositoryIndexer::new(store.clone()).scan(dir.path()).unwrap();
    assert_eq!(report.calls_unresolved, 2);
    assert_eq!(report.call_edges, 0);
    assert!(calls_edges(&store).is_empty());
}

#[test]
fn test_definition_spans_stay_inside_their_files() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "mixed/lib.rs",
        b"fn main() {\n    let run = |x: i32| helper(x);\n    run(1);\n}\n\nfn helper(x: i32) -> i32 { x }",
    );
    write(
        dir.path(),
        "mixed/view.tsx",
        b"export function View(): JSX.Element {\n  return <div onClick={() => go()} />;\n}\n",
    );
    write(dir.path(), "mixed/job.py", b"square = lambda x: x * x\n");
    let store = store();

    RepositoryIndexer::new(store.clone()).scan(dir.path()).unwrap();

    let nodes = store.get_all_nodes().unwrap();
    for node in nodes.iter().filter(|n| n.kind == NodeKind::Function) {
        let file = nodes.iter().find(|n| n.id == node.file_path).unwrap();
        assert!(1 <= node.start_line, "{}", node.id);
        assert!(node.start_line <= node.end_line, "{}", node.id);
        assert!(node.end_line <= file.end_line, "{}", node.id);
    }
    assert!(nodes.iter().any(|n| n.id == "mixed/lib.rs::run"));
    assert!(nodes.iter().any(|n| n.id == "mixed/job.py::square"));
}

#[test]
fn test_bad_files_are_skipped_and_counted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "good.py", b"def ok():\n    pass\n");
    write(dir.path(), "latin1.py", b"def caf\xe9():\n    pass\n");
    write(dir.path(), "README.md", b"# readme\n");
    write(dir.path(), "node_modules/dep/index.js", b"function dep() {}\n");
    let store = store();

    let report = RepositoryIndexer::new(store.clone()).scan(dir.path()).unwrap();
    assert_eq!(report.files_discovered, 3);
    assert_eq!(report.files_indexed, 1);
    assert_eq!(report.files_failed, 1);
    assert_eq!(report.files_unsupported, 1);
    assert_eq!(report.files_skipped(), 2);
    assert!(store.get_node("node_modules/dep/index.js").unwrap().is_none());
}

#[test]
fn test_missing_root_fails_before_any_work() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let store = store();

    let err = RepositoryIndexer::new(store.clone()).scan(&missing).unwrap_err();
    assert!(matches!(err, IndexerError::MissingRepositoryRoot(path) if path == missing));
    assert!(store.get_all_nodes().unwrap().is_empty());
}

#[test]
fn test_file_as_root_fails_before_any_work() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.py", b"def run():\n    pass\n");
    let file = dir.path().join("main.py");
    let store = store();

    let err = RepositoryIndexer::new(store.clone()).scan(&file).unwrap_err();
    assert!(matches!(err, IndexerError::MissingRepositoryRoot(path) if path == file));
    assert!(store.get_all_nodes().unwrap().is_empty());
}

#[cfg(unix)]
#[test]
fn test_unreadable_root_fails_before_any_work() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let root = dir.path().join("repo");
    write(&root, "main.py", b"def run():\n    pass\n");
    fs::set_permissions(&root, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through the mode bits; nothing to check then.
    if fs::read_dir(&root).is_ok() {
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let store = store();
    let result = RepositoryIndexer::new(store.clone()).scan(&root);
    fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert!(matches!(err, IndexerError::UnreadableRepositoryRoot { ref path, .. } if *path == root));
    assert!(err.to_string().contains("not readable"));
    assert!(store.get_all_nodes().unwrap().is_empty());
}

#[test]
fn test_progress_events_follow_stage_order() {
    let repo = util_and_main();
    let mut events = Vec::new();

    RepositoryIndexer::new(store())
        .scan_with_progress(repo.path(), |event| events.push(event))
        .unwrap();

    assert_eq!(
        events,
        vec![
            ScanProgress::Discovered { total: 2 },
            ScanProgress::Parsed {
                index: 1,
                total: 2,
                path: "main.py".to_string()
            },
            ScanProgress::Parsed {
                index: 2,
                total: 2,
                path: "util.py".to_string()
            },
            ScanProgress::Linking { files: 2 },
            ScanProgress::Finished,
        ]
    );
}
