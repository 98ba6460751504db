use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn owlset(workdir: &Path, db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("owlset").unwrap();
    cmd.current_dir(workdir)
        .env_remove("OWLSET_DB")
        .env("RUST_LOG", "warn")
        .arg("--db")
        .arg(db);
    cmd
}

fn scanned_repo() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let repo = dir.path().join("repo");
    fs::create_dir_all(&repo).unwrap();
    fs::write(repo.join("util.py"), "def helper(x):\n    return x + 1\n").unwrap();
    fs::write(
        repo.join("main.py"),
        "from util import helper\n\n\ndef run():\n    return helper(1)\n",
    )
    .unwrap();

    let db = dir.path().join("data").join("graph.db");
    let output = owlset(dir.path(), &db)
        .arg("scan")
        .arg(&repo)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Indexed 2 of 2 files"), "{stdout}");
    assert!(stdout.contains("Call edges: 1"), "{stdout}");

    (dir, db)
}

#[test]
fn test_context_json_lists_dependency() {
    let (dir, db) = scanned_repo();

    let output = owlset(dir.path(), &db)
        .args(["context", "main.py::run", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["target"]["id"], "main.py::run");
    assert_eq!(value["dependencies"][0]["name"], "helper");
    assert_eq!(value["dependencies"][0]["file_path"], "util.py");
    assert_eq!(value["usages"], serde_json::json!([]));
}

#[test]
fn test_unknown_context_id_fails() {
    let (dir, db) = scanned_repo();

    let output = owlset(dir.path(), &db)
        .args(["context", "main.py::missing"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("main.py::missing"));
}

#[test]
fn test_functions_and_dot_graph() {
    let (dir, db) = scanned_repo();

    let output = owlset(dir.path(), &db)
        .args(["functions", "--filter", "HELP"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "util.py :: helper\tutil.py::helper\n"
    );

    let dot_path = dir.path().join("graph.dot");
    owlset(dir.path(), &db)
        .args(["graph", "--format", "dot", "--output"])
        .arg(&dot_path)
        .assert()
        .success();
    let dot = fs::read_to_string(dot_path).unwrap();
    assert!(dot.starts_with("digraph owlset {"));
    assert!(dot.contains("\"main.py::run\" -> \"util.py::helper\";"));
}

#[test]
fn test_ask_without_api_key_reports_variable() {
    let (dir, db) = scanned_repo();

    let output = owlset(dir.path(), &db)
        .env_remove("MISTRAL_API_KEY")
        .args(["ask", "main.py::run", "what", "does", "it", "return?"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("MISTRAL_API_KEY"));
}

#[test]
fn test_scan_of_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("graph.db");

    owlset(dir.path(), &db)
        .args(["scan", "does-not-exist"])
        .assert()
        .failure();
}
