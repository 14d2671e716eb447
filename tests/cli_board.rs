use assert_cmd::Command;
use predicates::boolean::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn quadro(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quadro").expect("binary");
    cmd.current_dir(dir.path()).env("QUADRO_DATA_DIR", dir.path());
    cmd
}

fn add_task(dir: &TempDir, description: &str) -> i64 {
    let output = quadro(dir)
        .args(["add", description, "--json"])
        .output()
        .expect("run quadro add");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json envelope");
    value["data"]["id"].as_i64().expect("task id")
}

#[test]
fn add_then_list_shows_the_task() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "Buy milk");

    quadro(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(contains("Buy milk"));
}

#[test]
fn status_command_moves_between_columns() {
    let dir = TempDir::new().unwrap();
    let id = add_task(&dir, "Buy milk");

    quadro(&dir)
        .args(["status", &id.to_string(), "done"])
        .assert()
        .success()
        .stdout(contains("moved to done"));

    quadro(&dir)
        .args(["ls", "--status", "done"])
        .assert()
        .success()
        .stdout(contains("Buy milk"));
}

#[test]
fn stats_reflect_a_completed_task() {
    let dir = TempDir::new().unwrap();
    let id = add_task(&dir, "Buy milk");

    quadro(&dir)
        .args(["status", &id.to_string(), "done", "--quiet"])
        .assert()
        .success();

    let output = quadro(&dir).args(["stats", "--json"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["schema_version"], "quadro.v1");
    assert_eq!(value["data"]["todo"], 0);
    assert_eq!(value["data"]["progress"], 0);
    assert_eq!(value["data"]["done"], 1);
    assert_eq!(value["data"]["total"], 1);
}

#[test]
fn drag_moves_and_same_column_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let id = add_task(&dir, "Buy milk");

    quadro(&dir)
        .args(["drag", &id.to_string(), "progress"])
        .assert()
        .success()
        .stdout(contains("dragged from todo to progress"));

    quadro(&dir)
        .args(["drag", &id.to_string(), "progress"])
        .assert()
        .success()
        .stdout(contains("stayed in progress"));
}

#[test]
fn invalid_status_is_a_user_error() {
    let dir = TempDir::new().unwrap();
    let id = add_task(&dir, "Buy milk");

    quadro(&dir)
        .args(["status", &id.to_string(), "doing"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Invalid status"));
}

#[test]
fn unknown_task_is_a_user_error() {
    let dir = TempDir::new().unwrap();

    quadro(&dir)
        .args(["rm", "424242"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Task not found"));
}

#[test]
fn blank_description_is_rejected() {
    let dir = TempDir::new().unwrap();

    quadro(&dir)
        .args(["add", "   "])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("cannot be empty"));
}

#[test]
fn search_filters_listing() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "Buy milk");
    add_task(&dir, "Walk the dog");

    let output = quadro(&dir)
        .args(["ls", "--search", "milk"])
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Buy milk"));
    assert!(!stdout.contains("Walk the dog"));
}

#[test]
fn export_then_import_restores_the_board() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "Buy milk");
    add_task(&dir, "Call the bank");

    let export_path = dir.path().join("backup.json");
    quadro(&dir)
        .args(["export", "--output"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(contains("Exported 2 task(s)"));

    quadro(&dir).args(["clear", "--quiet"]).assert().success();

    quadro(&dir)
        .arg("import")
        .arg(&export_path)
        .assert()
        .success()
        .stdout(contains("Imported 2 task(s), skipped 0"));

    quadro(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(contains("Buy milk").and(contains("Call the bank")));
}

#[test]
fn malformed_import_fails_and_keeps_the_board() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "keep me");

    let bad_path = dir.path().join("bad.json");
    std::fs::write(&bad_path, "{\"not\": \"an array\"}").unwrap();

    quadro(&dir)
        .arg("import")
        .arg(&bad_path)
        .assert()
        .failure()
        .code(2)
        .stderr(contains("Import rejected"));

    quadro(&dir)
        .arg("ls")
        .assert()
        .success()
        .stdout(contains("keep me"));
}

#[test]
fn mutating_commands_rerender_the_columns() {
    let dir = TempDir::new().unwrap();
    let id = add_task(&dir, "Buy milk");

    // The renderer observer prints the column summary after the change.
    quadro(&dir)
        .args(["status", &id.to_string(), "progress"])
        .assert()
        .success()
        .stdout(contains("todo:0 | progress:1 | done:0"));
}

#[test]
fn board_renders_columns() {
    let dir = TempDir::new().unwrap();
    add_task(&dir, "Buy milk");

    quadro(&dir)
        .arg("board")
        .assert()
        .success()
        .stdout(contains("todo (1):").and(contains("progress (0):")));
}

#[test]
fn quiet_suppresses_human_output() {
    let dir = TempDir::new().unwrap();

    let output = quadro(&dir)
        .args(["add", "Buy milk", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
