mod support;

use predicates::str::contains;
use serde_json::Value;

use support::{titles, TestEnv};

#[test]
fn add_returns_item_envelope() {
    let env = TestEnv::new();
    let value = env.json(&[
        "add",
        "Buy milk",
        "-d",
        "two litres",
        "--priority",
        "high",
        "--due",
        "2030-01-02T09:00:00Z",
    ]);

    assert_eq!(value["schema_version"], "todo.v1");
    assert_eq!(value["command"], "add");
    assert_eq!(value["status"], "success");
    let data = &value["data"];
    assert_eq!(data["title"], "Buy milk");
    assert_eq!(data["description"], "two litres");
    assert_eq!(data["status"], "not_started");
    assert_eq!(data["priority"], "high");
    assert_eq!(data["due_date"], "2030-01-02T09:00:00Z");
    assert_eq!(data["overdue"], false);
    assert!(data.get("completion_date").is_none());
    assert!(env.store_path().exists());
}

#[test]
fn add_defaults_due_to_tomorrow_unless_no_due() {
    let env = TestEnv::new();
    let dated = env.json(&["add", "Dated"]);
    let created = chrono::DateTime::parse_from_rfc3339(
        dated["data"]["creation_date"].as_str().expect("created"),
    )
    .expect("rfc3339");
    let due = chrono::DateTime::parse_from_rfc3339(dated["data"]["due_date"].as_str().expect("due"))
        .expect("rfc3339");
    assert_eq!(due - created, chrono::Duration::days(1));

    let undated = env.json(&["add", "Undated", "--no-due"]);
    assert!(undated["data"].get("due_date").is_none());
}

#[test]
fn add_completed_sets_completion_date() {
    let env = TestEnv::new();
    let value = env.json(&["add", "Already done", "--status", "completed"]);
    assert_eq!(value["data"]["status"], "completed");
    assert_eq!(value["data"]["completion_date"], value["data"]["creation_date"]);
}

#[test]
fn blank_title_is_rejected() {
    let env = TestEnv::new();
    env.cmd()
        .args(["add", "   "])
        .assert()
        .code(2)
        .stderr(contains("title cannot be empty"));
    assert!(!env.store_path().exists());
}

#[test]
fn list_sorts_and_filters() {
    let env = TestEnv::new();
    env.add(&["A", "--due", "2030-01-03T00:00:00Z", "--priority", "low"]);
    env.add(&["B", "--no-due", "--priority", "high"]);
    env.add(&["C", "--due", "2030-01-02T00:00:00Z", "--status", "in_progress"]);

    let by_due = env.json(&["list"]);
    assert_eq!(titles(&by_due), vec!["C", "A", "B"]);
    assert_eq!(by_due["data"]["sort"], "due_date");
    assert_eq!(by_due["data"]["total"], 3);

    let by_priority = env.json(&["list", "--sort", "priority"]);
    assert_eq!(titles(&by_priority), vec!["B", "C", "A"]);

    let by_status = env.json(&["list", "--sort", "status"]);
    assert_eq!(titles(&by_status), vec!["C", "A", "B"]);

    let in_progress = env.json(&["list", "--status", "in-progress"]);
    assert_eq!(titles(&in_progress), vec!["C"]);
    assert_eq!(in_progress["data"]["filtered"], true);

    let limited = env.json(&["list", "--limit", "2"]);
    assert_eq!(limited["data"]["shown"], 2);
    assert_eq!(limited["data"]["total"], 3);
}

#[test]
fn list_search_is_case_insensitive() {
    let env = TestEnv::new();
    env.add(&["Buy milk", "--no-due"]);
    env.add(&["Walk dog", "-d", "then get MILKshake", "--no-due"]);
    env.add(&["Read book", "--no-due"]);

    let found = env.json(&["list", "-s", "Milk", "--sort", "title"]);
    assert_eq!(titles(&found), vec!["Buy milk", "Walk dog"]);
}

#[test]
fn list_rejects_unknown_sort() {
    let env = TestEnv::new();
    env.cmd()
        .args(["list", "--sort", "size"])
        .assert()
        .code(2)
        .stderr(contains("unknown sort"));
}

#[test]
fn show_accepts_unique_prefix() {
    let env = TestEnv::new();
    let id = env.add(&["Only one"]);
    let prefix = &id[..id.len() - 4];

    let shown = env.json(&["show", &prefix.to_uppercase()]);
    assert_eq!(shown["data"]["id"], Value::String(id.clone()));

    env.cmd()
        .args(["show", "zzzz"])
        .assert()
        .code(2)
        .stderr(contains("Item not found"));
}

#[test]
fn edit_changes_fields_and_clears_due() {
    let env = TestEnv::new();
    let id = env.add(&["Draft", "--due", "2030-01-01T00:00:00Z"]);

    let edited = env.json(&[
        "edit",
        &id,
        "--title",
        "Final",
        "--priority",
        "high",
        "--status",
        "completed",
        "--no-due",
    ]);
    let data = &edited["data"];
    assert_eq!(data["title"], "Final");
    assert_eq!(data["priority"], "high");
    assert_eq!(data["status"], "completed");
    assert!(data.get("due_date").is_none());
    assert!(data["completion_date"].is_string());

    env.cmd()
        .args(["edit", &id])
        .assert()
        .code(2)
        .stderr(contains("nothing to edit"));
}

#[test]
fn status_changes_keep_completion_date_in_step() {
    let env = TestEnv::new();
    let id = env.add(&["Task"]);

    let started = env.json(&["start", &id]);
    assert_eq!(started["data"]["status"], "in_progress");
    assert!(started["data"].get("completion_date").is_none());

    let completed = env.json(&["complete", &id]);
    let first = completed["data"]["completion_date"].clone();
    assert!(first.is_string());

    let again = env.json(&["status", &id, "done"]);
    assert_eq!(again["data"]["completion_date"], first);

    let reopened = env.json(&["status", &id, "not_started"]);
    assert!(reopened["data"].get("completion_date").is_none());
}

#[test]
fn start_requires_not_started() {
    let env = TestEnv::new();
    let id = env.add(&["Doing", "--status", "in_progress"]);

    let output = env
        .cmd()
        .args(["start", &id, "--json"])
        .assert()
        .code(2)
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output).expect("error json");
    assert_eq!(value["status"], "error");
    assert_eq!(value["command"], "start");
    assert_eq!(value["error"]["kind"], "user_error");
    assert_eq!(value["error"]["code"], 2);
}

#[test]
fn rm_deletes_item() {
    let env = TestEnv::new();
    let keep = env.add(&["Keep"]);
    let gone = env.add(&["Gone"]);

    let removed = env.json(&["rm", &gone]);
    assert_eq!(removed["data"]["title"], "Gone");

    let list = env.json(&["list"]);
    assert_eq!(titles(&list), vec!["Keep"]);
    assert_eq!(list["data"]["items"][0]["id"], Value::String(keep));

    env.cmd().args(["rm", &gone]).assert().code(2);
}

#[test]
fn human_list_output() {
    let env = TestEnv::new();
    env.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("0 item(s)"))
        .stdout(contains("todo seed"));

    env.add(&["Visible task", "--priority", "high"]);
    env.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(contains("[Not Started] Visible task"))
        .stdout(contains("High"));

    env.cmd().args(["list", "-q"]).assert().success().stdout("");
}
