use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn todo_help_works() {
    Command::cargo_bin("todo")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("to-do tracker"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add", "list", "show", "edit", "status", "complete", "start", "rm", "stats", "seed",
    ];

    for cmd in subcommands {
        Command::cargo_bin("todo")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn missing_subcommand_is_usage_error() {
    Command::cargo_bin("todo")
        .expect("binary")
        .assert()
        .code(2);
}
