#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn m365() -> Command {
    let mut cmd = Command::cargo_bin("m365").unwrap();
    cmd.env_remove("M365_ACCESS_TOKEN")
        .env_remove("RUST_LOG")
        .env(
            "M365_CONFIG",
            std::env::temp_dir().join("m365-cli-tests-no-config.toml"),
        );
    cmd
}

/// Test that the CLI shows help
#[test]
fn test_help() {
    m365()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Microsoft 365"));
}

/// Test that version flag works
#[test]
fn test_version() {
    m365()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("m365"));
}

/// Test that unknown commands fail gracefully
#[test]
fn test_unknown_command() {
    m365().arg("unknown-command").assert().failure();
}

#[test]
fn test_command_family_help() {
    for (family, about) in [
        ("teams", "Microsoft Teams"),
        ("spo", "SharePoint Online"),
        ("todo", "Microsoft To Do"),
        ("tenant", "Tenant-wide information"),
    ] {
        m365()
            .args([family, "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains(about));
    }
}

#[test]
fn test_invalid_format() {
    m365()
        .args(["-f", "invalid", "context", "option", "list"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_message_id() {
    m365()
        .args(["tenant", "serviceannouncement", "message", "get", "--id", "123"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("123 is not a valid message ID"));
}

#[test]
fn test_tab_get_invalid_team_id() {
    m365()
        .args([
            "teams",
            "tab",
            "get",
            "--team-id",
            "00000000-0000",
            "--channel-id",
            "19:00000000000000000000000000000000@thread.skype",
            "--id",
            "00000000-0000-0000-0000-000000000000",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("00000000-0000 is not a valid GUID"));
}

#[test]
fn test_tab_get_invalid_channel_id() {
    m365()
        .args([
            "teams",
            "tab",
            "get",
            "--team-name",
            "Team Name",
            "--channel-id",
            "19:552b7125655c46d5b5b86db02ee7bfdf@thread",
            "--name",
            "Tab Name",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "19:552b7125655c46d5b5b86db02ee7bfdf@thread is not a valid Teams ChannelId",
        ));
}

#[test]
fn test_tab_get_team_id_and_name_conflict() {
    m365()
        .args([
            "teams",
            "tab",
            "get",
            "--team-id",
            "00000000-0000-0000-0000-000000000000",
            "--team-name",
            "Team Name",
            "--channel-name",
            "Channel Name",
            "--name",
            "Tab Name",
        ])
        .assert()
        .failure();
}

#[test]
fn test_tab_get_requires_tab() {
    m365()
        .args([
            "teams",
            "tab",
            "get",
            "--team-name",
            "Team Name",
            "--channel-name",
            "Channel Name",
        ])
        .assert()
        .failure();
}

#[test]
fn test_todo_task_set_invalid_status() {
    m365()
        .args([
            "todo",
            "task",
            "set",
            "--id",
            "abc",
            "--list-name",
            "Tasks List",
            "--status",
            "test",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Allowed values are notStarted|inProgress|completed|waitingOnOthers|deferred",
        ));
}

#[test]
fn test_todo_task_set_requires_list() {
    m365()
        .args(["todo", "task", "set", "--id", "abc", "--title", "New task"])
        .assert()
        .failure();
}

#[test]
fn test_spo_field_list_invalid_web_url() {
    m365()
        .args(["spo", "field", "list", "--web-url", "site.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("site.com is not a valid SharePoint URL"));
}

#[test]
fn test_spo_field_list_exclusive_list_options() {
    m365()
        .args([
            "spo",
            "field",
            "list",
            "--web-url",
            "https://contoso.sharepoint.com/sites/sales",
            "--list-title",
            "Demo List",
            "--list-url",
            "sites/hr-life/Lists/breakInheritance",
        ])
        .assert()
        .failure();
}

#[test]
fn test_context_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let rc = dir.path().join(".m365rc.json");

    m365()
        .current_dir(dir.path())
        .args(["context", "init"])
        .assert()
        .success();
    assert_eq!(
        std::fs::read_to_string(&rc).unwrap(),
        "{\n  \"context\": {}\n}"
    );

    m365()
        .current_dir(dir.path())
        .args(["context", "option", "set", "--name", "listName", "--value", "Tasks List"])
        .assert()
        .success();

    m365()
        .current_dir(dir.path())
        .args(["context", "option", "list", "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"listName\": \"Tasks List\""));

    m365()
        .current_dir(dir.path())
        .args(["context", "option", "remove", "--name", "teamId", "--force"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("There is no option teamId in the context info"));

    m365()
        .current_dir(dir.path())
        .args(["context", "remove", "--force"])
        .assert()
        .success();
    assert!(!rc.exists());
}

#[test]
fn test_completions() {
    m365()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("m365"));
}
