//! CLI tests for the offline `eval` commands.
//!
//! Spawns the eval binary against a temporary data directory and checks
//! stdout, written files and exit codes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::json;

const RUN: &str = "retail-test.json";

fn write_json(path: &Path, value: &serde_json::Value) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, serde_json::to_string_pretty(value).expect("json")).expect("write");
}

fn review(task_id: usize, unwanted: bool) -> serde_json::Value {
    json!({
        "task_id": task_id,
        "case": format!("case {task_id}"),
        "content": {
            "review": "The agent cancelled the wrong order.",
            "user_achieved_original_goal": false,
            "user_put_pressure_on_agent": false,
            "user_quit_conversation_prematurely": false,
            "user_gave_wrong_details_unintentionally": false,
            "user_correct_unintentional_agent_mistake": false,
            "agent_failed_to_check_details": false,
            "agent_made_unwanted_action": unwanted,
            "agent_made_mistake_due_to_pressure": false,
            "agent_made_calculation_error": false,
            "agent_made_calculation_error_about_time": false
        }
    })
}

fn write_fixture(root: &Path) {
    for domain in ["airline", "retail", "telecom"] {
        write_json(
            &root.join(format!("tau2/domains/{domain}/tasks.json")),
            &json!([
                {"id": "0", "evaluation_criteria": {
                    "actions": [{"name": "find_user", "arguments": {}}],
                    "communicate_info": ["42"],
                    "nl_assertions": []
                }},
                {"id": "1", "evaluation_criteria": {"actions": null}}
            ]),
        );
    }
    write_json(
        &root.join("simulations").join(RUN),
        &json!({"simulations": [
            {"reward_info": {"reward": 1.0}, "messages": []},
            {"reward_info": {"reward": 0.0}, "messages": [
                {"role": "user", "content": "Cancel order #1"}
            ]}
        ]}),
    );
}

fn eval(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_eval"))
        .current_dir(root)
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(root.join("missing.toml"))
        .arg("--data-dir")
        .arg(root)
        .args(args)
        .output()
        .expect("run eval")
}

#[test]
fn stats_prints_every_domain() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let output = eval(temp.path(), &["stats"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    for domain in ["airline", "retail", "telecom"] {
        assert!(stdout.contains(&format!(" {domain} ")));
    }
    assert!(stdout.contains("avg: actions=0.500 communicate_info=0.500 nl_assertions=0.000"));
}

#[test]
fn cases_lists_only_failed_simulations() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());

    let output = eval(temp.path(), &["cases", RUN]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("task-1\n"));
    assert!(!stdout.contains("task-0\n"));
    assert!(stdout.contains("[USER]  ==> Cancel order #1"));
}

#[test]
fn score_and_readable_use_stored_reviews() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());
    write_json(
        &temp.path().join("reviews").join(RUN),
        &json!([review(1, true)]),
    );

    let output = eval(temp.path(), &["score", RUN]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("pass^1: 0.5000\n"));
    assert!(stdout.contains("pass^1 (weighted responsibility): 0.5000\n"));
    assert!(stdout.contains("- agent_made_unwanted_action: 1 (100.0%)\n"));

    let output = eval(temp.path(), &["readable", RUN]);
    assert!(output.status.success());
    let text = fs::read_to_string(temp.path().join("reviews_readable/retail-test.json.txt"))
        .expect("readable file");
    assert!(text.contains("review-1"));
    assert!(text.contains("agent_made_unwanted_action: true"));
    assert!(!text.contains("case 1"));
}

#[test]
fn score_rejects_review_for_perfect_simulation() {
    let temp = tempfile::tempdir().expect("tempdir");
    write_fixture(temp.path());
    write_json(
        &temp.path().join("reviews").join(RUN),
        &json!([review(0, false)]),
    );

    let output = eval(temp.path(), &["score", RUN]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}
