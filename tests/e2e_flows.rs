mod common;

use common::{manifest_paths, TestEnv};
use predicates::prelude::*;
use predicates::str::contains;
use std::collections::HashSet;
use std::fs;

#[test]
fn classify_marks_secret_files_excluded() {
    let env = TestEnv::new();

    let out = env.run_json(&["classify", "credentials.json", ".env", "src/main.py"]);
    assert_eq!(out["ok"], true);
    let entries = out["data"].as_array().expect("entries array");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["path"], "credentials.json");
    assert_eq!(entries[0]["category"], "excluded");
    assert_eq!(entries[1]["category"], "excluded");
    assert_eq!(entries[2]["path"], "src/main.py");
    assert_eq!(entries[2]["category"], "safe");
}

#[test]
fn classify_text_output_names_rule() {
    let env = TestEnv::new();

    env.cmd()
        .args(["classify", "credentials.json"])
        .assert()
        .success()
        .stdout(contains("excluded\tcredentials.json\tdeny: credentials.json"));
}

#[test]
fn classify_rejects_paths_outside_repository() {
    let env = TestEnv::new();

    let err = env.run_json_failure(&["classify", "../.env"]);
    assert_eq!(err["ok"], false);
    assert_eq!(err["error"]["code"], "INVALID_PATH");
}

#[test]
fn manifest_partitions_backend_repository() {
    let env = TestEnv::new();

    let out = env.run_json(&["manifest", "--root", env.repo_arg()]);
    assert_eq!(out["ok"], true);
    let safe = out["data"]["safe"].as_array().expect("safe array");
    let excluded = out["data"]["excluded"].as_array().expect("excluded array");
    assert_eq!(safe.len(), 8);
    assert_eq!(excluded.len(), 2);

    let safe_paths: HashSet<&str> = safe.iter().filter_map(|e| e["path"].as_str()).collect();
    let excluded_paths: HashSet<&str> =
        excluded.iter().filter_map(|e| e["path"].as_str()).collect();
    assert!(safe_paths.is_disjoint(&excluded_paths));
    assert!(excluded_paths.contains(".env"));
    assert!(excluded_paths.contains("credentials.json"));
    assert!(safe_paths.contains(".env.example"));
}

#[test]
fn manifest_write_saves_json() {
    let env = TestEnv::new();
    let out_file = env.home.join("manifest.json");

    env.cmd()
        .args(["manifest", "--root", env.repo_arg(), "--write"])
        .arg(&out_file)
        .assert()
        .success();

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_file).expect("read manifest")).unwrap();
    assert_eq!(saved["excluded"].as_array().map(Vec::len), Some(2));
}

#[test]
fn embedded_password_holds_file_back() {
    let env = TestEnv::new();
    fs::write(
        env.repo.join("src/main.py"),
        "admin_user.set_password('cJttMY6JKhu_zKY')\n",
    )
    .unwrap();

    let out = env.run_json(&["manifest", "--root", env.repo_arg()]);
    let excluded = out["data"]["excluded"].as_array().expect("excluded array");
    let main = excluded
        .iter()
        .find(|e| e["path"] == "src/main.py")
        .expect("main.py excluded");
    assert_eq!(main["reason"], "content: hardcoded-password (line 1)");

    let scan = env.run_json_failure(&["scan", "--root", env.repo_arg()]);
    assert_eq!(scan["ok"], false);
    assert_eq!(scan["data"][0]["rule"], "hardcoded-password");
    assert_eq!(scan["data"][0]["line"], 1);
}

#[test]
fn scan_of_clean_repo_succeeds() {
    let env = TestEnv::new();

    env.cmd()
        .args(["scan", "--root", env.repo_arg()])
        .assert()
        .success()
        .stdout(contains("no secrets found"));
}

#[test]
fn full_deployment_flow() {
    let env = TestEnv::new();

    let status = env.run_json(&["deploy", "status"]);
    assert_eq!(status["data"]["state"], "prepared");

    let upload = env.run_json(&[
        "deploy",
        "upload",
        "--root",
        env.repo_arg(),
        "--dest",
        env.dest_arg(),
    ]);
    assert_eq!(upload["data"]["state"], "uploaded");
    assert_eq!(upload["data"]["published"], 8);
    assert_eq!(upload["data"]["excluded"], 2);
    assert!(env.dest.join("src/routes/ga4.py").exists());
    assert!(env.dest.join(".env.example").exists());
    assert!(!env.dest.join(".env").exists());
    assert!(!env.dest.join("credentials.json").exists());

    let missing = env.run_json_failure(&["deploy", "confirm-env"]);
    assert_eq!(missing["error"]["code"], "MISSING_ENV");
    let msg = missing["error"]["message"].as_str().unwrap_or("");
    assert!(msg.contains("GOOGLE_CLIENT_SECRET"));

    env.set_required_env();
    let confirm = env.run_json(&["deploy", "confirm-env"]);
    assert_eq!(confirm["data"]["state"], "env_configured");
    assert_eq!(confirm["data"]["changed"], true);

    let build = env.run_json(&["deploy", "build", "--outcome", "success"]);
    assert_eq!(build["data"]["state"], "deployed");
    let history = build["data"]["history"].as_array().expect("history");
    let events: Vec<&str> = history.iter().filter_map(|t| t["event"].as_str()).collect();
    assert_eq!(events, vec!["upload", "confirm_env", "build_succeeded"]);
}

#[test]
fn deploy_cannot_skip_steps() {
    let env = TestEnv::new();
    env.set_required_env();

    let err = env.run_json_failure(&["deploy", "build", "--outcome", "success"]);
    assert_eq!(err["error"]["code"], "INVALID_TRANSITION");

    let err = env.run_json_failure(&["deploy", "confirm-env"]);
    assert_eq!(err["error"]["code"], "INVALID_TRANSITION");

    let status = env.run_json(&["deploy", "status"]);
    assert_eq!(status["data"]["state"], "prepared");
    assert_eq!(status["data"]["history"].as_array().map(Vec::len), Some(0));
}

#[test]
fn failed_build_returns_to_uploaded() {
    let env = TestEnv::new();
    env.set_required_env();

    env.run_json(&["deploy", "upload", "--root", env.repo_arg(), "--dest", env.dest_arg()]);
    env.run_json(&["deploy", "confirm-env"]);
    let build = env.run_json(&["deploy", "build", "--outcome", "failure"]);
    assert_eq!(build["data"]["state"], "uploaded");

    let err = env.run_json_failure(&["deploy", "build", "--outcome", "success"]);
    assert_eq!(err["error"]["code"], "INVALID_TRANSITION");
}

#[test]
fn reconfirming_env_changes_nothing() {
    let env = TestEnv::new();
    env.set_required_env();
    env.run_json(&["deploy", "upload", "--root", env.repo_arg(), "--dest", env.dest_arg()]);

    let before = env.secrets_raw();
    let first = env.run_json(&["deploy", "confirm-env"]);
    assert_eq!(first["data"]["changed"], true);
    let second = env.run_json(&["deploy", "confirm-env"]);
    assert_eq!(second["data"]["changed"], false);
    assert_eq!(second["data"]["state"], "env_configured");
    assert_eq!(env.secrets_raw(), before);

    let again = env.run_json(&["env", "set", "SECRET_KEY", "--value", "test-value"]);
    assert_eq!(again["data"]["outcome"], "unchanged");
    assert_eq!(env.secrets_raw(), before);

    let status = env.run_json(&["deploy", "status"]);
    assert_eq!(status["data"]["history"].as_array().map(Vec::len), Some(2));
}

#[test]
fn explicit_upload_of_secret_is_refused() {
    let env = TestEnv::new();

    let err = env.run_json_failure(&[
        "deploy",
        "upload",
        "--root",
        env.repo_arg(),
        "--dest",
        env.dest_arg(),
        "src/main.py",
        ".env",
    ]);
    assert_eq!(err["error"]["code"], "EXCLUDED_FILE");
    assert!(!env.dest.exists());

    let status = env.run_json(&["deploy", "status"]);
    assert_eq!(status["data"]["state"], "prepared");
}

#[test]
fn upload_refuses_destination_holding_secrets() {
    let env = TestEnv::new();
    fs::create_dir_all(&env.dest).unwrap();
    fs::write(env.dest.join(".env"), "LEAKED=1\n").unwrap();

    let err = env.run_json_failure(&[
        "deploy",
        "upload",
        "--root",
        env.repo_arg(),
        "--dest",
        env.dest_arg(),
    ]);
    assert_eq!(err["error"]["code"], "EXCLUDED_FILE");
}

#[test]
fn upload_refuses_destination_inside_repository() {
    let env = TestEnv::new();
    let nested = env.repo.join("publish");

    let err = env.run_json_failure(&[
        "deploy",
        "upload",
        "--root",
        env.repo_arg(),
        "--dest",
        nested.to_str().unwrap(),
    ]);
    assert_eq!(err["error"]["code"], "INVALID_DESTINATION");
    assert!(!nested.exists());

    let status = env.run_json(&["deploy", "status"]);
    assert_eq!(status["data"]["state"], "prepared");
}

#[test]
fn oversized_source_file_is_never_published() {
    let env = TestEnv::new();
    let mut body = String::from("admin.set_password('cJttMY6JKhu_zKY')\n");
    body.push_str(&"#".repeat(1024 * 1024));
    fs::write(env.repo.join("src/big.py"), body).unwrap();

    let out = env.run_json(&["manifest", "--root", env.repo_arg()]);
    assert!(!manifest_paths(&out, "safe").contains(&"src/big.py".to_string()));
    let big = out["data"]["excluded"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["path"] == "src/big.py")
        .expect("big.py excluded");
    assert_eq!(big["reason"], "unscanned: too large");
    assert_eq!(out["data"]["unscanned"][0]["path"], "src/big.py");

    env.cmd()
        .args(["scan", "--root", env.repo_arg()])
        .assert()
        .success()
        .stdout(contains("src/big.py\tunscanned: too large"));

    env.run_json(&["deploy", "upload", "--root", env.repo_arg(), "--dest", env.dest_arg()]);
    assert!(!env.dest.join("src/big.py").exists());
}

#[test]
fn env_list_includes_service_account_path() {
    let env = TestEnv::new();

    let out = env.run_json(&["env", "list"]);
    let creds = out["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["name"] == "GOOGLE_APPLICATION_CREDENTIALS")
        .expect("service account variable listed");
    assert_eq!(creds["required"], false);
    assert_eq!(creds["source"], "platform_managed");
}

#[test]
fn env_values_never_printed() {
    let env = TestEnv::new();
    env.run_json(&["env", "set", "GOOGLE_CLIENT_ID", "--value", "super-secret-id"]);

    env.cmd()
        .args(["env", "list"])
        .assert()
        .success()
        .stdout(contains("GOOGLE_CLIENT_ID\tset\trequired"))
        .stdout(contains("GOOGLE_CLIENT_SECRET\tmissing\trequired"))
        .stdout(contains("super-secret-id").not());
}

#[test]
fn env_set_reads_value_from_stdin() {
    let env = TestEnv::new();

    env.cmd()
        .args(["env", "set", "DATABASE_URL"])
        .write_stdin("postgres://db/app\n")
        .assert()
        .success()
        .stdout(contains("DATABASE_URL created"));
    assert!(env.secrets_raw().contains("postgres://db/app"));
}

#[test]
fn env_set_rejects_bad_names() {
    let env = TestEnv::new();

    let err = env.run_json_failure(&["env", "set", "google-id", "--value", "x"]);
    assert_eq!(err["error"]["code"], "INVALID_ENV_NAME");
}

#[test]
fn policy_file_extends_rule_table() {
    let env = TestEnv::new();
    let policy = env.home.join(".config/shipcheck/policy.toml");
    fs::create_dir_all(policy.parent().unwrap()).unwrap();
    fs::write(
        &policy,
        r#"[classify]
deny = ["Procfile"]

[env]
required = ["SENDGRID_API_KEY"]
"#,
    )
    .unwrap();

    let out = env.run_json(&["classify", "Procfile"]);
    assert_eq!(out["data"][0]["category"], "excluded");

    let table = env.run_json(&["policy", "show"]);
    let required = table["data"]["required_env"].as_array().expect("required env");
    assert!(required.iter().any(|v| v == "SENDGRID_API_KEY"));
}

#[test]
fn explicit_policy_flag_and_invalid_policy() {
    let env = TestEnv::new();
    let policy = env.home.join("bad.toml");
    fs::write(&policy, "[classify]\ndeny = [\"[\"]\n").unwrap();

    let err = env.run_json_failure(&["--policy", policy.to_str().unwrap(), "classify", "a.py"]);
    assert_eq!(err["error"]["code"], "POLICY_INVALID");
}

#[test]
fn policy_allow_override_publishes_template() {
    let env = TestEnv::new();
    env.write_policy("[classify]\nallow_override = [\"client_secret.example.json\"]\n");

    let out = env.run_json(&[
        "classify",
        "client_secret.example.json",
        "client_secret_prod.json",
    ]);
    assert_eq!(out["data"][0]["category"], "safe");
    assert_eq!(out["data"][0]["reason"], "template: client_secret.example.json");
    assert_eq!(out["data"][1]["category"], "excluded");
    assert_eq!(out["data"][1]["reason"], "deny: client_secret*.json");
}

#[test]
fn policy_skip_dirs_prunes_build_output() {
    let env = TestEnv::new();
    fs::create_dir_all(env.repo.join("dist")).unwrap();
    fs::write(env.repo.join("dist/bundle.js"), "console.log(1)\n").unwrap();

    let before = env.run_json(&["manifest", "--root", env.repo_arg()]);
    assert!(manifest_paths(&before, "safe").contains(&"dist/bundle.js".to_string()));

    env.write_policy("[classify]\nskip_dirs = [\"dist\"]\n");
    let after = env.run_json(&["manifest", "--root", env.repo_arg()]);
    let all: Vec<String> = manifest_paths(&after, "safe")
        .into_iter()
        .chain(manifest_paths(&after, "excluded"))
        .collect();
    assert!(all.iter().all(|p| !p.starts_with("dist/")));
    assert_eq!(all.len(), 10);
}

#[test]
fn policy_can_turn_content_scanning_off() {
    let env = TestEnv::new();
    fs::write(
        env.repo.join("src/main.py"),
        "admin_user.set_password('cJttMY6JKhu_zKY')\n",
    )
    .unwrap();
    env.write_policy("[classify]\nscan_content = false\n");

    let out = env.run_json(&["manifest", "--root", env.repo_arg()]);
    assert!(manifest_paths(&out, "safe").contains(&"src/main.py".to_string()));
    assert_eq!(out["data"]["findings"].as_array().map(Vec::len), Some(0));
}

#[test]
fn manifest_gitignore_names_held_back_paths() {
    let env = TestEnv::new();
    fs::write(env.repo.join("src/main.py"), "password = 'hunter22'\n").unwrap();
    fs::write(env.repo.join("notes.bak"), "draft\n").unwrap();

    env.cmd()
        .args(["manifest", "--root", env.repo_arg(), "--gitignore"])
        .assert()
        .success()
        .stdout(contains("credentials.json\n"))
        .stdout(contains("# excluded by content or unclassified\n"))
        .stdout(contains("/src/main.py\n"))
        .stdout(contains("/notes.bak\n"))
        .stdout(contains("/.env\n").not());
}

#[test]
fn gitignore_lists_deny_rules() {
    let env = TestEnv::new();

    env.cmd()
        .args(["policy", "gitignore"])
        .assert()
        .success()
        .stdout(contains("credentials.json\n"))
        .stdout(contains("!.env.example\n"));
}

#[test]
fn check_reports_missing_env_then_ok() {
    let env = TestEnv::new();

    let report = env.run_json(&["check", "--root", env.repo_arg()]);
    assert_eq!(report["ok"], false);
    assert_eq!(report["data"]["overall"], "needs_attention");
    assert_eq!(report["data"]["missing_env"].as_array().map(Vec::len), Some(4));

    env.set_required_env();
    let report = env.run_json(&["check", "--root", env.repo_arg()]);
    assert_eq!(report["ok"], true);
    assert_eq!(report["data"]["overall"], "ok");
    assert_eq!(report["data"]["state"], "prepared");
}

#[test]
fn state_changes_are_audited() {
    let env = TestEnv::new();
    env.run_json(&["env", "set", "PORT", "--value", "8080"]);
    env.run_json(&["deploy", "upload", "--root", env.repo_arg(), "--dest", env.dest_arg()]);

    let audit = fs::read_to_string(env.home.join(".config/shipcheck/audit.jsonl")).unwrap();
    let actions: Vec<String> = audit
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["action"].to_string())
        .collect();
    assert_eq!(actions, vec!["\"env.set\"", "\"deploy.upload\""]);
    assert!(!audit.contains("\"8080\""));
}
