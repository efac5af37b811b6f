#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub repo: PathBuf,
    pub dest: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let repo = make_fixture_backend(tmp.path());
        let dest = tmp.path().join("hosting");

        Self {
            _tmp: tmp,
            home,
            repo,
            dest,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("shipcheck");
        cmd.env("HOME", &self.home).env_remove("RUST_LOG");
        cmd
    }

    pub fn repo_arg(&self) -> &str {
        self.repo.to_str().expect("repo path utf8")
    }

    pub fn dest_arg(&self) -> &str {
        self.dest.to_str().expect("dest path utf8")
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }

    pub fn set_required_env(&self) {
        for name in [
            "GOOGLE_CLIENT_ID",
            "GOOGLE_CLIENT_SECRET",
            "SECRET_KEY",
            "JWT_SECRET_KEY",
        ] {
            self.run_json(&["env", "set", name, "--value", "test-value"]);
        }
    }

    pub fn write_policy(&self, body: &str) {
        let policy = self.home.join(".config/shipcheck/policy.toml");
        fs::create_dir_all(policy.parent().expect("policy dir")).expect("create config dir");
        fs::write(policy, body).expect("write policy");
    }

    pub fn secrets_raw(&self) -> String {
        fs::read_to_string(self.home.join(".config/shipcheck/secrets.json"))
            .expect("read secrets store")
    }
}

/// Paths listed on one side (`safe` or `excluded`) of a `manifest --json`.
pub fn manifest_paths(out: &Value, side: &str) -> Vec<String> {
    out["data"][side]
        .as_array()
        .expect("manifest side")
        .iter()
        .map(|e| e["path"].as_str().expect("entry path").to_string())
        .collect()
}

fn make_fixture_backend(base: &Path) -> PathBuf {
    let repo = base.join("backend");
    fs::create_dir_all(repo.join("src/routes")).expect("create routes dir");
    fs::create_dir_all(repo.join("src/services")).expect("create services dir");
    fs::create_dir_all(repo.join("src/models")).expect("create models dir");

    let files: &[(&str, &str)] = &[
        (
            "src/main.py",
            "from flask import Flask\napp = Flask(__name__)\napp.config['SECRET_KEY'] = os.getenv('SECRET_KEY')\n",
        ),
        ("src/routes/ga4.py", "ga4_bp = Blueprint('ga4', __name__)\n"),
        ("src/routes/auth.py", "auth_bp = Blueprint('auth', __name__)\n"),
        (
            "src/services/ga4_oauth.py",
            "client_id = os.getenv('GOOGLE_CLIENT_ID')\nclient_secret = os.getenv('GOOGLE_CLIENT_SECRET')\n",
        ),
        ("src/models/user.py", "class User(db.Model):\n    pass\n"),
        ("requirements.txt", "flask\nflask-cors\ngoogle-analytics-data\n"),
        ("Procfile", "web: gunicorn src.main:app\n"),
        (".env.example", "GOOGLE_CLIENT_ID=\nGOOGLE_CLIENT_SECRET=\n"),
        (".env", "GOOGLE_CLIENT_ID=real-id\nGOOGLE_CLIENT_SECRET=real-secret\n"),
        ("credentials.json", "{\"web\": {\"client_id\": \"x\"}}\n"),
    ];
    for (rel, body) in files {
        fs::write(repo.join(rel), body).expect("write fixture file");
    }

    repo
}
