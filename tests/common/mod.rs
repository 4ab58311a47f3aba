//! Shared fixtures for integration tests: local git repositories, configs
//! rooted in temp directories, and a scripted model gateway.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

use repodoc::config::Config;
use repodoc::ollama::ModelGateway;

/// Create a git repository at `root/<name>` containing `files` and one commit.
pub fn make_git_repo(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
    let repo = root.join(name);
    fs::create_dir_all(&repo).unwrap();
    for (rel, contents) in files {
        let path = repo.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    git(&repo, &["init", "-q"]);
    git(&repo, &["add", "-A"]);
    git(
        &repo,
        &[
            "-c",
            "user.name=repodoc-tests",
            "-c",
            "user.email=tests@example.com",
            "-c",
            "commit.gpgsign=false",
            "commit",
            "-q",
            "--allow-empty",
            "-m",
            "initial",
        ],
    );
    repo
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to run git {:?}: {}", args, e));
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Config whose workspace and site output live under `tmp`.
pub fn test_config(tmp: &TempDir) -> Config {
    let mut config = Config::default();
    config.workspace.dir = tmp.path().join("work");
    config.workspace.site_output_dir = tmp.path().join("site");
    config
}

/// Entries left in the workspace directory (missing directory counts as empty).
pub fn workspace_entries(config: &Config) -> Vec<PathBuf> {
    match fs::read_dir(&config.workspace.dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(_) => Vec::new(),
    }
}

/// Model gateway that records prompts and replays a fixed answer.
pub struct ScriptedGateway {
    answer: Result<String, String>,
    pub prompts: Mutex<Vec<String>>,
    pub ensured: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn answering(text: &str) -> Self {
        Self {
            answer: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
            ensured: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
            ensured: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn ensure_available(&self, model: &str) {
        self.ensured.lock().unwrap().push(model.to_string());
    }

    async fn generate(&self, _model: &str, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.clone().map_err(|m| anyhow::anyhow!(m))
    }
}
