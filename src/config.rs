use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub aggregate: AggregateConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// The single browser origin allowed to call the API.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}
fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Client-side timeout for every Ollama call. Unset means wait forever,
    /// which is what a first-time multi-gigabyte model pull needs.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: default_ollama_url(),
            model: default_model(),
            timeout_secs: None,
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3.1:8b".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkspaceConfig {
    /// Parent directory for per-request working clones.
    #[serde(default = "default_workspace_dir")]
    pub dir: PathBuf,
    /// Where the VitePress scaffold is written. Wiped on every site request.
    #[serde(default = "default_site_output_dir")]
    pub site_output_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            dir: default_workspace_dir(),
            site_output_dir: default_site_output_dir(),
        }
    }
}

fn default_workspace_dir() -> PathBuf {
    std::env::temp_dir().join("repodoc")
}
fn default_site_output_dir() -> PathBuf {
    PathBuf::from("vitepress_documentation")
}

#[derive(Debug, Deserialize, Clone)]
pub struct AggregateConfig {
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    /// Optional budget for the whole rendered blob. Files that would overflow
    /// it are dropped whole.
    #[serde(default)]
    pub max_total_bytes: Option<usize>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: default_max_file_bytes(),
            max_total_bytes: None,
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

fn default_max_file_bytes() -> u64 {
    50_000
}

fn default_extensions() -> Vec<String> {
    [
        // Web
        ".html", ".css", ".scss", //
        // JavaScript / TypeScript
        ".js", ".ts", ".tsx", ".jsx", //
        // Backend
        ".py", ".java", ".go", ".rs", ".cpp", ".c", ".h", ".cs", ".php", //
        // Mobile
        ".kt", ".swift", ".dart", //
        // Data / AI
        ".r", ".ipynb", ".sql", //
        // Docs / config
        ".md", ".yaml", ".yml", ".json", ".toml", ".tf", ".sh", ".dockerfile",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exclude_dirs() -> Vec<String> {
    ["node_modules", ".git", "__pycache__", "dist", "build"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Like [`load_config`], but falls back to defaults when the file is absent.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.server.bind.parse::<SocketAddr>().is_err() {
        anyhow::bail!(
            "server.bind must be a socket address, got '{}'",
            config.server.bind
        );
    }

    if config.server.cors_origin.trim().is_empty() {
        anyhow::bail!("server.cors_origin must not be empty");
    }

    if config.ollama.model.trim().is_empty() {
        anyhow::bail!("ollama.model must not be empty");
    }

    if config.aggregate.max_file_bytes == 0 {
        anyhow::bail!("aggregate.max_file_bytes must be > 0");
    }

    if config.aggregate.max_total_bytes == Some(0) {
        anyhow::bail!("aggregate.max_total_bytes must be > 0 when set");
    }

    Ok(())
}
