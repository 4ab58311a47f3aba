//! Request pipelines for both documentation outputs.
//!
//! ```text
//! README:  clone → aggregate → drop clone → prompt → ensure model → generate
//! Site:    clear output → clone → find README → scaffold → drop clone
//! ```
//!
//! Git and filesystem work runs on the blocking thread pool. The working
//! clone is owned by that blocking task, so it is removed before the task
//! returns, on success and on error alike.
//!
//! The site output directory is one fixed path, so site requests hold
//! [`Pipeline`]'s site lock for their whole duration.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::acquire::clone_repo;
use crate::aggregate::aggregate;
use crate::config::Config;
use crate::models::{ModelInvocation, SiteReport};
use crate::ollama::{ModelGateway, OllamaClient};
use crate::prompt::build_prompt;
use crate::site::{clear_output_dir, find_readme, project_name, scaffold_site};

const README_CLONE_PREFIX: &str = "temp_repo";
const SITE_CLONE_PREFIX: &str = "temp_repo_vite";

pub struct Pipeline {
    config: Arc<Config>,
    gateway: Arc<dyn ModelGateway>,
    site_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(config: Arc<Config>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            config,
            gateway,
            site_lock: Mutex::new(()),
        }
    }

    /// Build a pipeline that talks to the Ollama server named in `config`.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let gateway = Arc::new(OllamaClient::new(&config.ollama)?);
        tracing::info!(
            ollama = gateway.base_url(),
            model = %config.ollama.model,
            "using Ollama"
        );
        Ok(Self::new(config, gateway))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Clone `repo_url`, summarise its content, and ask the model for a README.
    pub async fn generate_readme(&self, repo_url: &str) -> Result<ModelInvocation> {
        let config = self.config.clone();
        let url = repo_url.to_string();

        let content = tokio::task::spawn_blocking(move || -> Result<String> {
            let clone = clone_repo(&url, &config.workspace.dir, README_CLONE_PREFIX)?;
            Ok(aggregate(clone.path(), &config.aggregate).render())
        })
        .await??;

        let prompt = build_prompt(&content);
        let model = self.config.ollama.model.clone();

        self.gateway.ensure_available(&model).await;
        let response = self.gateway.generate(&model, &prompt).await?;

        Ok(ModelInvocation {
            model,
            prompt,
            response,
        })
    }

    /// Clone `repo_url` and scaffold a VitePress site from its README.
    pub async fn generate_site(&self, repo_url: &str) -> Result<SiteReport> {
        let _guard = self.site_lock.lock().await;

        let config = self.config.clone();
        let url = repo_url.to_string();

        tokio::task::spawn_blocking(move || -> Result<SiteReport> {
            let output_dir = &config.workspace.site_output_dir;
            clear_output_dir(output_dir)?;

            let clone = clone_repo(&url, &config.workspace.dir, SITE_CLONE_PREFIX)?;
            let readme = find_readme(clone.path())?;
            let name = project_name(&url);

            scaffold_site(output_dir, &name, &readme)
        })
        .await?
    }
}
