//! Core data types that flow through the documentation pipeline.
//!
//! Request and response bodies are serde types shared by the HTTP server and
//! the CLI; the rest are transient values that live for one request.

use serde::{Deserialize, Serialize};

/// Body of both `POST /generate-readme` and `POST /generate-vitepress`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RepoRequest {
    pub repo_url: String,
}

/// One file that survived aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedFile {
    /// Bare file name, without any directory component.
    pub name: String,
    pub text: String,
}

/// Ordered set of files selected from a working clone.
#[derive(Debug, Clone, Default)]
pub struct AggregatedContent {
    pub files: Vec<AggregatedFile>,
}

impl AggregatedContent {
    /// Header that precedes each file in the rendered blob.
    pub fn header(name: &str) -> String {
        format!("\n\n### File: {}\n", name)
    }

    /// Length in bytes that `file` adds to the rendered blob.
    pub fn rendered_len(file: &AggregatedFile) -> usize {
        Self::header(&file.name).len() + file.text.len()
    }

    /// Concatenate every file, each preceded by its header.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.files.iter().map(Self::rendered_len).sum());
        for file in &self.files {
            out.push_str(&Self::header(&file.name));
            out.push_str(&file.text);
        }
        out
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// A single non-streaming completion and what produced it.
#[derive(Debug, Clone)]
pub struct ModelInvocation {
    pub model: String,
    pub prompt: String,
    pub response: String,
}

/// Response body for `POST /generate-readme`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadmeResponse {
    pub readme: String,
}

/// Response body for `POST /generate-vitepress`, also printed by `repodoc site`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SiteReport {
    pub status: String,
    pub message: String,
    pub output_directory: String,
    pub instructions: Vec<String>,
}
