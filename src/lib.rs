//! # repodoc
//!
//! Baseline documentation for any git repository, generated locally.
//!
//! repodoc clones a repository, selects its textual source files, and either
//! asks a local Ollama model for a README or scaffolds a VitePress site from
//! the README the repository already has. It runs as an HTTP service or as a
//! one-shot CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌─────────────┐   ┌────────┐   ┌────────┐
//! │  acquire  │──▶│  aggregate  │──▶│ prompt │──▶│ ollama │──▶ README text
//! │ git clone │   │ walk+filter │   └────────┘   └────────┘
//! └─────┬─────┘   └─────────────┘
//!       │
//!       └──────▶ site: find README ──▶ VitePress scaffold on disk
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! repodoc serve                                      # HTTP API on 127.0.0.1:8000
//! repodoc readme https://github.com/org/repo.git     # print a README
//! repodoc site https://github.com/org/repo.git       # write ./vitepress_documentation
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Request, response, and pipeline data types |
//! | [`acquire`] | Per-request working clones |
//! | [`aggregate`] | File selection and concatenation |
//! | [`prompt`] | README instruction template |
//! | [`ollama`] | Model gateway for a local Ollama server |
//! | [`site`] | VitePress scaffolding |
//! | [`pipeline`] | End-to-end request pipelines |
//! | [`server`] | HTTP API |

pub mod acquire;
pub mod aggregate;
pub mod config;
pub mod models;
pub mod ollama;
pub mod pipeline;
pub mod prompt;
pub mod server;
pub mod site;
