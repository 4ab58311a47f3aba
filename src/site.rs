//! VitePress documentation-site scaffolding.
//!
//! Builds a minimal VitePress project from a repository's own README. The
//! model is not involved. The generated tree is:
//!
//! ```text
//! <output_dir>/
//! ├── package.json
//! └── docs/
//!     ├── index.md
//!     └── .vitepress/
//!         └── config.mts
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::SiteReport;

/// Body used for `docs/index.md` when the repository has no README.
pub const NO_README_PLACEHOLDER: &str = "# No README found";

const INDEX_FRONTMATTER: &str = "---\nlayout: doc\n---\n\n";

/// Read the first top-level file whose name starts with `readme`, ignoring
/// case. Entries are visited in name order. Returns the placeholder when
/// there is none.
pub fn find_readme(repo_root: &Path) -> Result<String> {
    let mut entries: Vec<_> = std::fs::read_dir(repo_root)
        .with_context(|| format!("Failed to list repository root: {}", repo_root.display()))?
        .filter_map(|e| e.ok())
        .collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if !name.starts_with("readme") {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        tracing::debug!(path = %path.display(), "using README");
        return std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    Ok(NO_README_PLACEHOLDER.to_string())
}

/// Derive the project name from the last path segment of a repository URL,
/// without a `.git` suffix.
pub fn project_name(repo_url: &str) -> String {
    let last = repo_url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(repo_url);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Remove `output_dir` and everything in it, if present.
pub fn clear_output_dir(output_dir: &Path) -> Result<()> {
    if output_dir.exists() {
        std::fs::remove_dir_all(output_dir).with_context(|| {
            format!(
                "Failed to clear output directory: {}",
                output_dir.display()
            )
        })?;
    }
    Ok(())
}

/// Wipe `output_dir` and write a fresh VitePress project into it.
pub fn scaffold_site(output_dir: &Path, name: &str, readme: &str) -> Result<SiteReport> {
    clear_output_dir(output_dir)?;

    let docs_dir = output_dir.join("docs");
    let config_dir = docs_dir.join(".vitepress");
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let package_json = serde_json::to_string_pretty(&package_json(name))?;
    write_file(&output_dir.join("package.json"), &package_json)?;
    write_file(
        &docs_dir.join("index.md"),
        &format!("{}{}", INDEX_FRONTMATTER, readme),
    )?;
    write_file(&config_dir.join("config.mts"), &vitepress_config(name))?;

    let absolute = std::path::absolute(output_dir)
        .with_context(|| format!("Failed to resolve {}", output_dir.display()))?;

    tracing::info!(project = name, path = %absolute.display(), "VitePress project generated");

    Ok(SiteReport {
        status: "success".to_string(),
        message: "VitePress project generated successfully.".to_string(),
        output_directory: absolute.to_string_lossy().to_string(),
        instructions: vec![
            format!("cd {}", output_dir.display()),
            "npm install".to_string(),
            "npm run docs:dev".to_string(),
        ],
    })
}

fn package_json(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": format!("{}-docs", name),
        "version": "1.0.0",
        "scripts": {
            "docs:dev": "vitepress dev docs",
            "docs:build": "vitepress build docs",
            "docs:preview": "vitepress preview docs"
        },
        "devDependencies": {
            "vitepress": "^1.0.0"
        }
    })
}

fn vitepress_config(name: &str) -> String {
    format!(
        r#"import {{ defineConfig }} from 'vitepress'

export default defineConfig({{
  title: "{name}",
  description: "Documentation for {name}",
  themeConfig: {{
    nav: [
      {{ text: 'Home', link: '/' }}
    ],
    sidebar: [
      {{
        text: 'Guide',
        items: [
          {{ text: 'Introduction', link: '/' }}
        ]
      }}
    ],
    socialLinks: [
    ]
  }}
}})
"#
    )
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
