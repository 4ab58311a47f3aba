//! Repository content aggregation.
//!
//! Walks a working clone and collects the text of every file that passes the
//! directory, extension, and size filters. Selection is best effort: a file
//! that cannot be read or is not valid UTF-8 is left out and the walk
//! continues.
//!
//! # Filters
//!
//! | Filter | Rule |
//! |--------|------|
//! | Directory | pruned if its path relative to the clone root contains an excluded marker as a substring |
//! | Extension | must be in the allow-list, compared case-sensitively with the leading dot |
//! | Symlink | a link to a regular file is read only if its target resolves inside the clone root; directory links are not followed |
//! | Size | files above `max_file_bytes` are skipped |
//! | Budget | with `max_total_bytes` set, files that would overflow the rendered blob are dropped |
//!
//! Files are kept in walk order and labelled with their bare file name, so two
//! `mod.rs` files from different directories share a header.

use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use crate::config::AggregateConfig;
use crate::models::{AggregatedContent, AggregatedFile};

pub fn aggregate(root: &Path, config: &AggregateConfig) -> AggregatedContent {
    let mut content = AggregatedContent::default();
    let mut rendered_len = 0usize;
    let mut over_budget = 0usize;
    let canonical_root = root.canonicalize().ok();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, root, &config.exclude_dirs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let path = entry.path();
        if entry.path_is_symlink() {
            if !links_to_file_inside(path, canonical_root.as_deref()) {
                tracing::debug!(path = %path.display(), "skipping symlink");
                continue;
            }
        } else if !entry.file_type().is_file() {
            continue;
        }

        if !has_allowed_extension(path, &config.extensions) {
            continue;
        }

        let file = match read_candidate(path, config.max_file_bytes) {
            Some(file) => file,
            None => continue,
        };

        if let Some(budget) = config.max_total_bytes {
            let len = AggregatedContent::rendered_len(&file);
            if rendered_len + len > budget {
                over_budget += 1;
                continue;
            }
            rendered_len += len;
        }

        content.files.push(file);
    }

    if over_budget > 0 {
        tracing::info!(
            dropped = over_budget,
            budget = ?config.max_total_bytes,
            "files dropped to respect the content budget"
        );
    }
    tracing::info!(files = content.len(), root = %root.display(), "aggregated repository content");

    content
}

fn is_excluded_dir(entry: &DirEntry, root: &Path, markers: &[String]) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let rel_str = relative.to_string_lossy();
    markers.iter().any(|m| rel_str.contains(m.as_str()))
}

/// True when `link` resolves to a regular file under `canonical_root`.
fn links_to_file_inside(link: &Path, canonical_root: Option<&Path>) -> bool {
    let Some(root) = canonical_root else {
        return false;
    };
    match link.canonicalize() {
        Ok(target) => target.starts_with(root) && target.is_file(),
        Err(_) => false,
    }
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    match path.extension() {
        Some(ext) => {
            let dotted = format!(".{}", ext.to_string_lossy());
            extensions.iter().any(|e| *e == dotted)
        }
        None => false,
    }
}

/// Size-check and read one file. `None` means the file is silently left out.
fn read_candidate(path: &Path, max_file_bytes: u64) -> Option<AggregatedFile> {
    let size = match std::fs::metadata(path) {
        Ok(m) => m.len(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping file without metadata");
            return None;
        }
    };
    if size > max_file_bytes {
        return None;
    }

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Some(AggregatedFile { name, text })
}
