//! Instruction template for README generation.

/// Wrap the aggregated repository content in the README instructions.
///
/// The content is appended verbatim; no truncation happens here.
pub fn build_prompt(repo_content: &str) -> String {
    format!(
        r#"
You are a senior software engineer.

Generate a PROFESSIONAL README.md file for the following repository.

Include:
- Project title
- Description
- Features
- Tech stack
- Installation
- Usage
- Folder structure
- API (if exists)
- Future improvements

Repository content:
{}
"#,
        repo_content
    )
}
