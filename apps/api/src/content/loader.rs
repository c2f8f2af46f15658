//! Quick-action loader: turns blog posts and project pages into searchable
//! metadata records for the site's command palette.

use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::content::frontmatter::parse_markdown_file;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickAction {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub url: String,
    pub keywords: Vec<String>,
}

/// Loads all content-based quick actions: blog posts first, then projects.
/// Files without a `title` are skipped; unreadable files are logged and
/// skipped without failing the whole load.
pub fn load_content_actions(content_dir: &Path) -> Vec<QuickAction> {
    let mut actions = load_markdown_actions(&content_dir.join("blog"), "blog");
    actions.extend(load_markdown_actions(&content_dir.join("projects"), "project"));
    actions
}

fn load_markdown_actions(dir: &Path, category: &str) -> Vec<QuickAction> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Could not read content directory {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("md"))
        .collect();
    files.sort();

    let url_prefix = if category == "blog" { "blog" } else { "projects" };

    let mut actions = Vec::new();
    for path in files {
        let parsed = match parse_markdown_file(&path) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Skipping {}: {e:#}", path.display());
                continue;
            }
        };

        let Some(title) = parsed.front.title else {
            continue;
        };

        let mut keywords = vec![category.to_string()];
        keywords.extend(parsed.front.tags.iter().map(|t| t.to_lowercase()));
        keywords.extend(parsed.front.keywords.iter().cloned());
        keywords.push(parsed.slug.clone());

        actions.push(QuickAction {
            id: format!("{category}-{}", parsed.slug),
            title,
            description: parsed.front.summary,
            category: category.to_string(),
            url: format!("/{url_prefix}/{}/", parsed.slug),
            keywords,
        });
    }
    actions
}
