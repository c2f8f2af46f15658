//! Frontmatter and markdown-body parsing shared by the index builder and
//! the quick-action loader.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Excerpts are cut at this many characters, with a trailing ellipsis.
pub const EXCERPT_MAX_CHARS: usize = 500;

/// The frontmatter fields consumed across the codebase. Everything else in
/// the block is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub date: Option<String>,
}

/// One parsed markdown file: filename-derived slug, frontmatter, body.
#[derive(Debug, Clone)]
pub struct ParsedMarkdown {
    pub slug: String,
    pub front: FrontMatter,
    pub body: String,
}

static FRONT_MATTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---(\r?\n|\z)").unwrap());

/// Splits a raw markdown document into its frontmatter block and body.
/// A document without a leading `---` block is all body.
pub fn split_front_matter(raw: &str) -> (Option<&str>, &str) {
    match FRONT_MATTER_RE.captures(raw) {
        Some(caps) => {
            let yaml = caps.get(1).map(|m| m.as_str());
            let body = &raw[caps.get(0).unwrap().end()..];
            (yaml, body)
        }
        None => (None, raw),
    }
}

/// Parses one markdown file. Missing frontmatter yields defaults (the slug
/// stands in for the title downstream); malformed frontmatter YAML is an
/// error the caller decides how to handle.
pub fn parse_markdown_file(path: &Path) -> Result<ParsedMarkdown> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    let (yaml, body) = split_front_matter(&raw);
    let front = match yaml {
        Some(block) => serde_yaml::from_str::<FrontMatter>(block)
            .with_context(|| format!("malformed frontmatter in {}", path.display()))?,
        None => FrontMatter::default(),
    };

    Ok(ParsedMarkdown {
        slug,
        front,
        body: body.to_string(),
    })
}

/// Normalizes a frontmatter date to `YYYY-MM-DD`. Unparsable or absent
/// dates become the empty string, which sorts after every ISO date in the
/// descending index order.
pub fn normalize_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    for format in ["%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    String::new()
}

static CODE_FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").unwrap());
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());
static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").unwrap());
static INLINE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s+").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Derives a plain-text excerpt from a markdown body: markdown syntax
/// stripped (link text kept, code fences dropped), blank-line runs
/// collapsed, truncated to `max_chars` with a trailing ellipsis.
pub fn extract_excerpt(body: &str, max_chars: usize) -> String {
    let plain = CODE_FENCE_RE.replace_all(body, "");
    let plain = HEADING_RE.replace_all(&plain, "");
    let plain = BOLD_RE.replace_all(&plain, "$1");
    let plain = ITALIC_RE.replace_all(&plain, "$1");
    let plain = LINK_RE.replace_all(&plain, "$1");
    let plain = INLINE_CODE_RE.replace_all(&plain, "$1");
    let plain = LIST_MARKER_RE.replace_all(&plain, "");
    let plain = BLANK_RUN_RE.replace_all(&plain, "\n");
    let plain = plain.trim();

    if plain.chars().count() > max_chars {
        let truncated: String = plain.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        plain.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_front_matter_basic() {
        let raw = "---\ntitle: Hello\n---\nBody text";
        let (yaml, body) = split_front_matter(raw);
        assert_eq!(yaml, Some("title: Hello"));
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_split_front_matter_absent() {
        let raw = "Just a body, no block";
        let (yaml, body) = split_front_matter(raw);
        assert!(yaml.is_none());
        assert_eq!(body, raw);
    }

    #[test]
    fn test_split_front_matter_crlf() {
        let raw = "---\r\ntitle: Hi\r\n---\r\nBody";
        let (yaml, body) = split_front_matter(raw);
        assert_eq!(yaml, Some("title: Hi"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_frontmatter_defaults() {
        let front: FrontMatter = serde_yaml::from_str("title: Only a title").unwrap();
        assert_eq!(front.title.as_deref(), Some("Only a title"));
        assert!(front.summary.is_none());
        assert!(front.tags.is_empty());
        assert!(front.keywords.is_empty());
        assert!(front.date.is_none());
    }

    #[test]
    fn test_normalize_date_iso() {
        assert_eq!(normalize_date(Some("2024-03-15")), "2024-03-15");
    }

    #[test]
    fn test_normalize_date_rfc3339() {
        assert_eq!(normalize_date(Some("2024-03-15T10:30:00Z")), "2024-03-15");
    }

    #[test]
    fn test_normalize_date_unparsable_is_empty() {
        assert_eq!(normalize_date(Some("sometime in spring")), "");
        assert_eq!(normalize_date(None), "");
    }

    #[test]
    fn test_extract_excerpt_strips_markdown() {
        let body = "# Heading\n\nSome **bold** and *italic* text with \
                    [a link](https://example.com) and `inline code`.\n\n\
                    ```rust\nfn hidden() {}\n```\n\n- bullet one\n- bullet two";
        let excerpt = extract_excerpt(body, EXCERPT_MAX_CHARS);
        assert!(!excerpt.contains('#'));
        assert!(!excerpt.contains("**"));
        assert!(excerpt.contains("a link"));
        assert!(!excerpt.contains("https://example.com"));
        assert!(!excerpt.contains("fn hidden"));
        assert!(excerpt.contains("inline code"));
        assert!(excerpt.contains("bullet one"));
        assert!(!excerpt.contains("- bullet"));
        assert!(!excerpt.contains("\n\n"));
    }

    #[test]
    fn test_extract_excerpt_truncates_with_ellipsis() {
        let body = "x".repeat(600);
        let excerpt = extract_excerpt(&body, EXCERPT_MAX_CHARS);
        assert_eq!(excerpt.chars().count(), EXCERPT_MAX_CHARS + 3);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_extract_excerpt_short_body_untouched() {
        let excerpt = extract_excerpt("short body", EXCERPT_MAX_CHARS);
        assert_eq!(excerpt, "short body");
    }

    #[test]
    fn test_parse_markdown_file_slug_from_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-post.md");
        std::fs::write(&path, "---\ntitle: My Post\ndate: 2024-01-01\n---\nHello").unwrap();

        let parsed = parse_markdown_file(&path).unwrap();
        assert_eq!(parsed.slug, "my-post");
        assert_eq!(parsed.front.title.as_deref(), Some("My Post"));
        assert_eq!(parsed.body, "Hello");
    }

    #[test]
    fn test_parse_markdown_file_malformed_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.md");
        std::fs::write(&path, "---\ntitle: [unclosed\n---\nBody").unwrap();

        assert!(parse_markdown_file(&path).is_err());
    }
}
