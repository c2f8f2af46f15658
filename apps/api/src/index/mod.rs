//! The content index: the precomputed, versioned snapshot of parsed
//! projects, blog posts, skills, and experience that grounds the chat and
//! fit-finder features. Rebuilt wholesale by `build-index`; immutable at
//! request time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod cache;
pub mod snapshot;
pub mod tools;

/// Schema version stamped into every snapshot and pointer file.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// One skill from the resume vocabulary with its content evidence.
/// Evidence lists hold slugs and never contain duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub name: String,
    pub category: String,
    pub projects: Vec<String>,
    pub blog: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub role: String,
    pub company: String,
    /// Always `"{start} - {end}"`, with `Present` standing in for an open end.
    pub date_range: String,
    pub location: String,
    pub description: String,
    pub highlights: Vec<String>,
}

/// A project or blog post. `content_excerpt` is populated for projects only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub slug: String,
    pub title: String,
    pub url: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub keywords: Vec<String>,
    /// `YYYY-MM-DD`, or empty when the source date was absent/unparsable.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_excerpt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub name: String,
    pub title: String,
    pub tagline: String,
    pub summary: String,
    pub location: String,
    pub email: String,
    pub skill_categories: BTreeMap<String, Vec<String>>,
}

/// Build provenance, recomputed every build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    pub build_date: String,
    pub version: String,
    pub project_count: usize,
    pub blog_count: usize,
    pub skill_count: usize,
    pub experience_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentIndex {
    pub skills: Vec<SkillEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub projects: Vec<ContentEntry>,
    pub blog: Vec<ContentEntry>,
    pub resume: ResumeSummary,
    pub metadata: IndexMetadata,
}
