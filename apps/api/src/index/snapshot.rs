//! Snapshot emission: the unversioned convenience copy, the content-hash
//! named immutable copy, and the mutable pointer file that names it.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::index::{
    ContentEntry, ContentIndex, ExperienceEntry, ResumeSummary, SkillEntry, SCHEMA_VERSION,
};

/// The mutable "latest" pointer. Consumers treat this file as short-lived
/// and the hash-named snapshot as permanently cacheable.
pub const POINTER_FILE: &str = "content-index-latest.json";
/// The unversioned convenience copy.
pub const INDEX_FILE: &str = "content-index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerFile {
    pub filename: String,
    pub build_date: String,
    pub version: String,
    pub hash: String,
}

/// The hash input: index content plus schema version, excluding the
/// volatile build metadata, so identical content always hashes identically.
#[derive(Serialize)]
struct HashableIndex<'a> {
    skills: &'a [SkillEntry],
    experience: &'a [ExperienceEntry],
    projects: &'a [ContentEntry],
    blog: &'a [ContentEntry],
    resume: &'a ResumeSummary,
    version: &'a str,
}

/// Computes the 8-hex-char content hash over the canonical JSON
/// serialization of the index content.
pub fn content_hash(index: &ContentIndex) -> Result<String> {
    let canonical = serde_json::to_vec(&HashableIndex {
        skills: &index.skills,
        experience: &index.experience,
        projects: &index.projects,
        blog: &index.blog,
        resume: &index.resume,
        version: SCHEMA_VERSION,
    })
    .context("failed to serialize index for hashing")?;

    let digest = Sha256::digest(&canonical);
    Ok(hex::encode(digest)[..8].to_string())
}

/// Writes all three snapshot artifacts and returns the pointer record.
pub fn write_snapshot(static_dir: &Path, index: &ContentIndex) -> Result<PointerFile> {
    std::fs::create_dir_all(static_dir)
        .with_context(|| format!("failed to create {}", static_dir.display()))?;

    let body = serde_json::to_string_pretty(index)?;
    let hash = content_hash(index)?;
    let versioned_filename = format!("content-index.{hash}.json");

    std::fs::write(static_dir.join(INDEX_FILE), &body)
        .with_context(|| format!("failed to write {INDEX_FILE}"))?;
    std::fs::write(static_dir.join(&versioned_filename), &body)
        .with_context(|| format!("failed to write {versioned_filename}"))?;

    let pointer = PointerFile {
        filename: versioned_filename,
        build_date: index.metadata.build_date.clone(),
        version: index.metadata.version.clone(),
        hash,
    };
    std::fs::write(
        static_dir.join(POINTER_FILE),
        serde_json::to_string_pretty(&pointer)?,
    )
    .with_context(|| format!("failed to write {POINTER_FILE}"))?;

    Ok(pointer)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::index::IndexMetadata;
    use std::collections::BTreeMap;

    pub(crate) fn fixture_index() -> ContentIndex {
        ContentIndex {
            skills: vec![SkillEntry {
                name: "AWS".to_string(),
                category: "Cloud Platforms".to_string(),
                projects: vec!["cloud-migration".to_string()],
                blog: vec![],
            }],
            experience: vec![ExperienceEntry {
                role: "Director".to_string(),
                company: "Example Corp".to_string(),
                date_range: "2021 - Present".to_string(),
                location: "Remote".to_string(),
                description: "Ran the platform org.".to_string(),
                highlights: vec!["Cut infra spend 30%".to_string()],
            }],
            projects: vec![ContentEntry {
                slug: "cloud-migration".to_string(),
                title: "Cloud Migration".to_string(),
                url: "https://example.com/projects/cloud-migration/".to_string(),
                summary: "Lift and shift".to_string(),
                tags: vec!["aws-lambda".to_string()],
                keywords: vec!["migration".to_string()],
                date: "2024-02-01".to_string(),
                content_excerpt: Some("Moved everything.".to_string()),
            }],
            blog: vec![],
            resume: ResumeSummary {
                name: "Ada Example".to_string(),
                title: "Technical Director".to_string(),
                tagline: "Builds platforms".to_string(),
                summary: "Twenty years of shipping.".to_string(),
                location: "Denver, CO".to_string(),
                email: "ada@example.com".to_string(),
                skill_categories: BTreeMap::from([(
                    "Cloud Platforms".to_string(),
                    vec!["AWS".to_string()],
                )]),
            },
            metadata: IndexMetadata {
                build_date: "2026-08-24T00:00:00Z".to_string(),
                version: SCHEMA_VERSION.to_string(),
                project_count: 1,
                blog_count: 0,
                skill_count: 1,
                experience_count: 1,
            },
        }
    }

    #[test]
    fn test_hash_is_deterministic() {
        let a = fixture_index();
        let b = fixture_index();
        assert_eq!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn test_hash_ignores_build_date() {
        let a = fixture_index();
        let mut b = fixture_index();
        b.metadata.build_date = "2030-01-01T00:00:00Z".to_string();
        assert_eq!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = fixture_index();
        let mut b = fixture_index();
        b.projects[0].summary = "Different summary".to_string();
        assert_ne!(content_hash(&a).unwrap(), content_hash(&b).unwrap());
    }

    #[test]
    fn test_hash_is_8_hex_chars() {
        let hash = content_hash(&fixture_index()).unwrap();
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_write_snapshot_emits_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let index = fixture_index();

        let pointer = write_snapshot(dir.path(), &index).unwrap();

        assert!(dir.path().join(INDEX_FILE).exists());
        assert!(dir.path().join(&pointer.filename).exists());
        assert!(dir.path().join(POINTER_FILE).exists());
        assert_eq!(pointer.filename, format!("content-index.{}.json", pointer.hash));

        // pointer refers to an existing, parseable snapshot
        let raw = std::fs::read_to_string(dir.path().join(&pointer.filename)).unwrap();
        let loaded: ContentIndex = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded, index);

        let raw = std::fs::read_to_string(dir.path().join(POINTER_FILE)).unwrap();
        let loaded: PointerFile = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.hash, pointer.hash);
        assert_eq!(loaded.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_snapshot_json_uses_camel_case_fields() {
        let index = fixture_index();
        let wire = serde_json::to_value(&index).unwrap();
        assert!(wire["experience"][0].get("dateRange").is_some());
        assert!(wire["projects"][0].get("contentExcerpt").is_some());
        assert!(wire["resume"].get("skillCategories").is_some());
        assert!(wire["metadata"].get("buildDate").is_some());
    }
}
