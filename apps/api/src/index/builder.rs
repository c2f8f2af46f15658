//! Content index builder: a single pass over the content tree that parses
//! markdown collections, seeds the skill vocabulary from the resume, and
//! attaches content evidence by keyword matching.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::content::frontmatter::{
    extract_excerpt, normalize_date, parse_markdown_file, EXCERPT_MAX_CHARS,
};
use crate::content::resume::{load_resume, Resume};
use crate::index::{
    ContentEntry, ContentIndex, ExperienceEntry, IndexMetadata, ResumeSummary, SkillEntry,
    SCHEMA_VERSION,
};

pub struct BuildOptions {
    pub content_dir: PathBuf,
    pub site_url: String,
}

/// Builds the full content index from filesystem state.
///
/// A missing resume YAML is fatal; a missing content subdirectory produces
/// an empty collection with a warning; a malformed markdown file is logged
/// and skipped.
pub fn build_content_index(opts: &BuildOptions) -> Result<ContentIndex> {
    let resume_path = opts.content_dir.join("resume.yaml");
    let resume = load_resume(&resume_path).context("the canonical resume.yaml is required")?;

    let mut projects = collect_entries(
        &opts.content_dir.join("projects"),
        &format!("{}/projects", opts.site_url),
        true,
    );
    sort_by_date_desc(&mut projects);
    info!("  {} projects", projects.len());

    let mut blog = collect_entries(
        &opts.content_dir.join("blog"),
        &format!("{}/blog", opts.site_url),
        false,
    );
    sort_by_date_desc(&mut blog);
    info!("  {} blog posts", blog.len());

    let experience = build_experience(&resume);
    info!("  {} experience entries", experience.len());

    let skills = build_skill_index(&resume, &projects, &blog);
    info!("  {} skills indexed", skills.len());

    let skill_categories: BTreeMap<String, Vec<String>> = resume
        .skills
        .iter()
        .map(|(category, items)| {
            (
                category.clone(),
                items.iter().map(|s| s.name.clone()).collect(),
            )
        })
        .collect();

    let metadata = IndexMetadata {
        build_date: chrono::Utc::now().to_rfc3339(),
        version: SCHEMA_VERSION.to_string(),
        project_count: projects.len(),
        blog_count: blog.len(),
        skill_count: skills.len(),
        experience_count: experience.len(),
    };

    Ok(ContentIndex {
        skills,
        experience,
        projects,
        blog,
        resume: ResumeSummary {
            name: resume.name,
            title: resume.job_titles.join(" / "),
            tagline: resume.tagline,
            summary: resume.summary,
            location: resume.location,
            email: resume.email,
            skill_categories,
        },
        metadata,
    })
}

/// Parses every `.md` file in `dir` into a `ContentEntry`. Files are visited
/// in filename order so repeated builds see the same encounter order.
fn collect_entries(dir: &Path, url_base: &str, with_excerpt: bool) -> Vec<ContentEntry> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => {
            warn!("Directory not found: {}", dir.display());
            return Vec::new();
        }
    };

    let mut files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("md"))
        .collect();
    files.sort();

    let mut result = Vec::new();
    for path in files {
        let parsed = match parse_markdown_file(&path) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Skipping {}: {e:#}", path.display());
                continue;
            }
        };

        let content_excerpt =
            with_excerpt.then(|| extract_excerpt(&parsed.body, EXCERPT_MAX_CHARS));

        result.push(ContentEntry {
            title: parsed.front.title.unwrap_or_else(|| parsed.slug.clone()),
            url: format!("{url_base}/{}/", parsed.slug),
            summary: parsed.front.summary.unwrap_or_default(),
            tags: parsed.front.tags,
            keywords: parsed.front.keywords,
            date: normalize_date(parsed.front.date.as_deref()),
            content_excerpt,
            slug: parsed.slug,
        });
    }
    result
}

/// Descending lexicographic on ISO dates; the empty string (no date) sorts
/// last. Stable, so equal dates keep encounter order.
fn sort_by_date_desc(entries: &mut [ContentEntry]) {
    entries.sort_by(|a, b| b.date.cmp(&a.date));
}

fn build_experience(resume: &Resume) -> Vec<ExperienceEntry> {
    resume
        .experience
        .iter()
        .map(|exp| ExperienceEntry {
            role: exp.role.clone(),
            company: exp.company.clone(),
            date_range: format!(
                "{} - {}",
                exp.start_date,
                exp.end_date.as_deref().unwrap_or("Present")
            ),
            location: exp.location.clone(),
            description: exp.description.clone(),
            highlights: exp.highlights.clone(),
        })
        .collect()
}

/// Seeds skills from the resume vocabulary (the authoritative list; nothing
/// else ever becomes a skill), then attaches project and blog evidence by
/// term matching. Output is ordered by name.
fn build_skill_index(
    resume: &Resume,
    projects: &[ContentEntry],
    blog: &[ContentEntry],
) -> Vec<SkillEntry> {
    let mut skills: Vec<SkillEntry> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (category, items) in &resume.skills {
        for item in items {
            let key = item.name.to_lowercase();
            if !seen.contains_key(&key) {
                seen.insert(key, skills.len());
                skills.push(SkillEntry {
                    name: item.name.clone(),
                    category: category.clone(),
                    projects: Vec::new(),
                    blog: Vec::new(),
                });
            }
        }
    }

    attach_evidence(&mut skills, projects, |skill| &mut skill.projects);
    attach_evidence(&mut skills, blog, |skill| &mut skill.blog);

    skills.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    skills
}

/// Appends each matching entry's slug to the selected evidence list, once.
/// The match rule is the documented bidirectional substring check: a term
/// equals the skill name, contains it, or is contained by it (lowercased).
fn attach_evidence(
    skills: &mut [SkillEntry],
    entries: &[ContentEntry],
    evidence: impl Fn(&mut SkillEntry) -> &mut Vec<String>,
) {
    for entry in entries {
        let terms: Vec<String> = entry
            .tags
            .iter()
            .chain(entry.keywords.iter())
            .map(|t| t.to_lowercase())
            .collect();

        for skill in skills.iter_mut() {
            let skill_lower = skill.name.to_lowercase();
            let matches = terms.iter().any(|term| {
                *term == skill_lower || term.contains(&skill_lower) || skill_lower.contains(term)
            });

            let list = evidence(skill);
            if matches && !list.contains(&entry.slug) {
                list.push(entry.slug.clone());
            }
        }
    }
}
