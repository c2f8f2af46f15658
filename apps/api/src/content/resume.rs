//! The resume YAML model. The `skills` mapping is the authoritative skill
//! vocabulary for the whole index: nothing outside it ever becomes a skill.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SkillItem {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub resume: Option<bool>,
    #[serde(default, rename = "altName")]
    pub alt_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Optional presentation metadata carried by variant resume files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VariantMeta {
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resume {
    pub name: String,
    #[serde(default, rename = "jobTitles")]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub skills: BTreeMap<String, Vec<SkillItem>>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub meta: Option<VariantMeta>,
}

pub fn load_resume(path: &Path) -> Result<Resume> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read resume {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("malformed resume YAML {}", path.display()))
}
