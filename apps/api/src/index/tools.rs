//! The closed set of content-index queries offered to the model as tools.
//! Tool names arrive as strings on the wire; they are parsed into a tagged
//! enum and dispatched through one match, never by reflection.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::index::ContentIndex;
use crate::llm_client::ToolSpec;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    Unknown(String),

    #[error("invalid arguments for {tool}: {source}")]
    Arguments {
        tool: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SearchSkills { keywords: Vec<String> },
    GetProject { slug: String },
    SearchProjects { keywords: Vec<String> },
    SearchExperience { keywords: Vec<String> },
    GetSkillsByCategory { category: String },
    GetResumeSummary,
}

#[derive(Deserialize)]
struct KeywordArgs {
    keywords: Vec<String>,
}

#[derive(Deserialize)]
struct SlugArgs {
    slug: String,
}

#[derive(Deserialize)]
struct CategoryArgs {
    category: String,
}

impl ToolCall {
    /// Parses a wire-level tool invocation into the closed operation set.
    pub fn parse(name: &str, input: &Value) -> Result<Self, ToolError> {
        let arguments = |source| ToolError::Arguments {
            tool: name.to_string(),
            source,
        };

        match name {
            "search_skills" => {
                let args: KeywordArgs =
                    serde_json::from_value(input.clone()).map_err(arguments)?;
                Ok(ToolCall::SearchSkills {
                    keywords: args.keywords,
                })
            }
            "get_project" => {
                let args: SlugArgs = serde_json::from_value(input.clone()).map_err(arguments)?;
                Ok(ToolCall::GetProject { slug: args.slug })
            }
            "search_projects" => {
                let args: KeywordArgs =
                    serde_json::from_value(input.clone()).map_err(arguments)?;
                Ok(ToolCall::SearchProjects {
                    keywords: args.keywords,
                })
            }
            "search_experience" => {
                let args: KeywordArgs =
                    serde_json::from_value(input.clone()).map_err(arguments)?;
                Ok(ToolCall::SearchExperience {
                    keywords: args.keywords,
                })
            }
            "get_skills_by_category" => {
                let args: CategoryArgs =
                    serde_json::from_value(input.clone()).map_err(arguments)?;
                Ok(ToolCall::GetSkillsByCategory {
                    category: args.category,
                })
            }
            "get_resume_summary" => Ok(ToolCall::GetResumeSummary),
            other => Err(ToolError::Unknown(other.to_string())),
        }
    }

    /// Executes the operation against the in-memory index.
    pub fn execute(&self, index: &ContentIndex) -> Value {
        match self {
            ToolCall::SearchSkills { keywords } => search_skills(index, keywords),
            ToolCall::GetProject { slug } => get_project(index, slug),
            ToolCall::SearchProjects { keywords } => search_projects(index, keywords),
            ToolCall::SearchExperience { keywords } => search_experience(index, keywords),
            ToolCall::GetSkillsByCategory { category } => {
                get_skills_by_category(index, category)
            }
            ToolCall::GetResumeSummary => get_resume_summary(index),
        }
    }
}

fn search_skills(index: &ContentIndex, keywords: &[String]) -> Value {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let matches: Vec<Value> = index
        .skills
        .iter()
        .filter(|skill| {
            let name = skill.name.to_lowercase();
            let category = skill.category.to_lowercase();
            keywords.iter().any(|kw| {
                name.contains(kw.as_str()) || category.contains(kw.as_str()) || kw.contains(&name)
            })
        })
        .map(|skill| {
            json!({
                "name": skill.name,
                "category": skill.category,
                "projects": skill.projects,
                "blog": skill.blog,
                "hasEvidence": !skill.projects.is_empty() || !skill.blog.is_empty(),
            })
        })
        .collect();
    Value::Array(matches)
}

fn get_project(index: &ContentIndex, slug: &str) -> Value {
    index
        .projects
        .iter()
        .find(|p| p.slug == slug)
        .map(|p| serde_json::to_value(p).unwrap_or(Value::Null))
        .unwrap_or(Value::Null)
}

fn search_projects(index: &ContentIndex, keywords: &[String]) -> Value {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let matches: Vec<Value> = index
        .projects
        .iter()
        .filter(|project| {
            let text = format!(
                "{} {} {} {}",
                project.title,
                project.summary,
                project.tags.join(" "),
                project.keywords.join(" ")
            )
            .to_lowercase();
            keywords.iter().any(|kw| text.contains(kw.as_str()))
        })
        .map(|project| {
            json!({
                "slug": project.slug,
                "title": project.title,
                "url": project.url,
                "summary": project.summary,
                "tags": project.tags,
                "date": project.date,
            })
        })
        .collect();
    Value::Array(matches)
}

fn search_experience(index: &ContentIndex, keywords: &[String]) -> Value {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let matches: Vec<Value> = index
        .experience
        .iter()
        .filter(|exp| {
            let text = format!(
                "{} {} {} {}",
                exp.role,
                exp.company,
                exp.description,
                exp.highlights.join(" ")
            )
            .to_lowercase();
            keywords.iter().any(|kw| text.contains(kw.as_str()))
        })
        .map(|exp| {
            json!({
                "role": exp.role,
                "company": exp.company,
                "dateRange": exp.date_range,
                "location": exp.location,
                "description": exp.description,
                // cap feedback size: top 3 highlights only
                "highlights": exp.highlights.iter().take(3).collect::<Vec<_>>(),
            })
        })
        .collect();
    Value::Array(matches)
}

fn get_skills_by_category(index: &ContentIndex, category: &str) -> Value {
    let category = category.to_lowercase();

    let matches: Vec<Value> = index
        .skills
        .iter()
        .filter(|skill| skill.category.to_lowercase().contains(&category))
        .map(|skill| {
            json!({
                "name": skill.name,
                "projects": skill.projects,
                "blog": skill.blog,
            })
        })
        .collect();
    Value::Array(matches)
}

fn get_resume_summary(index: &ContentIndex) -> Value {
    json!({
        "name": index.resume.name,
        "title": index.resume.title,
        "location": index.resume.location,
        "email": index.resume.email,
        "tagline": index.resume.tagline,
        "summary": index.resume.summary,
        "skillCategories": index.resume.skill_categories.keys().collect::<Vec<_>>(),
    })
}

/// The tool declarations sent to the model.
pub fn tool_specs() -> Vec<ToolSpec> {
    let keywords_schema = json!({
        "type": "object",
        "properties": {
            "keywords": {
                "type": "array",
                "items": {"type": "string"},
                "description": "Keywords to search for (e.g., [\"kubernetes\", \"aws\", \"leadership\"])"
            }
        },
        "required": ["keywords"]
    });

    vec![
        ToolSpec {
            name: "search_skills".to_string(),
            description: "Search for skills by keywords. Returns skills with evidence \
                          (projects/blog posts where they were used)."
                .to_string(),
            input_schema: keywords_schema.clone(),
        },
        ToolSpec {
            name: "get_project".to_string(),
            description: "Get detailed information about a specific project by its slug. \
                          Use after search_projects to get full details."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "slug": {"type": "string", "description": "Project slug"}
                },
                "required": ["slug"]
            }),
        },
        ToolSpec {
            name: "search_projects".to_string(),
            description: "Search for projects by keywords or technologies. \
                          Returns relevant projects with summaries."
                .to_string(),
            input_schema: keywords_schema.clone(),
        },
        ToolSpec {
            name: "search_experience".to_string(),
            description: "Search work experience by role, company, or keywords."
                .to_string(),
            input_schema: keywords_schema,
        },
        ToolSpec {
            name: "get_skills_by_category".to_string(),
            description: "Get all skills in a specific category \
                          (e.g., \"Cloud Platforms\", \"Languages\")."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "category": {"type": "string", "description": "Category name"}
                },
                "required": ["category"]
            }),
        },
        ToolSpec {
            name: "get_resume_summary".to_string(),
            description: "Get the resume summary: name, title, location, tagline, overview."
                .to_string(),
            input_schema: json!({"type": "object", "properties": {}}),
        },
    ]
}
