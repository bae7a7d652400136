//! The `Project` record and project-list invariants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A single portfolio project.
///
/// Wire format is camelCase JSON. Fields the server adds on top of this shape
/// (`id`, `createdUtc`) are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique, URL-safe identifier
    pub slug: String,
    pub title: String,
    /// One-line description; may be empty
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

impl Project {
    pub fn new(slug: impl Into<String>, title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            summary: summary.into(),
            tags: Vec::new(),
            tech: Vec::new(),
            repo_url: None,
            demo_url: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tech<I, S>(mut self, tech: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tech = tech.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    pub fn with_demo_url(mut self, url: impl Into<String>) -> Self {
        self.demo_url = Some(url.into());
        self
    }

    /// Detail page path for this project.
    pub fn href(&self) -> String {
        format!("/portfolio/{}", self.slug)
    }
}

/// Violations of the project-list invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectListError {
    #[error("project at index {index} has an empty slug")]
    EmptySlug { index: usize },

    #[error("slug {slug:?} appears more than once")]
    DuplicateSlug { slug: String },
}

/// Check that every slug in `projects` is non-empty and unique.
pub fn validate_projects(projects: &[Project]) -> Result<(), ProjectListError> {
    let mut seen = HashSet::with_capacity(projects.len());
    for (index, project) in projects.iter().enumerate() {
        if project.slug.is_empty() {
            return Err(ProjectListError::EmptySlug { index });
        }
        if !seen.insert(project.slug.as_str()) {
            return Err(ProjectListError::DuplicateSlug {
                slug: project.slug.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_server_shape_ignores_extra_fields() {
        let body = r#"{
            "id": 7,
            "slug": "showcase",
            "title": "Showcase",
            "summary": "",
            "tags": ["portfolio"],
            "tech": ["Rust"],
            "repoUrl": "https://example.com/repo",
            "demoUrl": null,
            "createdUtc": "2025-10-23T19:40:19Z"
        }"#;
        let project: Project = serde_json::from_str(body).unwrap();

        assert_eq!(project.slug, "showcase");
        assert_eq!(project.summary, "");
        assert_eq!(project.tags, vec!["portfolio"]);
        assert_eq!(project.repo_url.as_deref(), Some("https://example.com/repo"));
        assert_eq!(project.demo_url, None);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let project: Project =
            serde_json::from_str(r#"{"slug":"a","title":"A","summary":"s"}"#).unwrap();
        assert!(project.tags.is_empty());
        assert!(project.tech.is_empty());
    }

    #[test]
    fn test_missing_title_is_rejected() {
        let result: Result<Project, _> = serde_json::from_str(r#"{"slug":"a","summary":"s"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_camel_case_and_skips_none() {
        let project = Project::new("a", "A", "s").with_repo_url("https://r");
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["repoUrl"], "https://r");
        assert!(json.get("demoUrl").is_none());
        assert!(json.get("repo_url").is_none());
    }

    #[test]
    fn test_href() {
        assert_eq!(Project::new("json-formatter", "J", "").href(), "/portfolio/json-formatter");
    }

    #[test]
    fn test_validate_projects() {
        let ok = vec![Project::new("a", "A", ""), Project::new("b", "B", "")];
        assert!(validate_projects(&ok).is_ok());
        assert!(validate_projects(&[]).is_ok());

        let empty = vec![Project::new("a", "A", ""), Project::new("", "B", "")];
        assert_eq!(
            validate_projects(&empty),
            Err(ProjectListError::EmptySlug { index: 1 })
        );

        let dup = vec![Project::new("a", "A", ""), Project::new("a", "Again", "")];
        assert_eq!(
            validate_projects(&dup),
            Err(ProjectListError::DuplicateSlug {
                slug: "a".to_string()
            })
        );
    }
}
