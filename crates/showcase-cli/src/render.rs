//! Terminal rendering of screens and projects.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use showcase_core::{Project, Screen, LOADING_TEXT};

/// Output format for rendered data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// One project as a card: title, link, summary, chips, links.
pub fn render_card(project: &Project) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", project.title));
    out.push_str(&format!("  {}\n", project.href()));
    if !project.summary.is_empty() {
        out.push_str(&format!("  {}\n", project.summary));
    }

    let chips: Vec<String> = project
        .tech
        .iter()
        .map(|t| format!("[{t}]"))
        .chain(project.tags.iter().map(|t| format!("#{t}")))
        .collect();
    if !chips.is_empty() {
        out.push_str(&format!("  {}\n", chips.join(" ")));
    }

    if let Some(url) = &project.repo_url {
        out.push_str(&format!("  repo: {url}\n"));
    }
    if let Some(url) = &project.demo_url {
        out.push_str(&format!("  demo: {url}\n"));
    }

    out.trim_end().to_string()
}

pub fn render_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects.".to_string();
    }
    projects
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_screen(screen: &Screen) -> String {
    match screen {
        Screen::Loading => LOADING_TEXT.to_string(),
        Screen::Ready { view } => render_list(&view.projects),
        Screen::Degraded { view, banner } => {
            let list = render_list(&view.projects);
            match banner {
                Some(banner) => format!("! {} [{}]\n\n{}", banner.message, banner.retry_label, list),
                None => list,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcase_core::{screen_for, FetchError, FetchState};

    fn card_project() -> Project {
        Project::new("showcase", "Showcase", "Portfolio site")
            .with_tech(["Rust", "Tokio"])
            .with_tags(["web"])
            .with_repo_url("https://github.com/csmntms/showcase")
    }

    #[test]
    fn test_card_lists_tech_before_tags() {
        let card = render_card(&card_project());
        assert_eq!(
            card,
            "Showcase\n  /portfolio/showcase\n  Portfolio site\n  [Rust] [Tokio] #web\n  repo: https://github.com/csmntms/showcase"
        );
    }

    #[test]
    fn test_card_omits_empty_parts() {
        let card = render_card(&Project::new("bare", "Bare", ""));
        assert_eq!(card, "Bare\n  /portfolio/bare");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(render_list(&[]), "No projects.");
    }

    #[test]
    fn test_loading_screen() {
        assert_eq!(render_screen(&Screen::Loading), "Loading…");
    }

    #[test]
    fn test_degraded_screen_has_banner_line() {
        let failed = FetchState::Failed(FetchError::Status {
            url: "u".to_string(),
            status: 502,
        });
        let cached = vec![card_project()];
        let text = render_screen(&screen_for(&failed, Some(cached.as_slice()), true, false));
        assert!(text.starts_with("! Showing cached/fallback data. [Retry]\n\nShowcase"));

        let text = render_screen(&screen_for(&failed, Some(cached.as_slice()), true, true));
        assert!(text.starts_with("Showcase"));
    }

    #[test]
    fn test_json_output_uses_wire_names() {
        let json = to_json(&[card_project()]).unwrap();
        assert!(json.contains("\"repoUrl\""));
        assert!(!json.contains("demoUrl"));
    }
}
