//! Tiered resolution policy.
//!
//! Pure functions, no I/O. Given the fetch state, the cache snapshot and the
//! reachability flag, pick the list to display and whether it is degraded:
//!
//! 1. the successfully fetched list (always preferred),
//! 2. the cache snapshot,
//! 3. the bundled fallback set.

use serde::Serialize;

use crate::domain::Project;
use crate::fallback::fallback_projects;
use crate::fetcher::FetchState;

/// Tier that supplied the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Network,
    Cache,
    Fallback,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Network => "network",
            Source::Cache => "cache",
            Source::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the policy: what to show and whether to warn about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedView {
    pub projects: Vec<Project>,
    pub degraded: bool,
    pub source: Source,
}

impl ResolvedView {
    /// Project with the given slug, if displayed.
    pub fn find(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

/// Resolve against the bundled fallback set.
pub fn resolve(fetch: &FetchState, cached: Option<&[Project]>, online: bool) -> ResolvedView {
    resolve_with_fallback(fetch, cached, fallback_projects(), online)
}

/// Resolve against an explicit fallback list.
pub fn resolve_with_fallback(
    fetch: &FetchState,
    cached: Option<&[Project]>,
    fallback: &[Project],
    online: bool,
) -> ResolvedView {
    let tiers = [
        (Source::Network, fetch.projects()),
        (Source::Cache, cached),
        (Source::Fallback, Some(fallback)),
    ];
    let (source, projects) = tiers
        .into_iter()
        .find_map(|(source, list)| list.map(|l| (source, l)))
        .unwrap_or((Source::Fallback, fallback));

    ResolvedView {
        projects: projects.to_vec(),
        degraded: is_degraded(source, fetch, online),
        source,
    }
}

/// Degraded means "showing something other than fresh data, and we know
/// fresh data is not coming": offline, or the fetch failed.
pub fn is_degraded(source: Source, fetch: &FetchState, online: bool) -> bool {
    source != Source::Network && (!online || fetch.is_failed())
}
