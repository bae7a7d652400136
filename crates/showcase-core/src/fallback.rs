//! Bundled fallback project list.
//!
//! `data/projects.fallback.json` is embedded at compile time and validated by
//! `build.rs` (non-empty, well-typed, unique non-empty slugs), so parsing it
//! here cannot fail for a binary that built.

use std::sync::OnceLock;

use crate::domain::Project;

const FALLBACK_JSON: &str = include_str!("../data/projects.fallback.json");

static FALLBACK: OnceLock<Vec<Project>> = OnceLock::new();

/// The build-time fallback set. Never empty, no I/O.
pub fn fallback_projects() -> &'static [Project] {
    FALLBACK.get_or_init(|| {
        serde_json::from_str(FALLBACK_JSON).expect("fallback list is validated by build.rs")
    })
}
