//! Domain models for Showcase.
//!
//! - `Project`: the portfolio record every data source produces
//! - `FetchError` / `ShowcaseError`: the failure taxonomy

pub mod error;
pub mod project;

pub use error::{FetchError, Result, ShowcaseError};
pub use project::{validate_projects, Project, ProjectListError};
