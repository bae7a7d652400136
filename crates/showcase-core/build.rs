//! Validates the bundled fallback project list at build time.
//!
//! The fallback set is the last-resort data source and has no runtime
//! recovery path, so a missing or malformed file fails the build.

use std::collections::HashSet;

use serde_json::Value;

const FALLBACK_PATH: &str = "data/projects.fallback.json";

fn main() {
    println!("cargo:rerun-if-changed={FALLBACK_PATH}");

    let raw = std::fs::read_to_string(FALLBACK_PATH)
        .unwrap_or_else(|e| panic!("bundled fallback {FALLBACK_PATH} is missing: {e}"));

    if let Err(reason) = validate(&raw) {
        panic!("bundled fallback {FALLBACK_PATH} is invalid: {reason}");
    }
}

fn validate(raw: &str) -> Result<(), String> {
    let doc: Value = serde_json::from_str(raw).map_err(|e| format!("not JSON: {e}"))?;
    let items = doc.as_array().ok_or("top level must be an array")?;
    if items.is_empty() {
        return Err("fallback list must not be empty".to_string());
    }

    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| format!("entry {index} is not an object"))?;

        let slug = obj
            .get("slug")
            .and_then(Value::as_str)
            .ok_or_else(|| format!("entry {index} has no string slug"))?;
        if slug.is_empty() {
            return Err(format!("entry {index} has an empty slug"));
        }
        if !seen.insert(slug.to_string()) {
            return Err(format!("duplicate slug {slug:?}"));
        }

        for field in ["title", "summary"] {
            if !obj.get(field).is_some_and(Value::is_string) {
                return Err(format!("{slug}: {field} must be a string"));
            }
        }
        for field in ["tags", "tech"] {
            if let Some(list) = obj.get(field) {
                let ok = list
                    .as_array()
                    .is_some_and(|xs| xs.iter().all(Value::is_string));
                if !ok {
                    return Err(format!("{slug}: {field} must be an array of strings"));
                }
            }
        }
        for field in ["repoUrl", "demoUrl"] {
            if let Some(url) = obj.get(field) {
                if !(url.is_string() || url.is_null()) {
                    return Err(format!("{slug}: {field} must be a string"));
                }
            }
        }
    }
    Ok(())
}
