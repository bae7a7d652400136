//! Every workspace crate inherits `version.workspace = true`, and the
//! library's `VERSION` matches the workspace version.

use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .unwrap()
        .to_path_buf()
}

fn read_toml(path: &Path) -> toml::Value {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
        .parse()
        .unwrap()
}

#[test]
fn all_crates_use_workspace_version() {
    let root = workspace_root();
    let workspace = read_toml(&root.join("Cargo.toml"));
    let members = workspace["workspace"]["members"].as_array().unwrap();
    assert!(!members.is_empty());

    for member in members {
        let member = member.as_str().unwrap();
        let manifest = read_toml(&root.join(member).join("Cargo.toml"));
        let inherited = manifest["package"]["version"]
            .get("workspace")
            .and_then(toml::Value::as_bool);
        assert_eq!(
            inherited,
            Some(true),
            "{member} should use version.workspace = true"
        );
    }
}

#[test]
fn workspace_version_matches_library_version() {
    let workspace = read_toml(&workspace_root().join("Cargo.toml"));
    let ws_version = workspace["workspace"]["package"]["version"].as_str().unwrap();
    assert_eq!(ws_version, showcase_core::VERSION);
}
