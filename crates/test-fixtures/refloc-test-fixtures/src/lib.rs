use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    projects: HashMap<String, ProjectEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectEntry {
    Path(String),
    Detailed {
        path: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl ProjectEntry {
    fn as_path(&self) -> &str {
        match self {
            ProjectEntry::Path(path) => path,
            ProjectEntry::Detailed { path, .. } => path,
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            ProjectEntry::Path(_) => None,
            ProjectEntry::Detailed { description, .. } => description.as_deref(),
        }
    }
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a, T>(map: &'a HashMap<String, T>, kind: &str, name: &str) -> Result<&'a T> {
    map.get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Asset project descriptions (`fixtures/projects/*.json`).
pub mod projects {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.projects.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn json(name: &str) -> Result<String> {
        let entry = lookup(&MANIFEST.projects, "project", name)?;
        read_to_string(entry.as_path())
    }

    /// Raw JSON value, for tests that tweak a project before loading it.
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse project fixture {name}"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let entry = lookup(&MANIFEST.projects, "project", name)?;
        Ok(resolve_path(entry.as_path()))
    }

    pub fn description(name: &str) -> Result<Option<String>> {
        let entry = lookup(&MANIFEST.projects, "project", name)?;
        Ok(entry.description().map(str::to_owned))
    }
}
